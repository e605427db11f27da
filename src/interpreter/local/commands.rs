//! Built-in commands of the local interpreter

use super::auth::Account;
use super::fs::{EntryKind, VirtualFs};
use crate::media::MediaPlayer;
use std::path::PathBuf;

/// Mutable state a command may read or change
pub struct CommandContext<'a> {
    pub fs: &'a mut VirtualFs,
    pub cwd: &'a mut String,
    pub account: &'a Account,
    pub hostname: &'a str,
    pub player: &'a mut MediaPlayer,
    pub media_root: Option<&'a PathBuf>,
}

impl CommandContext<'_> {
    fn resolve(&self, path: &str) -> String {
        VirtualFs::resolve(path, self.cwd, &self.account.home)
    }
}

/// Run `cmd` and return its output lines
pub fn execute(cmd: &str, args: &[&str], ctx: &mut CommandContext) -> Vec<String> {
    match cmd {
        "help" => help(),
        "echo" => vec![args.join(" ")],
        "pwd" => vec![ctx.cwd.clone()],
        "whoami" => vec![ctx.account.username.clone()],
        "hostname" => vec![ctx.hostname.to_string()],
        "cd" => cd(args, ctx),
        "ls" => ls(args, ctx),
        "cat" => cat(args, ctx),
        "mkdir" => mkdir(args, ctx),
        "touch" => touch(args, ctx),
        "play" => play(args, ctx),
        "stop" => stop(ctx),
        "pause" => pause(ctx),
        "resume" => resume(ctx),
        _ => vec![format!("bash: {}: command not found", cmd)],
    }
}

fn help() -> Vec<String> {
    [
        "Available commands:",
        "  help          Show this help message",
        "  echo          Print text to terminal",
        "  clear         Clear the terminal",
        "  pwd           Print working directory",
        "  cd            Change directory",
        "  ls            List directory contents",
        "  cat           Display file contents",
        "  mkdir         Create a directory",
        "  touch         Create a file",
        "  whoami        Print current user",
        "  hostname      Print system name",
        "  play          Play an audio or video file",
        "  pause         Pause playback",
        "  resume        Resume playback",
        "  stop          Stop playback",
        "  logout        End the session",
    ]
    .iter()
    .map(|line| line.to_string())
    .collect()
}

fn cd(args: &[&str], ctx: &mut CommandContext) -> Vec<String> {
    let target = args.first().copied().unwrap_or("~");
    let path = ctx.resolve(target);

    match ctx.fs.kind(&path) {
        Some(EntryKind::Directory) => {
            *ctx.cwd = path;
            Vec::new()
        }
        Some(EntryKind::File) => vec![format!("cd: {}: Not a directory", target)],
        None => vec![format!("cd: {}: No such file or directory", target)],
    }
}

fn ls(args: &[&str], ctx: &mut CommandContext) -> Vec<String> {
    let target = args.first().copied().unwrap_or(".");
    let path = ctx.resolve(target);

    match ctx.fs.list_directory(&path) {
        Some(entries) if entries.is_empty() => Vec::new(),
        Some(entries) => {
            let names: Vec<String> = entries
                .into_iter()
                .map(|(name, kind)| match kind {
                    EntryKind::Directory => format!("{}/", name),
                    EntryKind::File => name,
                })
                .collect();
            vec![names.join("  ")]
        }
        None if ctx.fs.kind(&path) == Some(EntryKind::File) => vec![target.to_string()],
        None => vec![format!(
            "ls: cannot access '{}': No such file or directory",
            target
        )],
    }
}

fn cat(args: &[&str], ctx: &mut CommandContext) -> Vec<String> {
    let Some(target) = args.first() else {
        return vec!["cat: missing file operand".to_string()];
    };
    let path = ctx.resolve(target);

    match ctx.fs.read_file(&path) {
        Some(content) => content.lines().map(str::to_string).collect(),
        None if ctx.fs.kind(&path).is_some() => vec![format!("cat: {}: Is a directory", target)],
        None => vec![format!("cat: {}: No such file or directory", target)],
    }
}

fn mkdir(args: &[&str], ctx: &mut CommandContext) -> Vec<String> {
    let Some(target) = args.first() else {
        return vec!["mkdir: missing operand".to_string()];
    };
    let path = ctx.resolve(target);

    match ctx.fs.create_directory(&path) {
        Ok(()) => Vec::new(),
        Err(e) => vec![format!("mkdir: cannot create directory '{}': {}", target, e)],
    }
}

fn touch(args: &[&str], ctx: &mut CommandContext) -> Vec<String> {
    let Some(target) = args.first() else {
        return vec!["touch: missing file operand".to_string()];
    };
    let path = ctx.resolve(target);

    if ctx.fs.kind(&path).is_some() {
        return Vec::new();
    }
    match ctx.fs.create_file(&path, "") {
        Ok(()) => Vec::new(),
        Err(e) => vec![format!("touch: cannot touch '{}': {}", target, e)],
    }
}

fn play(args: &[&str], ctx: &mut CommandContext) -> Vec<String> {
    if args.is_empty() {
        return vec![
            "Usage: play <file>".to_string(),
            "Plays an audio or video file.".to_string(),
        ];
    }

    let target = args.join(" ");
    let path = ctx.resolve(&target);
    match ctx.fs.kind(&path) {
        Some(EntryKind::File) => {}
        Some(EntryKind::Directory) => return vec![format!("play: {}: Is a directory", target)],
        None => return vec![format!("play: {}: No such file or directory", target)],
    }

    let Some(root) = ctx.media_root else {
        log::warn!("play {}: no media root configured", path);
        return vec!["play: media playback is not configured".to_string()];
    };
    let source = root.join(path.trim_start_matches('/'));

    match ctx.player.play(&source) {
        Ok(()) => vec![format!("Playing: {}", path)],
        Err(e) => {
            log::error!("Playback of {} failed: {}", source.display(), e);
            vec![format!("play: {}", e)]
        }
    }
}

fn stop(ctx: &mut CommandContext) -> Vec<String> {
    if ctx.player.stop() {
        vec!["Playback stopped".to_string()]
    } else {
        vec!["stop: nothing is playing".to_string()]
    }
}

fn pause(ctx: &mut CommandContext) -> Vec<String> {
    match ctx.player.pause() {
        Ok(true) => vec!["Playback paused".to_string()],
        Ok(false) => vec!["pause: nothing is playing".to_string()],
        Err(e) => {
            log::error!("Failed to pause playback: {}", e);
            vec![format!("pause: {}", e)]
        }
    }
}

fn resume(ctx: &mut CommandContext) -> Vec<String> {
    match ctx.player.resume() {
        Ok(true) => vec!["Playback resumed".to_string()],
        Ok(false) => vec!["resume: nothing is playing".to_string()],
        Err(e) => {
            log::error!("Failed to resume playback: {}", e);
            vec![format!("resume: {}", e)]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UserConfig;

    struct Fixture {
        fs: VirtualFs,
        cwd: String,
        account: Account,
        player: MediaPlayer,
        media_root: Option<PathBuf>,
    }

    impl Fixture {
        fn new() -> Self {
            let mut fs = VirtualFs::new();
            fs.create_directory("/home/guest/docs").unwrap();
            fs.create_file("/home/guest/notes.txt", "one\ntwo").unwrap();
            fs.create_file("/home/guest/song.mp3", "").unwrap();
            let account = Account::from(&UserConfig {
                username: "guest".to_string(),
                password_sha256: String::new(),
                uid: 1000,
                home: "/home/guest".to_string(),
                shell: "/bin/bash".to_string(),
                fullname: String::new(),
            });
            Self {
                fs,
                cwd: "/home/guest".to_string(),
                account,
                player: MediaPlayer::disabled(),
                media_root: None,
            }
        }

        fn run(&mut self, cmd: &str, args: &[&str]) -> Vec<String> {
            let mut ctx = CommandContext {
                fs: &mut self.fs,
                cwd: &mut self.cwd,
                account: &self.account,
                hostname: "testhost",
                player: &mut self.player,
                media_root: self.media_root.as_ref(),
            };
            execute(cmd, args, &mut ctx)
        }
    }

    #[test]
    fn test_echo_and_unknown() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run("echo", &["hello", "world"]), vec!["hello world"]);
        assert_eq!(fx.run("frobnicate", &[]), vec!["bash: frobnicate: command not found"]);
    }

    #[test]
    fn test_cd_and_pwd() {
        let mut fx = Fixture::new();
        assert!(fx.run("cd", &["docs"]).is_empty());
        assert_eq!(fx.run("pwd", &[]), vec!["/home/guest/docs"]);
        assert_eq!(fx.run("cd", &["../notes.txt"]), vec!["cd: ../notes.txt: Not a directory"]);
        assert_eq!(fx.run("cd", &["/nowhere"]), vec!["cd: /nowhere: No such file or directory"]);
        assert!(fx.run("cd", &[]).is_empty());
        assert_eq!(fx.cwd, "/home/guest");
    }

    #[test]
    fn test_ls_marks_directories() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run("ls", &[]), vec!["docs/  notes.txt  song.mp3"]);
        assert!(fx.run("ls", &["docs"]).is_empty());
        assert_eq!(fx.run("ls", &["notes.txt"]), vec!["notes.txt"]);
        assert_eq!(
            fx.run("ls", &["nope"]),
            vec!["ls: cannot access 'nope': No such file or directory"]
        );
    }

    #[test]
    fn test_cat() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run("cat", &["~/notes.txt"]), vec!["one", "two"]);
        assert_eq!(fx.run("cat", &["docs"]), vec!["cat: docs: Is a directory"]);
        assert_eq!(fx.run("cat", &["x"]), vec!["cat: x: No such file or directory"]);
        assert_eq!(fx.run("cat", &[]), vec!["cat: missing file operand"]);
    }

    #[test]
    fn test_mkdir_and_touch() {
        let mut fx = Fixture::new();
        assert!(fx.run("mkdir", &["new"]).is_empty());
        assert!(fx.run("touch", &["new/file"]).is_empty());
        assert_eq!(fx.fs.read_file("/home/guest/new/file"), Some(""));
        // touching an existing file keeps its content
        assert!(fx.run("touch", &["notes.txt"]).is_empty());
        assert_eq!(fx.fs.read_file("/home/guest/notes.txt"), Some("one\ntwo"));
        assert_eq!(
            fx.run("touch", &["missing/file"]),
            vec!["touch: cannot touch 'missing/file': /home/guest/missing: No such file or directory"]
        );
    }

    #[test]
    fn test_play_validates_target() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run("play", &[]).len(), 2);
        assert_eq!(fx.run("play", &["docs"]), vec!["play: docs: Is a directory"]);
        assert_eq!(fx.run("play", &["x.mp3"]), vec!["play: x.mp3: No such file or directory"]);
        assert_eq!(
            fx.run("play", &["song.mp3"]),
            vec!["play: media playback is not configured"]
        );
    }

    #[test]
    fn test_play_without_player() {
        let mut fx = Fixture::new();
        fx.media_root = Some(PathBuf::from("/srv/media"));
        assert_eq!(
            fx.run("play", &["song.mp3"]),
            vec!["play: no media player configured"]
        );
        assert_eq!(fx.run("stop", &[]), vec!["stop: nothing is playing"]);
    }

    #[test]
    fn test_play_and_stop_with_player() {
        let mut fx = Fixture::new();
        // `sleep /30` fails immediately but the spawn itself succeeds
        fx.player = MediaPlayer::new("sleep", Vec::new());
        fx.media_root = Some(PathBuf::from("/"));
        assert_eq!(fx.run("play", &["song.mp3"]), vec!["Playing: /home/guest/song.mp3"]);
        fx.run("stop", &[]);
        assert_eq!(fx.run("pause", &[]), vec!["pause: nothing is playing"]);
        assert_eq!(fx.run("resume", &[]), vec!["resume: nothing is playing"]);
    }
}
