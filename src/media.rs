//! Media playback handle
//!
//! A `MediaPlayer` owns at most one running playback. Starting a new one
//! releases the previous one first, and dropping the handle releases
//! whatever is still playing. Playback itself is delegated to an external
//! player process (e.g. `ffplay -nodisp -autoexit`).

use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("no media player configured")]
    NoPlayer,

    #[error("failed to start {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to signal player: {0}")]
    Signal(#[from] nix::errno::Errno),
}

/// A running player process; killed and reaped on drop
struct Playback {
    child: Child,
    source: PathBuf,
    paused: bool,
}

impl Playback {
    fn pid(&self) -> Pid {
        Pid::from_raw(self.child.id() as i32)
    }

    fn has_exited(&mut self) -> bool {
        !matches!(self.child.try_wait(), Ok(None))
    }
}

impl Drop for Playback {
    fn drop(&mut self) {
        if self.has_exited() {
            return;
        }
        if self.paused {
            // A stopped process won't act on SIGKILL until continued on some systems
            let _ = kill(self.pid(), Signal::SIGCONT);
        }
        if let Err(e) = self.child.kill() {
            log::warn!("Failed to stop playback of {}: {}", self.source.display(), e);
        }
        let _ = self.child.wait();
        log::debug!("Released playback of {}", self.source.display());
    }
}

pub struct MediaPlayer {
    command: Option<String>,
    args: Vec<String>,
    current: Option<Playback>,
}

impl MediaPlayer {
    /// Player that runs `command args... <source>` for every playback
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: Some(command.into()),
            args,
            current: None,
        }
    }

    /// Player with no backend; every `play` fails with [`MediaError::NoPlayer`]
    pub fn disabled() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            current: None,
        }
    }

    /// Start playing `source`, releasing any current playback first
    pub fn play(&mut self, source: &Path) -> Result<(), MediaError> {
        self.stop();

        let command = self.command.as_ref().ok_or(MediaError::NoPlayer)?;
        let child = Command::new(command)
            .args(&self.args)
            .arg(source)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| MediaError::Spawn {
                command: command.clone(),
                source: err,
            })?;

        log::info!("Playing {} with {}", source.display(), command);
        self.current = Some(Playback {
            child,
            source: source.to_path_buf(),
            paused: false,
        });
        Ok(())
    }

    /// Stop the current playback; false if nothing was playing
    pub fn stop(&mut self) -> bool {
        self.reap();
        self.current.take().is_some()
    }

    /// Suspend the current playback; false if nothing was playing
    pub fn pause(&mut self) -> Result<bool, MediaError> {
        self.reap();
        match &mut self.current {
            Some(playback) if !playback.paused => {
                kill(playback.pid(), Signal::SIGSTOP)?;
                playback.paused = true;
                Ok(true)
            }
            Some(_) => Ok(true),
            None => Ok(false),
        }
    }

    /// Continue a paused playback; false if nothing was playing
    pub fn resume(&mut self) -> Result<bool, MediaError> {
        self.reap();
        match &mut self.current {
            Some(playback) if playback.paused => {
                kill(playback.pid(), Signal::SIGCONT)?;
                playback.paused = false;
                Ok(true)
            }
            Some(_) => Ok(true),
            None => Ok(false),
        }
    }

    /// Source of the playback still running, if any
    pub fn now_playing(&mut self) -> Option<&Path> {
        self.reap();
        self.current.as_ref().map(|playback| playback.source.as_path())
    }

    pub fn is_paused(&self) -> bool {
        self.current.as_ref().is_some_and(|playback| playback.paused)
    }

    /// Forget a playback whose process already finished
    fn reap(&mut self) {
        if let Some(playback) = &mut self.current
            && playback.has_exited()
        {
            log::debug!("Playback of {} finished", playback.source.display());
            self.current = None;
        }
    }
}

impl Default for MediaPlayer {
    fn default() -> Self {
        Self::disabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // `sleep <seconds>` stands in for a player: the "source" is the duration
    fn sleeper() -> MediaPlayer {
        MediaPlayer::new("sleep", Vec::new())
    }

    #[test]
    fn test_disabled_player_refuses_to_play() {
        let mut player = MediaPlayer::disabled();
        assert!(matches!(
            player.play(Path::new("song.mp3")),
            Err(MediaError::NoPlayer)
        ));
        assert!(player.now_playing().is_none());
    }

    #[test]
    fn test_missing_player_binary_is_a_spawn_error() {
        let mut player = MediaPlayer::new("/nonexistent/siteterm-player", Vec::new());
        let err = player.play(Path::new("song.mp3")).unwrap_err();
        assert!(matches!(err, MediaError::Spawn { .. }));
        assert!(err.to_string().contains("/nonexistent/siteterm-player"));
    }

    #[test]
    fn test_play_and_stop() {
        let mut player = sleeper();
        player.play(Path::new("30")).unwrap();
        assert_eq!(player.now_playing(), Some(Path::new("30")));
        assert!(player.stop());
        assert!(player.now_playing().is_none());
        assert!(!player.stop());
    }

    #[test]
    fn test_play_replaces_current_playback() {
        let mut player = sleeper();
        player.play(Path::new("30")).unwrap();
        player.play(Path::new("31")).unwrap();
        assert_eq!(player.now_playing(), Some(Path::new("31")));
    }

    #[test]
    fn test_pause_and_resume() {
        let mut player = sleeper();
        assert!(!player.pause().unwrap());

        player.play(Path::new("30")).unwrap();
        assert!(player.pause().unwrap());
        assert!(player.is_paused());
        assert!(player.resume().unwrap());
        assert!(!player.is_paused());
    }

    #[test]
    fn test_finished_playback_is_reaped() {
        let mut player = sleeper();
        player.play(Path::new("0")).unwrap();
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while player.now_playing().is_some() && std::time::Instant::now() < deadline {
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        assert!(player.now_playing().is_none());
    }
}
