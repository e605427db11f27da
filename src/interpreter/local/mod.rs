//! Built-in interpreter
//!
//! A small in-memory system speaking the sentinel protocol: a login state
//! machine in front of a handful of shell-like commands over a virtual
//! filesystem, plus an owned media player for `play`.

mod auth;
mod commands;
mod fs;

pub use auth::{Account, AuthError, sha256_hex};
pub use fs::{EntryKind, VirtualFs};

use super::{Interpreter, InterpreterError};
use crate::config::{InterpreterConfig, MediaConfig};
use crate::media::MediaPlayer;
use crate::protocol::sentinel;
use anyhow::{Context as _, Result};
use auth::AuthSystem;
use commands::CommandContext;
use std::path::PathBuf;

const LOGIN_PROMPT: &str = "Terminal Emulator login: ";
const PASSWORD_PROMPT: &str = "Password: ";

enum LoginState {
    Username,
    Password { username: String },
    Active { account: Account },
}

pub struct LocalInterpreter {
    hostname: String,
    auth: AuthSystem,
    fs: VirtualFs,
    cwd: String,
    history: Vec<String>,
    state: LoginState,
    player: MediaPlayer,
    media_root: Option<PathBuf>,
}

impl LocalInterpreter {
    /// Build the interpreter and seed its filesystem
    ///
    /// Home directories of all users are created first, then the configured
    /// directories and files. Files with a `source` are read from the host.
    pub fn from_config(config: &InterpreterConfig, media: &MediaConfig) -> Result<Self> {
        let auth = AuthSystem::new(&config.users, config.max_login_attempts);
        let mut fs = VirtualFs::new();

        for account in auth.accounts() {
            fs.create_directory(&account.home)
                .with_context(|| format!("Failed to create home of {}", account.username))?;
        }
        for dir in &config.directories {
            fs.create_directory(dir)
                .with_context(|| format!("Failed to create directory {}", dir))?;
        }
        for seed in &config.files {
            let content = match (&seed.content, &seed.source) {
                (Some(content), _) => content.clone(),
                (None, Some(source)) => std::fs::read_to_string(source)
                    .with_context(|| format!("Failed to read {}", source.display()))?,
                (None, None) => String::new(),
            };
            let normalized = VirtualFs::normalize(&seed.path);
            if let Some((parent, _)) = normalized.rsplit_once('/')
                && !parent.is_empty()
            {
                fs.create_directory(parent)
                    .with_context(|| format!("Failed to create directory {}", parent))?;
            }
            fs.create_file(&normalized, &content)
                .with_context(|| format!("Failed to create file {}", seed.path))?;
        }

        let player = match &media.player {
            Some(command) => MediaPlayer::new(command.clone(), media.args.clone()),
            None => MediaPlayer::disabled(),
        };

        log::info!(
            "Local interpreter ready ({} users, host {})",
            config.users.len(),
            config.hostname
        );

        Ok(Self {
            hostname: config.hostname.clone(),
            auth,
            fs,
            cwd: "/".to_string(),
            history: Vec::new(),
            state: LoginState::Username,
            player,
            media_root: media.root.clone(),
        })
    }

    /// Name of the logged-in user, if any
    pub fn current_user(&self) -> Option<&str> {
        match &self.state {
            LoginState::Active { account } => Some(&account.username),
            _ => None,
        }
    }

    pub fn current_dir(&self) -> &str {
        &self.cwd
    }

    fn login_username(&mut self, input: &str) -> String {
        let username = input.trim();
        if self.auth.user_exists(username) {
            self.state = LoginState::Password {
                username: username.to_string(),
            };
            sentinel::USERNAME_OK.to_string()
        } else {
            format!("User '{}' does not exist", username)
        }
    }

    fn login_password(&mut self, username: String, password: &str) -> String {
        match self.auth.verify(&username, password) {
            Ok(account) => {
                log::info!("{} logged in", account.username);
                self.cwd = account.home.clone();
                let name = account.username.clone();
                self.state = LoginState::Active { account };
                format!("{}{}", sentinel::LOGIN_SUCCESS, name)
            }
            Err(err) => {
                self.state = LoginState::Username;
                format!("{}{}", sentinel::LOGIN_FAILED, err)
            }
        }
    }

    fn run_command(&mut self, input: &str) -> String {
        if input.trim().is_empty() {
            return String::new();
        }
        self.history.push(input.to_string());

        let mut words = input.split_whitespace();
        let Some(cmd) = words.next() else {
            return String::new();
        };
        let args: Vec<&str> = words.collect();

        match cmd {
            "clear" => return sentinel::CLEAR.to_string(),
            "logout" | "exit" => {
                if let LoginState::Active { account } = &self.state {
                    log::info!("{} logged out", account.username);
                }
                self.player.stop();
                self.state = LoginState::Username;
                self.cwd = "/".to_string();
                return sentinel::LOGOUT.to_string();
            }
            _ => {}
        }

        let LoginState::Active { account } = &self.state else {
            return String::new();
        };
        let mut ctx = CommandContext {
            fs: &mut self.fs,
            cwd: &mut self.cwd,
            account,
            hostname: &self.hostname,
            player: &mut self.player,
            media_root: self.media_root.as_ref(),
        };
        commands::execute(cmd, &args, &mut ctx).join("\n")
    }
}

impl Interpreter for LocalInterpreter {
    fn execute_command(&mut self, input: &str) -> String {
        match std::mem::replace(&mut self.state, LoginState::Username) {
            LoginState::Username => self.login_username(input),
            LoginState::Password { username } => self.login_password(username, input),
            state @ LoginState::Active { .. } => {
                self.state = state;
                self.run_command(input)
            }
        }
    }

    fn prompt(&self) -> String {
        match &self.state {
            LoginState::Username => LOGIN_PROMPT.to_string(),
            LoginState::Password { .. } => PASSWORD_PROMPT.to_string(),
            LoginState::Active { account } => {
                let symbol = if account.is_root() { '#' } else { '$' };
                format!(
                    "{}@{}:{} {} ",
                    account.username, self.hostname, self.cwd, symbol
                )
            }
        }
    }

    fn history_len(&self) -> usize {
        self.history.len()
    }

    fn history_item(&self, index: usize) -> Option<String> {
        self.history.get(index).cloned()
    }

    fn read_file(&self, path: &str) -> Option<String> {
        self.fs.read_file(path).map(str::to_string)
    }

    fn add_file(&mut self, path: &str, content: &str) -> Result<(), InterpreterError> {
        self.fs.create_file(path, content)
    }

    fn add_directory(&mut self, path: &str) -> Result<(), InterpreterError> {
        self.fs.create_directory(path)
    }
}
