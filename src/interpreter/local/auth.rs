//! Account store and password verification

use crate::config::UserConfig;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Account locked. Too many failed attempts.")]
    Locked,

    #[error("Incorrect password")]
    IncorrectPassword,

    #[error("Password login disabled")]
    LoginDisabled,

    #[error("User not found")]
    UnknownUser,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub username: String,
    pub uid: u32,
    pub home: String,
    pub shell: String,
    pub fullname: String,
    password_sha256: String,
}

impl Account {
    pub fn is_root(&self) -> bool {
        self.uid == 0
    }
}

impl From<&UserConfig> for Account {
    fn from(user: &UserConfig) -> Self {
        Self {
            username: user.username.clone(),
            uid: user.uid,
            home: user.home.clone(),
            shell: user.shell.clone(),
            fullname: user.fullname.clone(),
            password_sha256: user.password_sha256.to_ascii_lowercase(),
        }
    }
}

pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub struct AuthSystem {
    accounts: HashMap<String, Account>,
    failed_attempts: HashMap<String, u32>,
    max_attempts: u32,
}

impl AuthSystem {
    pub fn new(users: &[UserConfig], max_attempts: u32) -> Self {
        let accounts = users
            .iter()
            .map(|user| (user.username.clone(), Account::from(user)))
            .collect();
        Self {
            accounts,
            failed_attempts: HashMap::new(),
            max_attempts,
        }
    }

    pub fn user_exists(&self, username: &str) -> bool {
        self.accounts.contains_key(username)
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    /// Check `password` for `username`
    ///
    /// Each wrong password counts towards the lockout; a correct one resets
    /// the count. A locked account rejects even the correct password.
    pub fn verify(&mut self, username: &str, password: &str) -> Result<Account, AuthError> {
        let attempts = self.failed_attempts.get(username).copied().unwrap_or(0);
        if attempts >= self.max_attempts {
            return Err(AuthError::Locked);
        }

        let account = self.accounts.get(username).ok_or(AuthError::UnknownUser)?;
        if account.password_sha256.is_empty() {
            return Err(AuthError::LoginDisabled);
        }

        if sha256_hex(password) == account.password_sha256 {
            self.failed_attempts.remove(username);
            Ok(account.clone())
        } else {
            self.failed_attempts
                .insert(username.to_string(), attempts + 1);
            log::warn!("Failed login for {} ({} attempts)", username, attempts + 1);
            Err(AuthError::IncorrectPassword)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HUNTER2: &str = "f52fbd32b2b3b86ff88ef6c490628285f482af15ddcb29541f94bcf526a3f6c7";

    fn users() -> Vec<UserConfig> {
        vec![
            UserConfig {
                username: "alice".to_string(),
                password_sha256: HUNTER2.to_uppercase(),
                uid: 1000,
                home: "/home/alice".to_string(),
                shell: "/bin/bash".to_string(),
                fullname: "Alice".to_string(),
            },
            UserConfig {
                username: "root".to_string(),
                password_sha256: String::new(),
                uid: 0,
                home: "/root".to_string(),
                shell: "/bin/bash".to_string(),
                fullname: String::new(),
            },
        ]
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(sha256_hex("hunter2"), HUNTER2);
    }

    #[test]
    fn test_verify_correct_password() {
        let mut auth = AuthSystem::new(&users(), 3);
        let account = auth.verify("alice", "hunter2").unwrap();
        assert_eq!(account.home, "/home/alice");
        assert!(!account.is_root());
    }

    #[test]
    fn test_lockout_after_max_attempts() {
        let mut auth = AuthSystem::new(&users(), 3);
        for _ in 0..3 {
            assert_eq!(auth.verify("alice", "nope"), Err(AuthError::IncorrectPassword));
        }
        assert_eq!(auth.verify("alice", "hunter2"), Err(AuthError::Locked));
    }

    #[test]
    fn test_success_resets_attempts() {
        let mut auth = AuthSystem::new(&users(), 3);
        auth.verify("alice", "nope").unwrap_err();
        auth.verify("alice", "nope").unwrap_err();
        auth.verify("alice", "hunter2").unwrap();
        auth.verify("alice", "nope").unwrap_err();
        auth.verify("alice", "nope").unwrap_err();
        assert!(auth.verify("alice", "hunter2").is_ok());
    }

    #[test]
    fn test_empty_hash_disables_login() {
        let mut auth = AuthSystem::new(&users(), 3);
        assert_eq!(auth.verify("root", ""), Err(AuthError::LoginDisabled));
        assert_eq!(auth.verify("mallory", "x"), Err(AuthError::UnknownUser));
    }
}
