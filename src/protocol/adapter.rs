//! Applies decoded interpreter responses to the display buffer

use super::Response;
use crate::config::WelcomeBanner;
use crate::interpreter::Interpreter;
use crate::terminal::{DisplayBuffer, sanitize_output};
use std::collections::HashMap;

pub struct ProtocolAdapter {
    welcome: HashMap<String, WelcomeBanner>,
}

impl ProtocolAdapter {
    pub fn new(welcome: HashMap<String, WelcomeBanner>) -> Self {
        Self { welcome }
    }

    /// Print the output for `response` and issue the next prompt
    pub fn apply(
        &self,
        response: Response,
        buffer: &mut DisplayBuffer,
        interpreter: &dyn Interpreter,
    ) {
        match response {
            Response::UsernameOk => {}
            Response::LoginSuccess(username) => {
                log::info!("Login succeeded for {}", username);
                buffer.append("");
                buffer.append(&format!("Welcome, {}!", username));
                buffer.append("");
                for line in self.banner(&username, interpreter) {
                    buffer.append(&line);
                }
                buffer.append("");
            }
            Response::LoginFailed(reason) => {
                log::info!("Login failed: {}", reason);
                buffer.append(&format!("Login failed: {}", reason));
                buffer.append("");
            }
            Response::Logout => {
                buffer.append("Logging out...");
                buffer.append("");
            }
            Response::Clear => buffer.clear(),
            Response::Text(lines) => {
                for line in &lines {
                    buffer.append(line);
                }
            }
        }
        buffer.new_prompt(&interpreter.prompt());
    }

    /// Extra welcome lines for `username`
    ///
    /// A banner file takes precedence over inline lines when the interpreter
    /// can read it.
    fn banner(&self, username: &str, interpreter: &dyn Interpreter) -> Vec<String> {
        let Some(banner) = self.welcome.get(username) else {
            return Vec::new();
        };

        if let Some(path) = &banner.file {
            match interpreter.read_file(path) {
                Some(content) => return sanitize_output(&content),
                None => log::warn!("Welcome file {} for {} is not readable", path, username),
            }
        }
        banner.lines.clone()
    }
}
