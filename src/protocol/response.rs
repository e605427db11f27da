use super::sentinel;
use crate::terminal::sanitize_output;

/// Interpreter output, classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Username accepted; the interpreter now wants the password
    UsernameOk,
    LoginSuccess(String),
    /// Login rejected, with the interpreter's reason
    LoginFailed(String),
    Logout,
    Clear,
    /// Ordinary output, already split into clean lines (possibly none)
    Text(Vec<String>),
}

impl Response {
    /// Classify raw interpreter output
    ///
    /// Sentinels must match exactly (or by prefix for the login results);
    /// anything else is text. The reason of a failed login keeps any colons
    /// it contains.
    pub fn decode(raw: &str) -> Self {
        match raw {
            sentinel::USERNAME_OK => return Response::UsernameOk,
            sentinel::LOGOUT => return Response::Logout,
            sentinel::CLEAR => return Response::Clear,
            _ => {}
        }

        if let Some(username) = raw.strip_prefix(sentinel::LOGIN_SUCCESS) {
            return Response::LoginSuccess(username.trim().to_string());
        }
        if let Some(reason) = raw.strip_prefix(sentinel::LOGIN_FAILED) {
            return Response::LoginFailed(reason.to_string());
        }

        Response::Text(sanitize_output(raw))
    }
}
