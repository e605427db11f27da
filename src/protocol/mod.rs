//! Session protocol
//!
//! Interpreter output is either plain text or one of a few sentinel strings
//! announcing control events. [`Response::decode`] classifies it once and
//! [`ProtocolAdapter`] turns the result into display buffer updates.

pub mod adapter;
pub mod response;

pub use adapter::ProtocolAdapter;
pub use response::Response;

/// Sentinel strings of the interpreter contract
pub mod sentinel {
    pub const USERNAME_OK: &str = "USERNAME_OK";
    /// Prefix, followed by the username
    pub const LOGIN_SUCCESS: &str = "LOGIN_SUCCESS:";
    /// Prefix, followed by the failure reason
    pub const LOGIN_FAILED: &str = "LOGIN_FAILED:";
    pub const LOGOUT: &str = "LOGOUT";
    pub const CLEAR: &str = "CLEAR";
}
