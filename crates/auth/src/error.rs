//! Authentication errors
//!
//! These never reach clients directly: a failed resolution means
//! "no session" and the endpoint decides how to answer.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid authorization header format")]
    InvalidAuthorizationFormat,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Invalid user ID in token")]
    InvalidUserId,
}
