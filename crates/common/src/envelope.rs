//! Uniform `{data, error}` response envelope

use serde::{Deserialize, Serialize};

/// Error payload carried inside an envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response envelope used across the API surface.
///
/// Both keys are always serialized; exactly one of them is non-null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub error: Option<ErrorBody>,
}

impl<T> Envelope<T> {
    /// Successful envelope wrapping `data`
    pub fn data(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    /// Failed envelope with `data: null`
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(ErrorBody::new(message)),
        }
    }
}

/// Error body without a `data` key.
///
/// Only the unauthenticated branch of mutating endpoints answers with this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BareError {
    pub error: ErrorBody,
}

impl BareError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody::new(message),
        }
    }
}
