//! Client-facing error taxonomy.
//!
//! | Variant        | HTTP | Body message    |
//! |----------------|------|-----------------|
//! | `BadRequest`   | 400  | `Invalid JSON`  |
//! | `Unauthorized` | 401  | `Unauthorized`  |
//! | `InvalidToken` | 401  | `Invalid token` |
//! | `BodyTimeout`  | 408  | `Request timeout` |
//!
//! Unknown actions are not errors here: they are answered with a regular
//! [`TriggerResponse`](crate::TriggerResponse) and HTTP 200. Maintenance
//! failures never reach the client at all.

use thiserror::Error;

/// Terminal request failures. Each one ends the request immediately.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriggerError {
    /// Body is not a JSON object.
    #[error("Invalid JSON: {reason}")]
    BadRequest { reason: String },

    /// `Authorization` header missing or not a bearer credential.
    #[error("Unauthorized")]
    Unauthorized,

    /// Bearer token does not match the configured secret.
    #[error("Invalid token")]
    InvalidToken,

    /// Client stopped sending before the declared body arrived.
    #[error("Request body not received within {secs}s")]
    BodyTimeout { secs: u64 },
}

impl TriggerError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest { .. } => 400,
            Self::Unauthorized | Self::InvalidToken => 401,
            Self::BodyTimeout { .. } => 408,
        }
    }

    /// Message placed in the JSON error body. Never includes parser details.
    pub fn client_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => "Invalid JSON",
            Self::Unauthorized => "Unauthorized",
            Self::InvalidToken => "Invalid token",
            Self::BodyTimeout { .. } => "Request timeout",
        }
    }
}
