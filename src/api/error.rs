//! Error taxonomy for the remote API boundary.
//!
//! Everything above this layer works in `anyhow`; commands flatten to
//! `String` for the webview. Nothing here is fatal: mutating-call failures
//! surface as alerts, sensor-poll failures become the controller's sticky
//! error flag.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, TLS, or timeout failure before a response arrived.
    #[error("network error: {0}")]
    Network(reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The server answered 2xx with a body we could not decode.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err)
        }
    }
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
