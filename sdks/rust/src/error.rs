//! Error types for the SDK.
//!
//! Failures are split by where they happened so callers can branch on the
//! variant instead of parsing message text.

use std::path::PathBuf;

use thiserror::Error;

/// SDK error type.
#[derive(Error, Debug)]
pub enum Error {
    /// The request never produced a response (connection refused, DNS,
    /// broken body stream).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    ///
    /// Displays as the bare `detail` text.
    #[error("{detail}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Server-supplied `detail`, or a status-text fallback.
        detail: String,
    },

    /// A 2xx body did not match the expected JSON shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A request failed client-side validation and was never sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A decoded response failed strict-mode checks.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Invalid base URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Reading a local file for upload failed.
    #[error("failed to read {}: {source}", .path.display())]
    File {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// HTTP status of a server rejection, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server was never reached.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Whether the server rejected the request.
    pub fn is_server(&self) -> bool {
        matches!(self, Self::Server { .. })
    }

    /// Whether a success body could not be decoded.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// Whether the request was rejected before transport.
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, Self::InvalidRequest(_))
    }
}

/// Result type alias for SDK operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Pull a human-readable message out of an error body.
///
/// Strings are used verbatim, other JSON values are rendered compactly.
/// Empty strings, `null`, missing fields and unparsable bodies yield `None`.
pub(crate) fn extract_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.is_empty() => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Canonical reason phrase for a status, falling back to the numeric code.
pub(crate) fn status_text(status: reqwest::StatusCode) -> String {
    status
        .canonical_reason()
        .map_or_else(|| status.as_u16().to_string(), ToString::to_string)
}
