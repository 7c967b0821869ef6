//! Backend call errors

use thiserror::Error;

/// Maximum number of response body characters kept in an error
const MAX_BODY_CHARS: usize = 500;

#[derive(Debug, Error)]
pub enum BackendError {
    /// Request could not be sent or the response could not be read
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Backend answered with a non-success status
    #[error("{method} {url} returned {status}: {body}")]
    Status {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    /// Success status but the body was not the expected shape
    #[error("Invalid response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl BackendError {
    pub fn status(method: &reqwest::Method, url: &str, status: u16, body: &str) -> Self {
        Self::Status {
            method: method.to_string(),
            url: url.to_string(),
            status,
            body: truncate(body),
        }
    }

    /// HTTP status, when the backend answered
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn truncate(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_BODY_CHARS {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(MAX_BODY_CHARS).collect();
    out.push('…');
    out
}
