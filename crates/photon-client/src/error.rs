//! Client error types.

use thiserror::Error;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The vendor rejected the session (HTTP 401).
    #[error("Authentication required: vendor returned 401")]
    AuthRequired,

    /// The vendor rate-limited the request (HTTP 429).
    ///
    /// As a side effect the current access token has been stripped from
    /// the session.
    #[error("Rate limited: vendor returned 429, access token removed")]
    RateLimited,

    /// Any other non-2xx vendor response.
    #[error("Vendor API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// The raw file PUT to a presigned upload URL failed.
    #[error("Image upload failed: HTTP {status}")]
    Upload {
        /// HTTP status code from the upload target.
        status: u16,
    },

    /// A 2xx response did not carry the expected payload shape.
    #[error("Unexpected vendor response: {0}")]
    UnexpectedResponse(String),

    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL construction failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Session persistence failed.
    #[error("Session error: {0}")]
    Session(#[from] photon_session::Error),

    /// Reading a local file for upload failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::AuthRequired)
    }

    /// Check if this is a rate-limit error.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Error::RateLimited)
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
