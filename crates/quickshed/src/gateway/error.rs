//! Error types for the remote data gateway.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while talking to the timetable backend.
///
/// All variants are terminal for the user action that triggered them. Nothing
/// is retried.
#[derive(Debug, Error, Clone)]
pub enum GatewayError {
    /// Network/HTTP transport failed
    #[error("Network error: {message}")]
    Network { message: String },

    /// Backend answered with a non-2xx status
    #[error("Request to {path} failed with status {status}: {body}")]
    Status {
        path: String,
        status: StatusCode,
        body: String,
    },

    /// Response body could not be decoded
    #[error("Unexpected response from {path}: {message}")]
    Decode { path: String, message: String },

    /// URL parsing/construction failed
    #[error("URL error: {message}")]
    UrlError { message: String },

    /// A protected call was attempted without a stored access token
    #[error("Not signed in")]
    NotAuthenticated,

    /// The session store could not be read or written
    #[error("Session storage error: {message}")]
    Session { message: String },
}

impl GatewayError {
    /// Returns the HTTP status for `Status` errors.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            GatewayError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true when the backend rejected the credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN)
        ) || matches!(self, GatewayError::NotAuthenticated)
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return GatewayError::Decode {
                path: err
                    .url()
                    .map(|u| u.path().to_string())
                    .unwrap_or_default(),
                message: err.to_string(),
            };
        }
        GatewayError::Network {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for GatewayError {
    fn from(err: url::ParseError) -> Self {
        GatewayError::UrlError {
            message: err.to_string(),
        }
    }
}

impl From<crate::session::SessionError> for GatewayError {
    fn from(err: crate::session::SessionError) -> Self {
        GatewayError::Session {
            message: err.to_string(),
        }
    }
}
