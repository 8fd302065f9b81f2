use thiserror::Error;

use crate::endpoints::Endpoint;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    #[error("Error {status}: could not fetch {}", .endpoint.description())]
    Status { endpoint: Endpoint, status: u16 },

    #[error("could not decode {} from {endpoint}: {source}", .endpoint.description())]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {endpoint} was cancelled")]
    Cancelled { endpoint: Endpoint },
}

impl ApiError {
    /// The endpoint that failed, when the error came from a request.
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            ApiError::InvalidBaseUrl { .. } => None,
            ApiError::Request { endpoint, .. }
            | ApiError::Status { endpoint, .. }
            | ApiError::Decode { endpoint, .. }
            | ApiError::Cancelled { endpoint } => Some(*endpoint),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled { .. })
    }

    /// The single alert line a dashboard shows when loading fails.
    pub fn user_message(&self, base_url: &str) -> String {
        format!(
            "Error loading data: {}. Please verify that the server is running at {}.",
            self,
            base_url.trim_end_matches('/')
        )
    }
}
