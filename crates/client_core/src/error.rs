use std::time::Duration;

use shared::{
    domain::PartyId,
    error::{FormError, ShapeError},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },
    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("unexpected response shape: {0}")]
    Shape(#[from] ShapeError),
    #[error("client configuration unavailable: {0}")]
    Config(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status } => Some(*status),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::Shape(_))
    }
}

/// Failure of a user-triggered action.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("invalid party form: {0}")]
    Form(#[from] FormError),
    #[error("party id `{0}` cannot be used as a path segment")]
    InvalidId(PartyId),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ActionError {
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            Self::Form(_) | Self::InvalidId(_) => None,
        }
    }
}
