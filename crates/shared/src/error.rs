use thiserror::Error;

/// Rejected form input. Raised before any request leaves the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("party name is required")]
    MissingName,
    #[error("invalid party date `{0}`; expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("invalid party time `{0}`; expected HH:MM")]
    InvalidTime(String),
}

/// A JSON response that parsed fine but does not look like party data.
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("response is missing the `{0}` envelope field")]
    MissingEnvelope(&'static str),
    #[error("expected a JSON array of parties, found {0}")]
    NotAnArray(&'static str),
    #[error("malformed party record: {0}")]
    Record(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
