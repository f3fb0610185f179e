use thiserror::Error;

pub type Result<T> = std::result::Result<T, DicerError>;

#[derive(Debug, Error)]
pub enum DicerError {
    #[error("invalid {field} `{value}`: {reason}")]
    InvalidConfiguration {
        field: &'static str,
        value: u64,
        reason: &'static str,
    },
    #[error("player index {index} is out of range for a roster of {len}")]
    OutOfRange { index: usize, len: usize },
    #[error("the player roster is empty")]
    EmptyRoster,
    #[error("audio output unavailable: {0}")]
    ResourceUnavailable(String),
    #[error("could not parse dice notation `{0}`")]
    Notation(String),
    #[error("file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl DicerError {
    pub(crate) fn invalid(field: &'static str, value: impl Into<u64>, reason: &'static str) -> Self {
        DicerError::InvalidConfiguration {
            field,
            value: value.into(),
            reason,
        }
    }

    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, DicerError::InvalidConfiguration { .. })
    }
}
