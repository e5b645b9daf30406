/// Core error types for the ear trainer
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for catalog lookup and chord resolution
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The catalog has no progression registered under this id
    #[error("Unknown progression id: {0}")]
    UnknownProgressionId(String),

    /// A catalog entry is malformed
    #[error("Invalid template '{id}': {reason}")]
    InvalidTemplate { id: String, reason: String },

    /// A roman numeral could not be parsed into a chord slot
    #[error("Invalid roman numeral '{0}'")]
    InvalidNumeral(String),

    /// A key name could not be parsed
    #[error("Invalid key '{0}'")]
    InvalidKey(String),

    /// The catalog document itself could not be read
    #[error("Catalog format error: {0}")]
    CatalogFormat(String),
}

impl CoreError {
    /// Create an invalid template error
    pub fn invalid_template(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::CatalogFormat(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = CoreError::UnknownProgressionId("nope".to_string());
        assert_eq!(err.to_string(), "Unknown progression id: nope");

        let err = CoreError::invalid_template("blues", "slot 3: degree 9 is outside 1..=7");
        assert_eq!(
            err.to_string(),
            "Invalid template 'blues': slot 3: degree 9 is outside 1..=7"
        );
    }
}
