//! Error types for meishi-stocks

use thiserror::Error;

/// meishi-stocks error type
#[derive(Error, Debug)]
pub enum StockError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Stock API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] meishi_core::Error),
}

impl From<StockError> for meishi_core::Error {
    fn from(err: StockError) -> Self {
        match err {
            StockError::NotFound(what) => meishi_core::Error::NotFound(what),
            StockError::Rejected(reason) => meishi_core::Error::ValidationFailed(reason),
            StockError::Config(msg) => meishi_core::Error::Config(msg),
            StockError::Core(inner) => inner,
            other => meishi_core::Error::BackendUnavailable(other.to_string()),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, StockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_into_core_taxonomy() {
        let core: meishi_core::Error = StockError::NotFound("item 9".into()).into();
        assert!(matches!(core, meishi_core::Error::NotFound(_)));

        let core: meishi_core::Error = StockError::Rejected("duplicate".into()).into();
        assert!(matches!(core, meishi_core::Error::ValidationFailed(_)));

        let core: meishi_core::Error = StockError::Api {
            status: 500,
            message: "boom".into(),
        }
        .into();
        assert!(core.is_backend());
    }
}
