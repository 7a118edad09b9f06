//! Error types for table configuration and request handling.
//!
//! Filter rejections are deliberately absent: a search term a column's filter
//! refuses is dropped from the request state, it never surfaces as an error.

use thiserror::Error;

/// Boxed backend failure carried by [`DataTableError::Adapter`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while configuring a table or answering a grid request.
#[derive(Debug, Error)]
pub enum DataTableError {
    /// Bad or missing option at setup time, or an unsupported request method.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An operation was invoked before its prerequisites were in place.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A column reference did not resolve.
    #[error("not found: {0}")]
    NotFound(String),

    /// The backend call failed. The source is passed through unmodified.
    #[error("adapter failure: {0}")]
    Adapter(#[source] BoxError),

    /// Template compilation or rendering failed for a cell.
    #[error("render error: {0}")]
    Render(String),

    /// The export collaborator failed.
    #[error("export failed: {0}")]
    Export(String),

    /// JSON (de)serialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DataTableError {
    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an invalid-state error.
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Create a not-found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Wrap a backend failure.
    pub fn adapter(err: impl Into<BoxError>) -> Self {
        Self::Adapter(err.into())
    }
}

impl From<minijinja::Error> for DataTableError {
    fn from(err: minijinja::Error) -> Self {
        DataTableError::Render(err.to_string())
    }
}

impl From<datatables_seeker::SeekerError> for DataTableError {
    fn from(err: datatables_seeker::SeekerError) -> Self {
        DataTableError::Configuration(err.to_string())
    }
}

/// Result type for datatables operations.
pub type Result<T> = std::result::Result<T, DataTableError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category() {
        let err = DataTableError::configuration("duplicate column 'name'");
        assert_eq!(
            err.to_string(),
            "configuration error: duplicate column 'name'"
        );
        assert!(DataTableError::not_found("column 3")
            .to_string()
            .starts_with("not found"));
    }

    #[test]
    fn adapter_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = DataTableError::adapter(io);
        let source = std::error::Error::source(&err).expect("source");
        assert_eq!(source.to_string(), "refused");
    }

    #[test]
    fn from_minijinja_error() {
        let mj = minijinja::Error::new(minijinja::ErrorKind::SyntaxError, "unexpected end");
        assert!(matches!(DataTableError::from(mj), DataTableError::Render(_)));
    }
}
