//! Error types for dotq.

use thiserror::Error;

/// The main error type for dotq operations.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Failed to parse a dotted query string.
    #[error("Parse error at token {position}: {message}")]
    Parse { position: usize, message: String },

    /// `And`/`Or` built without operands.
    #[error("Empty operand list for '{0}'")]
    EmptyOperands(&'static str),

    /// Unknown date relation.
    #[error("Invalid relation: '{0}'. Expected: eq, ne, lt, le, gt, or ge")]
    InvalidRelation(String),

    /// Unknown state type.
    #[error("Invalid state type: '{0}'. Expected: done, todo, or none")]
    InvalidStateType(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl QueryError {
    /// Create a parse error at the given token position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }
}

/// Result type alias for dotq operations.
pub type QueryResult<T> = Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QueryError::parse(2, "unbalanced ')'");
        assert_eq!(err.to_string(), "Parse error at token 2: unbalanced ')'");
    }

    #[test]
    fn test_empty_operands_display() {
        assert_eq!(
            QueryError::EmptyOperands("or").to_string(),
            "Empty operand list for 'or'"
        );
    }
}
