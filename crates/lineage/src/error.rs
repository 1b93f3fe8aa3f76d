// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error types for lineage analysis

use thiserror::Error;

/// Result type alias for lineage operations
pub type LineageResult<T> = Result<T, LineageError>;

/// Errors a lineage analyzer can report for one statement
///
/// Neither variant is fatal to a batch: the resolver logs it and treats the
/// statement as having no lineage edges.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LineageError {
    /// The statement could not be parsed
    #[error("Failed to parse statement: {0}")]
    Parse(String),

    /// The statement parsed but uses a construct the analyzer cannot follow
    #[error("Unsupported construct: {0}")]
    Unsupported(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LineageError::Parse("Expected: an expression, found: EOF".to_string());
        assert_eq!(
            err.to_string(),
            "Failed to parse statement: Expected: an expression, found: EOF"
        );

        let err = LineageError::Unsupported("INSERT into a table function".to_string());
        assert!(err.to_string().starts_with("Unsupported construct"));
    }
}
