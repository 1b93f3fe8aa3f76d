// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error types for the data model

use thiserror::Error;

/// Result type alias for data model operations
pub type IrResult<T> = Result<T, IrError>;

/// Errors raised while converting or serializing model values
#[derive(Debug, Error)]
pub enum IrError {
    /// Dialect name not recognized
    #[error("Unknown SQL dialect: {0}")]
    UnknownDialect(String),

    /// Transformation tag name not part of the taxonomy
    #[error("Unknown transformation tag: {0}")]
    UnknownTransformation(String),

    /// Failed to serialize a context payload or report
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
