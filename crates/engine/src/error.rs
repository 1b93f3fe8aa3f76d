// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Engine errors
//!
//! Only conditions the caller must act on surface here. Per-statement and
//! per-column failures are logged and absorbed by the orchestrator.

use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// The batch text is empty or whitespace only
    #[error("No SQL provided")]
    NoInput,

    /// Invalid or unloadable configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Reading input or writing output failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The report could not be rendered
    #[error("Export failed: {0}")]
    Export(String),
}
