// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error types for description generation
//!
//! A [`DescribeError`] never escapes [`crate::DescriptionGenerator`]; it is
//! rendered into the description text instead. The `Display` output is
//! therefore user-facing.

use thiserror::Error;

/// Result type alias for description operations
pub type DescribeResult<T> = Result<T, DescribeError>;

/// Failures of the text-generation service
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DescribeError {
    /// The call did not finish within the configured timeout
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// The service rejected the credentials (HTTP 401/403)
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Any other non-success HTTP status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The request could not be sent or the body not read
    #[error("request failed: {0}")]
    Request(String),

    /// The service answered without usable text
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The generator cannot be built from its configuration
    #[error("invalid generation configuration: {0}")]
    Configuration(String),
}
