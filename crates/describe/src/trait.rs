// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Text generator trait
//!
//! The capability interface in front of the language-model service.

use crate::error::DescribeResult;
use crate::prompt::GenerationRequest;

/// Text-generation service abstraction
///
/// Implementations turn one [`GenerationRequest`] into raw text. They are
/// never retried by the caller, and their output is validated and cached by
/// [`crate::DescriptionGenerator`].
///
/// # Examples
///
/// ```rust,ignore
/// use sql_coldoc_describe::{GenerationRequest, TextGenerator};
///
/// async fn ask(generator: &dyn TextGenerator, request: &GenerationRequest) -> String {
///     generator
///         .generate(request)
///         .await
///         .unwrap_or_else(|e| format!("failed: {e}"))
/// }
/// ```
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for `request`
    ///
    /// # Errors
    ///
    /// Returns a [`crate::DescribeError`] describing why no text was
    /// produced: authentication, HTTP status, transport or response shape.
    async fn generate(&self, request: &GenerationRequest) -> DescribeResult<String>;
}
