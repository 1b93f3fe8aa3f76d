// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # sql-coldoc describe
//!
//! Natural-language descriptions for target columns.
//!
//! A [`DescriptionGenerator`] fronts any [`TextGenerator`] with a bounded
//! LRU cache and a per-request timeout. Failures never escape as errors;
//! they become `"Error generating description: ..."` text that is cached
//! like a normal description.
//!
//! ```no_run
//! use std::sync::Arc;
//! use sql_coldoc_describe::{DescriptionGenerator, GenerationConfig, OpenAiGenerator};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GenerationConfig::from_env();
//! let client = OpenAiGenerator::new(&config)?;
//! let generator = DescriptionGenerator::new(Arc::new(client), config);
//! let text = generator.describe("total", r#"{"name":"total"}"#).await;
//! println!("{text}");
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod generator;
pub mod openai;
pub mod prompt;
pub mod r#trait;

pub use cache::{CacheStats, DescriptionCache, cache_key};
pub use config::GenerationConfig;
pub use error::{DescribeError, DescribeResult};
pub use generator::{DescriptionGenerator, ERROR_PREFIX, is_error_description};
pub use openai::OpenAiGenerator;
pub use prompt::{GenerationRequest, SYSTEM_ROLE, build_prompt, validate_description};
pub use r#trait::TextGenerator;
