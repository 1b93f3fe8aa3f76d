// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Engine Configuration
//!
//! Settings for one batch analyzer.
//!
//! ## Sources
//!
//! Configuration is layered, later layers winning:
//! 1. Built-in defaults
//! 2. An optional YAML file, every field optional
//! 3. Environment overrides for the text-generation service
//!    (`OPENAI_API_KEY`, `OPENAI_BASE_URL`, `OPENAI_MODEL`)
//! 4. Command-line flags, applied by the binary
//!
//! [`AnalyzerConfig::validate`] runs last.
//!
//! ## Example
//!
//! ```rust
//! use sql_coldoc_engine::AnalyzerConfig;
//! use sql_coldoc_ir::Dialect;
//!
//! let config = AnalyzerConfig::from_yaml_str(
//!     "dialect: postgresql\nworker_count: 8\ngeneration:\n  model: gpt-4o\n",
//! )
//! .unwrap();
//! assert_eq!(config.dialect, Dialect::PostgreSQL);
//! assert_eq!(config.generation.timeout_secs, 30);
//! config.validate().unwrap();
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use sql_coldoc_describe::GenerationConfig;
use sql_coldoc_ir::Dialect;

/// Default number of statements analyzed concurrently
pub const DEFAULT_WORKER_COUNT: usize = 4;

/// Upper bound accepted for `generation.temperature`
pub const MAX_TEMPERATURE: f32 = 2.0;

/// Batch analyzer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Dialect used for tokenizing and lineage parsing
    pub dialect: Dialect,

    /// Maximum number of statements processed at once
    pub worker_count: usize,

    /// Text-generation and description cache settings
    pub generation: GenerationConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            worker_count: DEFAULT_WORKER_COUNT,
            generation: GenerationConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Parse YAML text; an empty document yields the defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a YAML configuration file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Apply environment overrides from `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        self.generation.apply_env(lookup);
    }

    /// Apply overrides from the process environment
    pub fn with_process_env(mut self) -> Self {
        self.apply_env(|name| std::env::var(name).ok());
        self
    }

    /// Validate the configuration
    ///
    /// Checks that:
    /// - at least one worker is configured
    /// - the description cache can hold an entry
    /// - generation calls have a non-zero timeout
    /// - the temperature lies in `0.0..=2.0`
    /// - a model is named
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count == 0 {
            return Err(ConfigError::InvalidWorkerCount);
        }

        let generation = &self.generation;
        if generation.cache_capacity == 0 {
            return Err(ConfigError::InvalidCacheCapacity);
        }
        if generation.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        if !(0.0..=MAX_TEMPERATURE).contains(&generation.temperature) {
            return Err(ConfigError::InvalidTemperature(generation.temperature));
        }
        if generation.model.trim().is_empty() {
            return Err(ConfigError::MissingModel);
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading the configuration file failed
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid YAML for this schema
    #[error("Invalid configuration file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("worker_count must be greater than 0")]
    InvalidWorkerCount,

    #[error("generation.cache_capacity must be greater than 0")]
    InvalidCacheCapacity,

    #[error("generation.timeout_secs must be greater than 0")]
    InvalidTimeout,

    #[error("generation.temperature must be between 0.0 and 2.0, got {0}")]
    InvalidTemperature(f32),

    #[error("generation.model must not be empty")]
    MissingModel,

    /// The text-generation client could not be created
    #[error("Text generator unavailable: {0}")]
    Generator(String),
}
