// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Description generator
//!
//! Cache-fronted description service for target columns.
//!
//! 1. Hash (column, payload) into a cache key; a resident key returns the
//!    stored text without calling the service.
//! 2. On a miss, build the request and call the [`TextGenerator`] under the
//!    configured timeout.
//! 3. Successful text goes through [`validate_description`].
//! 4. Failures become `"Error generating description: {error}"`. That text
//!    is cached like any other, so a failed pair is not retried.

use std::num::NonZeroUsize;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::{CacheStats, DescriptionCache, cache_key};
use crate::config::GenerationConfig;
use crate::error::DescribeError;
use crate::prompt::{GenerationRequest, validate_description};
use crate::r#trait::TextGenerator;

/// Prefix of descriptions produced from a failed generation
pub const ERROR_PREFIX: &str = "Error generating description: ";

/// Whether `description` is a generation-failure sentinel
pub fn is_error_description(description: &str) -> bool {
    description.starts_with(ERROR_PREFIX)
}

/// Cached, validated column descriptions
pub struct DescriptionGenerator {
    generator: Arc<dyn TextGenerator>,
    cache: DescriptionCache,
    config: GenerationConfig,
}

impl std::fmt::Debug for DescriptionGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DescriptionGenerator")
            .field("cache", &self.cache.stats())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DescriptionGenerator {
    /// Wrap `generator` with a cache sized from `config`
    ///
    /// A zero capacity is raised to one entry; configuration validation
    /// rejects it earlier on the normal path.
    pub fn new(generator: Arc<dyn TextGenerator>, config: GenerationConfig) -> Self {
        let capacity = NonZeroUsize::new(config.cache_capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            generator,
            cache: DescriptionCache::new(capacity),
            config,
        }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Description of `column` given its serialized context
    ///
    /// Never fails: generation errors are returned as sentinel text.
    pub async fn describe(&self, column: &str, payload: &str) -> String {
        let key = cache_key(column, payload);
        self.cache
            .get_or_generate(key, || self.generate(column, payload))
            .await
    }

    async fn generate(&self, column: &str, payload: &str) -> String {
        let request = GenerationRequest::for_column(payload, &self.config);
        let call = self.generator.generate(&request);
        let result = match tokio::time::timeout(self.config.timeout(), call).await {
            Ok(result) => result,
            Err(_) => Err(DescribeError::Timeout(self.config.timeout_secs)),
        };

        match result {
            Ok(text) => {
                debug!(column, "Generated column description");
                validate_description(&text)
            }
            Err(e) => {
                warn!(column, error = %e, "Description generation failed");
                format!("{ERROR_PREFIX}{e}")
            }
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DescribeResult;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Counts calls and replies with a fixed outcome
    struct Scripted {
        calls: AtomicUsize,
        reply: DescribeResult<String>,
        delay: Option<Duration>,
    }

    impl Scripted {
        fn new(reply: DescribeResult<String>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                reply,
                delay: None,
            })
        }

        fn hanging() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                reply: Ok("too late".to_string()),
                delay: Some(Duration::from_secs(3600)),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl TextGenerator for Scripted {
        async fn generate(&self, _request: &GenerationRequest) -> DescribeResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.reply.clone()
        }
    }

    fn generator(text: Arc<Scripted>) -> DescriptionGenerator {
        DescriptionGenerator::new(text, GenerationConfig::default())
    }

    #[tokio::test]
    async fn test_describe_validates_and_caches() {
        let service = Scripted::new(Ok("Sum of order amounts as noted".to_string()));
        let generator = generator(service.clone());

        let first = generator.describe("total", "{\"name\":\"total\"}").await;
        let second = generator.describe("total", "{\"name\":\"total\"}").await;

        assert_eq!(first, "Sum of order amounts.");
        assert_eq!(first, second);
        assert_eq!(service.calls(), 1);
        assert_eq!(generator.cache_stats().hits, 1);
    }

    #[tokio::test]
    async fn test_different_context_is_a_new_key() {
        let service = Scripted::new(Ok("Text".to_string()));
        let generator = generator(service.clone());

        generator.describe("total", "{\"a\":1}").await;
        generator.describe("total", "{\"a\":2}").await;
        generator.describe("amount", "{\"a\":1}").await;

        assert_eq!(service.calls(), 3);
    }

    #[tokio::test]
    async fn test_failure_becomes_cached_sentinel() {
        let service = Scripted::new(Err(DescribeError::Authentication("bad key".to_string())));
        let generator = generator(service.clone());

        let first = generator.describe("total", "{}").await;
        let second = generator.describe("total", "{}").await;

        assert_eq!(first, "Error generating description: authentication failed: bad key");
        assert!(is_error_description(&second));
        assert_eq!(service.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_becomes_cached_sentinel() {
        let service = Scripted::hanging();
        let config = GenerationConfig {
            timeout_secs: 2,
            ..Default::default()
        };
        let generator = DescriptionGenerator::new(service.clone(), config);

        let first = generator.describe("total", "{}").await;
        let second = generator.describe("total", "{}").await;

        assert_eq!(first, "Error generating description: request timed out after 2s");
        assert_eq!(second, first);
        assert_eq!(service.calls(), 1);
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let config = GenerationConfig {
            cache_capacity: 0,
            ..Default::default()
        };
        let generator = DescriptionGenerator::new(Scripted::new(Ok(String::new())), config);
        assert_eq!(generator.cache_stats().len, 0);
    }
}
