// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Mock text generator for testing
//!
//! Deterministic stand-in for the external text-generation service, with a
//! builder for scripted replies, failures and hangs.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use sql_coldoc_describe::{DescribeError, DescribeResult, GenerationRequest, TextGenerator};

/// Fixed reply when nothing else is scripted
pub const DEFAULT_REPLY: &str = "Generated description";

#[derive(Debug, Clone)]
enum Behavior {
    Reply(String),
    Fail(DescribeError),
    Hang,
}

/// Text generator double that counts and records every call
#[derive(Debug)]
pub struct MockTextGenerator {
    behavior: Behavior,
    scripted: Mutex<VecDeque<DescribeResult<String>>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl Default for MockTextGenerator {
    fn default() -> Self {
        MockGeneratorBuilder::new().build()
    }
}

impl MockTextGenerator {
    /// Generator replying [`DEFAULT_REPLY`] to every request
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `generate` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request received, in call order
    pub fn requests(&self) -> Vec<GenerationRequest> {
        lock(&self.requests).clone()
    }

    /// Prompts of every request received, in call order
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.requests)
            .iter()
            .map(|request| request.prompt.clone())
            .collect()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait::async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(&self, request: &GenerationRequest) -> DescribeResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.requests).push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = lock(&self.scripted).pop_front();
        if let Some(outcome) = scripted {
            return outcome;
        }

        match &self.behavior {
            Behavior::Reply(text) => Ok(text.clone()),
            Behavior::Fail(error) => Err(error.clone()),
            Behavior::Hang => std::future::pending().await,
        }
    }
}

/// Builder for mock generators with a fluent API
pub struct MockGeneratorBuilder {
    behavior: Behavior,
    scripted: VecDeque<DescribeResult<String>>,
    delay: Option<Duration>,
}

impl Default for MockGeneratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGeneratorBuilder {
    pub fn new() -> Self {
        Self {
            behavior: Behavior::Reply(DEFAULT_REPLY.to_string()),
            scripted: VecDeque::new(),
            delay: None,
        }
    }

    /// Reply `text` once the scripted outcomes are used up
    pub fn with_reply(mut self, text: impl Into<String>) -> Self {
        self.behavior = Behavior::Reply(text.into());
        self
    }

    /// Queue one outcome, consumed in call order before the fallback
    pub fn then(mut self, outcome: DescribeResult<String>) -> Self {
        self.scripted.push_back(outcome);
        self
    }

    /// Fail every unscripted call with `error`
    pub fn failing(mut self, error: DescribeError) -> Self {
        self.behavior = Behavior::Fail(error);
        self
    }

    /// Never complete unscripted calls
    pub fn hanging(mut self) -> Self {
        self.behavior = Behavior::Hang;
        self
    }

    /// Sleep `delay` before answering each call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn build(self) -> MockTextGenerator {
        MockTextGenerator {
            behavior: self.behavior,
            scripted: Mutex::new(self.scripted),
            delay: self.delay,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sql_coldoc_describe::GenerationConfig;

    fn request(payload: &str) -> GenerationRequest {
        GenerationRequest::for_column(payload, &GenerationConfig::default())
    }

    #[tokio::test]
    async fn test_default_reply_and_counter() {
        let mock = MockTextGenerator::new();
        assert_eq!(mock.generate(&request("{}")).await.unwrap(), DEFAULT_REPLY);
        assert_eq!(mock.generate(&request("{}")).await.unwrap(), DEFAULT_REPLY);
        assert_eq!(mock.calls(), 2);
        assert_eq!(mock.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_scripted_outcomes_come_first() {
        let mock = MockGeneratorBuilder::new()
            .then(Ok("first".to_string()))
            .then(Err(DescribeError::Request("reset".to_string())))
            .with_reply("rest")
            .build();

        assert_eq!(mock.generate(&request("a")).await.unwrap(), "first");
        assert!(mock.generate(&request("b")).await.is_err());
        assert_eq!(mock.generate(&request("c")).await.unwrap(), "rest");
        assert!(mock.prompts()[2].contains('c'));
    }

    #[tokio::test]
    async fn test_failing_mode() {
        let mock = MockGeneratorBuilder::new()
            .failing(DescribeError::Timeout(30))
            .build();
        assert_eq!(
            mock.generate(&request("{}")).await,
            Err(DescribeError::Timeout(30))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_mode_never_answers() {
        let mock = MockGeneratorBuilder::new().hanging().build();
        let outcome =
            tokio::time::timeout(Duration::from_secs(5), mock.generate(&request("{}"))).await;
        assert!(outcome.is_err());
        assert_eq!(mock.calls(), 1);
    }
}
