// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Batch orchestration
//!
//! Fans a multi-statement batch out over a bounded worker pool and merges
//! the per-column results into one [`ColumnMap`].
//!
//! ## Per statement
//!
//! ```text
//! statement ─┬─ ContextExtractor ─────────┐
//!            ├─ TransformationClassifier ─┼─ per edge: ColumnContext ─ describe ─ ColumnRecord
//!            └─ LineageResolver ──────────┘
//! ```
//!
//! Edges of one statement are described sequentially. Statements run
//! concurrently, at most `worker_count` at a time.
//!
//! ## Merge order
//!
//! Workers never touch the map. Each task stamps its records with a
//! completion sequence number and the orchestrator applies them in that
//! order, so a target produced by several statements ends up with the
//! record of whichever statement finished last (last-writer-wins, no
//! merging of source sets). The same holds for several edges of one
//! statement sharing a target.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use sql_coldoc_context::{ContextExtractor, TransformationClassifier, split_statements};
use sql_coldoc_describe::{CacheStats, DescriptionGenerator, OpenAiGenerator, TextGenerator};
use sql_coldoc_ir::{ColumnContext, ColumnMap, ColumnRecord};
use sql_coldoc_lineage::{LineageAnalyzer, LineageResolver, SqlLineageAnalyzer};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::config::{AnalyzerConfig, ConfigError};
use crate::error::{EngineError, EngineResult};

/// Counters for one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Statements found in the batch
    pub statements: usize,
    /// Statement tasks that panicked or were cancelled
    pub failed_statements: usize,
    /// Distinct target columns in the final map
    pub columns: usize,
}

/// Column map and counters produced by [`BatchAnalyzer::analyze_batch`]
#[derive(Debug, Clone, Default)]
pub struct BatchOutput {
    pub columns: ColumnMap,
    pub summary: BatchSummary,
}

/// Components shared by every statement task
struct StatementPipeline {
    extractor: ContextExtractor,
    classifier: TransformationClassifier,
    resolver: LineageResolver,
    describer: DescriptionGenerator,
}

impl StatementPipeline {
    async fn analyze(&self, sql: &str) -> Vec<ColumnRecord> {
        let context = self.extractor.extract(sql);
        let transformations = self.classifier.classify(sql);
        let edges = self.resolver.resolve(sql);

        if edges.is_empty() {
            debug!(query_type = %context.query_type, "Statement produced no lineage edges");
            return Vec::new();
        }

        let mut records = Vec::with_capacity(edges.len());
        for edge in &edges {
            let column = ColumnContext::for_edge(edge, &transformations, &context);
            let payload = match column.to_payload() {
                Ok(payload) => payload,
                Err(e) => {
                    warn!(column = %column.name, error = %e, "Failed to serialize column context");
                    continue;
                }
            };
            let description = self.describer.describe(&column.name, &payload).await;
            records.push(column.into_record(description));
        }
        records
    }
}

/// Concurrent column lineage and documentation for SQL batches
pub struct BatchAnalyzer {
    pipeline: Arc<StatementPipeline>,
    worker_count: usize,
}

impl std::fmt::Debug for BatchAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchAnalyzer")
            .field("dialect", &self.pipeline.extractor.dialect())
            .field("worker_count", &self.worker_count)
            .field("describer", &self.pipeline.describer)
            .finish_non_exhaustive()
    }
}

impl BatchAnalyzer {
    /// Build an analyzer around explicit lineage and text-generation
    /// capabilities
    ///
    /// The configuration is used as given; call
    /// [`AnalyzerConfig::validate`] first when it comes from user input.
    pub fn new(
        config: &AnalyzerConfig,
        lineage: Arc<dyn LineageAnalyzer>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        let pipeline = StatementPipeline {
            extractor: ContextExtractor::new(config.dialect),
            classifier: TransformationClassifier::new(),
            resolver: LineageResolver::new(lineage),
            describer: DescriptionGenerator::new(generator, config.generation.clone()),
        };
        Self {
            pipeline: Arc::new(pipeline),
            worker_count: config.worker_count.max(1),
        }
    }

    /// Validate `config` and build the built-in `sqlparser` lineage
    /// analyzer and OpenAI-compatible generator from it
    pub fn from_config(config: &AnalyzerConfig) -> EngineResult<Self> {
        config.validate()?;
        let generator = OpenAiGenerator::new(&config.generation)
            .map_err(|e| ConfigError::Generator(e.to_string()))?;
        let lineage = SqlLineageAnalyzer::new(config.dialect);
        Ok(Self::new(config, Arc::new(lineage), Arc::new(generator)))
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.pipeline.describer.cache_stats()
    }

    /// Records for one statement, one per lineage edge, in edge order
    pub async fn analyze_statement(&self, sql: &str) -> Vec<ColumnRecord> {
        self.pipeline.analyze(sql).await
    }

    /// Analyze every statement of `sql` and merge the results
    ///
    /// Returns once every statement task has finished or failed. A failing
    /// statement is logged and counted, never fatal.
    ///
    /// # Errors
    ///
    /// [`EngineError::NoInput`] when `sql` is empty or whitespace only.
    pub async fn analyze_batch(&self, sql: &str) -> EngineResult<BatchOutput> {
        if sql.trim().is_empty() {
            return Err(EngineError::NoInput);
        }

        let statements = split_statements(sql, self.pipeline.extractor.dialect());
        let statement_count = statements.len();
        info!(
            statements = statement_count,
            workers = self.worker_count,
            "Analyzing batch"
        );

        let semaphore = Arc::new(Semaphore::new(self.worker_count));
        let completed = Arc::new(AtomicU64::new(0));
        let mut tasks = JoinSet::new();

        for (index, statement) in statements.into_iter().enumerate() {
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                error!("Worker pool closed, remaining statements skipped");
                break;
            };
            let pipeline = Arc::clone(&self.pipeline);
            let completed = Arc::clone(&completed);

            tasks.spawn(async move {
                let _permit = permit;
                let records = pipeline.analyze(&statement).await;
                let sequence = completed.fetch_add(1, Ordering::SeqCst);
                debug!(index, sequence, records = records.len(), "Statement analyzed");
                (sequence, records)
            });
        }

        let mut finished = Vec::with_capacity(statement_count);
        let mut failed_statements = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => finished.push(result),
                Err(e) => {
                    failed_statements += 1;
                    error!(error = %e, "Statement task failed, skipping it");
                }
            }
        }

        // Single writer: apply in completion order
        finished.sort_by_key(|(sequence, _)| *sequence);
        let mut columns = ColumnMap::new();
        for (_, records) in finished {
            for record in records {
                if columns.upsert(record).is_some() {
                    debug!("Target column overwritten by a later record");
                }
            }
        }

        let summary = BatchSummary {
            statements: statement_count,
            failed_statements,
            columns: columns.len(),
        };
        let cache = self.cache_stats();
        info!(
            statements = summary.statements,
            failed = summary.failed_statements,
            columns = summary.columns,
            cache_hits = cache.hits,
            cache_misses = cache.misses,
            "Batch analyzed"
        );

        Ok(BatchOutput { columns, summary })
    }

    /// [`analyze_batch`](Self::analyze_batch) without the counters
    pub async fn analyze_columns(&self, sql: &str) -> EngineResult<ColumnMap> {
        Ok(self.analyze_batch(sql).await?.columns)
    }
}
