// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # sql-coldoc - Statement Context Layer
//!
//! Per-statement analysis that needs no lineage information:
//!
//! - [`splitter`]: splits a batch into statements without breaking string
//!   literals, quoted identifiers or comments
//! - [`extractor`]: tokenizes one statement and captures its query type,
//!   tables and the verbatim `JOIN`, `WHERE`, `GROUP BY` and `ORDER BY`
//!   fragments
//! - [`classifier`]: tags a statement with transformation categories by
//!   pattern matching
//!
//! None of these operations fail. Malformed SQL produces a degraded
//! context or an empty tag set, and the batch carries on.
//!
//! ## Examples
//!
//! ```rust
//! use sql_coldoc_context::{ContextExtractor, TransformationClassifier, split_statements};
//! use sql_coldoc_ir::{Dialect, TransformationTag};
//!
//! let batch = "SELECT SUM(amount) AS total FROM orders; SELECT 1;";
//! let statements = split_statements(batch, Dialect::Generic);
//! assert_eq!(statements.len(), 2);
//!
//! let context = ContextExtractor::new(Dialect::Generic).extract(&statements[0]);
//! assert_eq!(context.tables, vec!["orders"]);
//!
//! let tags = TransformationClassifier::new().classify(&statements[0]);
//! assert!(tags.contains(&TransformationTag::Aggregation));
//! ```

pub mod classifier;
pub mod extractor;
mod source;
pub mod splitter;

pub use classifier::{TransformationClassifier, classify_transformations};
pub use extractor::ContextExtractor;
pub use splitter::split_statements;
