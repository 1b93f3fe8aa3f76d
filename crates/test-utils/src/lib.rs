// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Testing utilities for sql-coldoc
//!
//! This crate provides common testing components including:
//! - A counting, scriptable text generator double
//! - A canned lineage analyzer
//! - Column map and report assertions
//! - SQL fixtures and a text format for lineage cases

pub mod assertions;
pub mod fixtures;
pub mod lineage_case;
pub mod mock_generator;
pub mod mock_lineage;

// Re-exports for convenience
pub use assertions::ColumnAssertions;
pub use fixtures::SqlFixtures;
pub use lineage_case::{CaseParseError, LineageCase, parse_case_content, parse_case_file};
pub use mock_generator::{DEFAULT_REPLY, MockGeneratorBuilder, MockTextGenerator};
pub use mock_lineage::StaticLineageAnalyzer;
