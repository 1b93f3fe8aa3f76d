// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Canned lineage analyzer for testing
//!
//! Answers are keyed by statement text with surrounding whitespace and the
//! terminating semicolon removed, so keys match what the splitter produces.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use sql_coldoc_lineage::{DependencyPath, LineageAnalyzer, LineageError, LineageResult};

fn statement_key(sql: &str) -> String {
    sql.trim().trim_end_matches(';').trim_end().to_string()
}

/// Lineage analyzer returning fixed dependency paths per statement
///
/// Statements without an entry have no dependencies.
#[derive(Debug, Default)]
pub struct StaticLineageAnalyzer {
    answers: HashMap<String, LineageResult<Vec<DependencyPath>>>,
    calls: AtomicUsize,
}

impl StaticLineageAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `sql` with `paths`
    pub fn with_paths(mut self, sql: &str, paths: &[&[&str]]) -> Self {
        let paths = paths
            .iter()
            .map(|path| path.iter().map(|part| part.to_string()).collect())
            .collect();
        self.answers.insert(statement_key(sql), Ok(paths));
        self
    }

    /// Answer `sql` with `error`
    pub fn with_error(mut self, sql: &str, error: LineageError) -> Self {
        self.answers.insert(statement_key(sql), Err(error));
        self
    }

    /// Number of `dependencies` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LineageAnalyzer for StaticLineageAnalyzer {
    fn dependencies(&self, sql: &str) -> LineageResult<Vec<DependencyPath>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answers
            .get(&statement_key(sql))
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_semicolon_and_whitespace() {
        let analyzer = StaticLineageAnalyzer::new()
            .with_paths("SELECT a FROM t", &[&["t.a", "a"]]);

        let paths = analyzer.dependencies("  SELECT a FROM t;\n").unwrap();
        assert_eq!(paths, vec![vec!["t.a".to_string(), "a".to_string()]]);
        assert_eq!(analyzer.calls(), 1);
    }

    #[test]
    fn test_unknown_statement_has_no_paths() {
        let analyzer = StaticLineageAnalyzer::new();
        assert!(analyzer.dependencies("SELECT 1").unwrap().is_empty());
    }

    #[test]
    fn test_scripted_error() {
        let analyzer = StaticLineageAnalyzer::new()
            .with_error("SELEC", LineageError::Parse("bad".to_string()));
        assert!(analyzer.dependencies("SELEC;").is_err());
    }
}
