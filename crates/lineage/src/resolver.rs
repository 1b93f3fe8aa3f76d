// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Lineage resolver
//!
//! Normalizes whatever an analyzer reports into [`LineageEdge`]s:
//!
//! | Path shape | Result |
//! |---|---|
//! | `[source, target]` | used directly |
//! | `[source, target, ...]` | first two elements |
//! | anything shorter | skipped with a warning |
//!
//! An analyzer error means "no edges for this statement"; it is logged and
//! never propagated.

use std::sync::Arc;

use sql_coldoc_ir::LineageEdge;
use tracing::warn;

use crate::r#trait::{DependencyPath, LineageAnalyzer};

/// Normalize one dependency path, `None` when it has fewer than two elements
pub fn normalize_path(path: &[String]) -> Option<LineageEdge> {
    match path {
        [source, target, ..] => Some(LineageEdge::new(source.as_str(), target.as_str())),
        _ => None,
    }
}

/// Derives lineage edges for single statements
#[derive(Clone)]
pub struct LineageResolver {
    analyzer: Arc<dyn LineageAnalyzer>,
}

impl std::fmt::Debug for LineageResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineageResolver").finish_non_exhaustive()
    }
}

impl LineageResolver {
    pub fn new(analyzer: Arc<dyn LineageAnalyzer>) -> Self {
        Self { analyzer }
    }

    /// Lineage edges of `sql`, in the order the analyzer reported them
    pub fn resolve(&self, sql: &str) -> Vec<LineageEdge> {
        let paths = match self.analyzer.dependencies(sql) {
            Ok(paths) => paths,
            Err(e) => {
                warn!(error = %e, "Lineage analysis failed, statement yields no edges");
                return Vec::new();
            }
        };
        normalize_paths(paths)
    }
}

fn normalize_paths(paths: Vec<DependencyPath>) -> Vec<LineageEdge> {
    paths
        .iter()
        .filter_map(|path| {
            let edge = normalize_path(path);
            if edge.is_none() {
                warn!(arity = path.len(), path = ?path, "Skipping malformed lineage path");
            }
            edge
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LineageError, LineageResult};

    struct Canned(LineageResult<Vec<DependencyPath>>);

    impl LineageAnalyzer for Canned {
        fn dependencies(&self, _sql: &str) -> LineageResult<Vec<DependencyPath>> {
            self.0.clone()
        }
    }

    fn path(parts: &[&str]) -> DependencyPath {
        parts.iter().map(|p| p.to_string()).collect()
    }

    fn resolver(result: LineageResult<Vec<DependencyPath>>) -> LineageResolver {
        LineageResolver::new(Arc::new(Canned(result)))
    }

    #[test]
    fn test_normalize_path_shapes() {
        assert_eq!(
            normalize_path(&path(&["orders.total", "report.sum_total"])),
            Some(LineageEdge::new("orders.total", "report.sum_total"))
        );
        assert_eq!(
            normalize_path(&path(&["a.x", "b.y", "c.z"])),
            Some(LineageEdge::new("a.x", "b.y"))
        );
        assert_eq!(normalize_path(&path(&["lonely"])), None);
        assert_eq!(normalize_path(&[]), None);
    }

    #[test]
    fn test_malformed_paths_do_not_drop_siblings() {
        let resolver = resolver(Ok(vec![
            path(&["only_one"]),
            path(&["t.a", "a"]),
            path(&[]),
            path(&["t.b", "b", "extra"]),
        ]));
        assert_eq!(
            resolver.resolve("SELECT a, b FROM t"),
            vec![LineageEdge::new("t.a", "a"), LineageEdge::new("t.b", "b")]
        );
    }

    #[test]
    fn test_analyzer_error_yields_no_edges() {
        let resolver = resolver(Err(LineageError::Parse("bad".to_string())));
        assert!(resolver.resolve("SELEC").is_empty());
    }
}
