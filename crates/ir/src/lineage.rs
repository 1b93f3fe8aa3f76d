// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Lineage edges

use std::fmt;

use serde::{Deserialize, Serialize};

/// A directed provenance relationship: `target` derives from `source`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineageEdge {
    /// Source column identifier, e.g. `orders.amount`
    pub source: String,
    /// Target column identifier, e.g. `total` or `report.sum_total`
    pub target: String,
}

impl LineageEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for LineageEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_display() {
        let edge = LineageEdge::new("orders.amount", "total");
        assert_eq!(edge.to_string(), "orders.amount -> total");
    }
}
