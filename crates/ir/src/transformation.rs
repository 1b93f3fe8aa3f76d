// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Transformation taxonomy
//!
//! The fixed set of transformation categories a statement can carry.
//! Tags are ordered by declaration so that a [`TransformationSet`] always
//! serializes the same way, which keeps description cache keys stable.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IrError;

/// A category of SQL operation applied while deriving a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TransformationTag {
    /// Aggregate functions, `GROUP BY`, `HAVING`
    #[serde(rename = "Aggregation")]
    Aggregation,
    /// `OVER (...)`, `PARTITION BY`, ranking and offset functions
    #[serde(rename = "Window Function")]
    WindowFunction,
    /// `CAST`, `CONVERT`, `TRY_CAST`
    #[serde(rename = "Type Conversion")]
    TypeConversion,
    /// String functions and `LIKE`
    #[serde(rename = "Text Operation")]
    TextOperation,
    /// Date arithmetic and truncation
    #[serde(rename = "Date Operation")]
    DateOperation,
    /// `CASE ... END`, `IIF`
    #[serde(rename = "Case Statement")]
    CaseStatement,
    /// Explicit `INNER|LEFT|RIGHT|FULL|CROSS JOIN`
    #[serde(rename = "Join Operation")]
    JoinOperation,
}

/// Deduplicated, ordered set of transformation tags
pub type TransformationSet = BTreeSet<TransformationTag>;

impl TransformationTag {
    /// Every tag in the taxonomy
    pub const ALL: [TransformationTag; 7] = [
        TransformationTag::Aggregation,
        TransformationTag::WindowFunction,
        TransformationTag::TypeConversion,
        TransformationTag::TextOperation,
        TransformationTag::DateOperation,
        TransformationTag::CaseStatement,
        TransformationTag::JoinOperation,
    ];

    /// Human-readable label used in prompts and reports
    pub fn label(&self) -> &'static str {
        match self {
            TransformationTag::Aggregation => "Aggregation",
            TransformationTag::WindowFunction => "Window Function",
            TransformationTag::TypeConversion => "Type Conversion",
            TransformationTag::TextOperation => "Text Operation",
            TransformationTag::DateOperation => "Date Operation",
            TransformationTag::CaseStatement => "Case Statement",
            TransformationTag::JoinOperation => "Join Operation",
        }
    }
}

impl fmt::Display for TransformationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TransformationTag {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransformationTag::ALL
            .into_iter()
            .find(|tag| tag.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| IrError::UnknownTransformation(s.to_string()))
    }
}

/// Join tag labels with `", "`, in taxonomy order
pub fn join_labels(tags: &TransformationSet) -> String {
    tags.iter().map(|t| t.label()).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_parse_back() {
        for tag in TransformationTag::ALL {
            assert_eq!(tag.label().parse::<TransformationTag>().unwrap(), tag);
        }
        assert_eq!(
            "window function".parse::<TransformationTag>().unwrap(),
            TransformationTag::WindowFunction
        );
    }

    #[test]
    fn test_serializes_as_label() {
        let json = serde_json::to_string(&TransformationTag::TypeConversion).unwrap();
        assert_eq!(json, "\"Type Conversion\"");
    }

    #[test]
    fn test_set_is_ordered_and_deduplicated() {
        let mut set = TransformationSet::new();
        set.insert(TransformationTag::JoinOperation);
        set.insert(TransformationTag::Aggregation);
        set.insert(TransformationTag::JoinOperation);

        assert_eq!(set.len(), 2);
        assert_eq!(join_labels(&set), "Aggregation, Join Operation");
    }

    #[test]
    fn test_unknown_label() {
        assert!("Pivot".parse::<TransformationTag>().is_err());
    }
}
