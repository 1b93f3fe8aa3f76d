// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Transformation classification
//!
//! Heuristic tagging of a statement with [`TransformationTag`]s. Every tag
//! owns a family of case-insensitive patterns; the tag is present when any
//! of them matches anywhere in the statement text, including inside
//! comments and string literals.
//!
//! The patterns are compiled once per process.

use std::sync::OnceLock;

use regex::Regex;
use sql_coldoc_ir::{TransformationSet, TransformationTag};
use tracing::error;

/// Pattern sources, per tag
const PATTERNS: &[(TransformationTag, &[&str])] = &[
    (
        TransformationTag::Aggregation,
        &[r"\b(SUM|AVG|COUNT|MAX|MIN)\s*\(", r"\bGROUP BY\b", r"\bHAVING\b"],
    ),
    (
        TransformationTag::WindowFunction,
        &[
            r"\bOVER\s*\(",
            r"\bPARTITION BY\b",
            r"\b(ROW_NUMBER|RANK|DENSE_RANK|LAG|LEAD)\s*\(",
        ],
    ),
    (
        TransformationTag::TypeConversion,
        &[r"\bCAST\s*\(", r"\bCONVERT\s*\(", r"\bTRY_CAST\s*\("],
    ),
    (
        TransformationTag::TextOperation,
        &[
            r"\b(CONCAT|SUBSTRING|REPLACE|TRIM|UPPER|LOWER)\s*\(",
            r"\bLIKE\b",
        ],
    ),
    (
        TransformationTag::DateOperation,
        &[
            r"\b(DATEADD|DATEDIFF|DATETRUNC|DATE_TRUNC)\s*\(",
            r"\bDATEPART\s*\(",
        ],
    ),
    (
        TransformationTag::CaseStatement,
        &[r"(?s)\bCASE\b.*?\bEND\b", r"\bIIF\s*\("],
    ),
    (
        TransformationTag::JoinOperation,
        &[r"\b(INNER|LEFT|RIGHT|FULL|CROSS)\s+JOIN\b"],
    ),
];

/// One tag and its compiled pattern family
#[derive(Debug)]
struct TagRule {
    tag: TransformationTag,
    patterns: Vec<Regex>,
}

impl TagRule {
    fn matches(&self, sql: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(sql))
    }
}

static RULES: OnceLock<Vec<TagRule>> = OnceLock::new();

fn rules() -> &'static [TagRule] {
    RULES.get_or_init(|| {
        PATTERNS
            .iter()
            .map(|(tag, sources)| TagRule {
                tag: *tag,
                patterns: sources
                    .iter()
                    .filter_map(|source| match Regex::new(&format!("(?i){source}")) {
                        Ok(regex) => Some(regex),
                        Err(e) => {
                            error!(%tag, pattern = *source, error = %e, "Invalid transformation pattern");
                            None
                        }
                    })
                    .collect(),
            })
            .collect()
    })
}

/// Pattern-based transformation classifier
///
/// Stateless; the compiled patterns are shared by every instance.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformationClassifier;

impl TransformationClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Tags whose patterns match `sql`
    pub fn classify(&self, sql: &str) -> TransformationSet {
        rules()
            .iter()
            .filter(|rule| rule.matches(sql))
            .map(|rule| rule.tag)
            .collect()
    }

    /// Whether `sql` carries `tag`
    pub fn has_tag(&self, sql: &str, tag: TransformationTag) -> bool {
        rules()
            .iter()
            .any(|rule| rule.tag == tag && rule.matches(sql))
    }
}

/// Classify with the shared classifier
pub fn classify_transformations(sql: &str) -> TransformationSet {
    TransformationClassifier.classify(sql)
}
