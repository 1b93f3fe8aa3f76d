// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Statement context
//!
//! Structured facts extracted from one SQL statement. Clause fragments are
//! kept verbatim (not normalized) because they are embedded into the
//! description prompt as-is.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Top-level statement kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QueryType {
    Select,
    Insert,
    Update,
    Delete,
    Merge,
    Create,
    Alter,
    Drop,
    Replace,
    #[default]
    Unknown,
}

impl QueryType {
    /// Map a leading keyword to a query type
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let query_type = match keyword.to_ascii_uppercase().as_str() {
            "SELECT" => QueryType::Select,
            "INSERT" => QueryType::Insert,
            "UPDATE" => QueryType::Update,
            "DELETE" => QueryType::Delete,
            "MERGE" => QueryType::Merge,
            "CREATE" => QueryType::Create,
            "ALTER" => QueryType::Alter,
            "DROP" => QueryType::Drop,
            "REPLACE" => QueryType::Replace,
            _ => return None,
        };
        Some(query_type)
    }

    /// Whether this kind can be the body after a leading `WITH`
    pub fn is_dml(&self) -> bool {
        matches!(
            self,
            QueryType::Select
                | QueryType::Insert
                | QueryType::Update
                | QueryType::Delete
                | QueryType::Merge
        )
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QueryType::Select => "SELECT",
            QueryType::Insert => "INSERT",
            QueryType::Update => "UPDATE",
            QueryType::Delete => "DELETE",
            QueryType::Merge => "MERGE",
            QueryType::Create => "CREATE",
            QueryType::Alter => "ALTER",
            QueryType::Drop => "DROP",
            QueryType::Replace => "REPLACE",
            QueryType::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// One parsed SQL statement
///
/// Created by the context extractor and never mutated afterwards. A
/// statement that could not be tokenized is represented by
/// [`StatementContext::degraded`], which carries only the raw text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementContext {
    /// The statement text as it appeared in the batch
    pub full_query: String,

    /// Statement kind
    pub query_type: QueryType,

    /// Tables named in FROM and JOIN clauses, in order of appearance
    pub tables: Vec<String>,

    /// Join fragments such as `LEFT JOIN b ON a.id = b.id`
    pub joins: Vec<String>,

    /// `WHERE ...` fragment, empty when absent
    pub where_conditions: String,

    /// `GROUP BY ...` fragment, empty when absent
    pub group_by: String,

    /// `ORDER BY ...` fragment, empty when absent
    pub order_by: String,

    /// False when tokenization failed and no clauses were extracted
    pub parsed: bool,
}

impl StatementContext {
    /// Context carrying only the raw text
    pub fn degraded(full_query: impl Into<String>) -> Self {
        Self {
            full_query: full_query.into(),
            ..Default::default()
        }
    }

    /// Whether any clause fragment was captured
    pub fn has_clauses(&self) -> bool {
        !self.joins.is_empty()
            || !self.where_conditions.is_empty()
            || !self.group_by.is_empty()
            || !self.order_by.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_type_from_keyword() {
        assert_eq!(QueryType::from_keyword("select"), Some(QueryType::Select));
        assert_eq!(QueryType::from_keyword("Insert"), Some(QueryType::Insert));
        assert_eq!(QueryType::from_keyword("WITH"), None);
    }

    #[test]
    fn test_query_type_serializes_uppercase() {
        let json = serde_json::to_string(&QueryType::Select).unwrap();
        assert_eq!(json, "\"SELECT\"");
        assert_eq!(QueryType::Unknown.to_string(), "UNKNOWN");
    }

    #[test]
    fn test_degraded_context() {
        let ctx = StatementContext::degraded("SELECT 'oops");
        assert_eq!(ctx.full_query, "SELECT 'oops");
        assert_eq!(ctx.query_type, QueryType::Unknown);
        assert!(!ctx.parsed);
        assert!(!ctx.has_clauses());
    }
}
