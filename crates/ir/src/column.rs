// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Column records
//!
//! [`ColumnContext`] is the payload handed to the description generator;
//! its pretty-printed JSON form is also half of the description cache key.
//! [`ColumnRecord`] is the aggregated per-target unit stored in a
//! [`ColumnMap`].
//!
//! ## Overwrite semantics
//!
//! A target column seen again (by a later edge of the same statement or by
//! another statement) replaces the stored record. Source sets are not
//! merged: the map is last-writer-wins.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::IrResult;
use crate::lineage::LineageEdge;
use crate::report::{Report, ReportRow};
use crate::statement::StatementContext;
use crate::transformation::{TransformationSet, join_labels};

/// Description request payload for one target column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnContext {
    /// Target column name
    pub name: String,
    /// Source columns feeding the target
    pub source_columns: Vec<String>,
    /// Transformations detected on the owning statement
    pub transformations: TransformationSet,
    /// Context of the owning statement
    pub sql_context: StatementContext,
}

impl ColumnContext {
    /// Build the payload for one lineage edge
    pub fn for_edge(
        edge: &LineageEdge,
        transformations: &TransformationSet,
        sql_context: &StatementContext,
    ) -> Self {
        Self {
            name: edge.target.clone(),
            source_columns: vec![edge.source.clone()],
            transformations: transformations.clone(),
            sql_context: sql_context.clone(),
        }
    }

    /// Serialized form embedded in the prompt and used for cache keys
    pub fn to_payload(&self) -> IrResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Attach a description, producing the stored record
    pub fn into_record(self, description: impl Into<String>) -> ColumnRecord {
        ColumnRecord {
            name: self.name,
            source_columns: self.source_columns,
            transformations: self.transformations,
            description: Some(description.into()),
            context: self.sql_context,
        }
    }
}

/// Aggregated facts about one target column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRecord {
    /// Target column name
    pub name: String,
    /// Deduplicated source column names
    pub source_columns: Vec<String>,
    /// Transformation tags, a subset of the fixed taxonomy
    pub transformations: TransformationSet,
    /// Generated description, `None` until computed
    pub description: Option<String>,
    /// Owning statement context
    pub context: StatementContext,
}

impl ColumnRecord {
    pub fn new(name: impl Into<String>, context: StatementContext) -> Self {
        Self {
            name: name.into(),
            source_columns: Vec::new(),
            transformations: TransformationSet::new(),
            description: None,
            context,
        }
    }

    /// Add a source column, ignoring duplicates
    pub fn add_source(&mut self, source: impl Into<String>) {
        let source = source.into();
        if !self.source_columns.contains(&source) {
            self.source_columns.push(source);
        }
    }

    /// Project this record into a report row
    pub fn to_row(&self) -> ReportRow {
        ReportRow {
            column_name: self.name.clone(),
            source_columns: self.source_columns.join(", "),
            transformations: join_labels(&self.transformations),
            description: self.description.clone().unwrap_or_default(),
        }
    }
}

/// Target column name → record, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMap {
    columns: IndexMap<String, ColumnRecord>,
}

impl ColumnMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record, replacing any previous record for the same target.
    ///
    /// Returns the replaced record, if any.
    pub fn upsert(&mut self, record: ColumnRecord) -> Option<ColumnRecord> {
        self.columns.insert(record.name.clone(), record)
    }

    pub fn get(&self, name: &str) -> Option<&ColumnRecord> {
        self.columns.get(name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnRecord> {
        self.columns.values()
    }

    /// Rebuild the tabular report, in map order
    pub fn report(&self) -> Report {
        Report::new(self.iter().map(ColumnRecord::to_row).collect())
    }
}

impl FromIterator<ColumnRecord> for ColumnMap {
    fn from_iter<I: IntoIterator<Item = ColumnRecord>>(iter: I) -> Self {
        let mut map = ColumnMap::new();
        for record in iter {
            map.upsert(record);
        }
        map
    }
}
