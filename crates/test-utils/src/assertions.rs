// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Column map and report assertions

use sql_coldoc_describe::ERROR_PREFIX;
use sql_coldoc_ir::{ColumnMap, ColumnRecord, Report, TransformationTag};

/// Custom assertion helpers for analysis results
pub struct ColumnAssertions;

impl ColumnAssertions {
    /// Assert that `name` is present and return its record
    pub fn assert_column<'a>(map: &'a ColumnMap, name: &str) -> &'a ColumnRecord {
        match map.get(name) {
            Some(record) => record,
            None => panic!(
                "Expected column '{}', found {:?}",
                name,
                map.names().collect::<Vec<_>>()
            ),
        }
    }

    /// Assert the exact source columns of `name`, order-insensitive
    pub fn assert_sources(map: &ColumnMap, name: &str, expected: &[&str]) {
        let record = Self::assert_column(map, name);
        let mut actual: Vec<&str> = record.source_columns.iter().map(String::as_str).collect();
        let mut expected = expected.to_vec();
        actual.sort_unstable();
        expected.sort_unstable();
        assert_eq!(actual, expected, "Source columns of '{}' differ", name);
    }

    /// Assert that `name` carries `tag`
    pub fn assert_has_tag(map: &ColumnMap, name: &str, tag: TransformationTag) {
        let record = Self::assert_column(map, name);
        assert!(
            record.transformations.contains(&tag),
            "Column '{}' lacks tag {}, has {:?}",
            name,
            tag,
            record.transformations
        );
    }

    /// Assert that the description of `name` is a generation-failure sentinel
    pub fn assert_error_description(map: &ColumnMap, name: &str) {
        let record = Self::assert_column(map, name);
        let description = record.description.as_deref().unwrap_or_default();
        assert!(
            description.starts_with(ERROR_PREFIX),
            "Column '{}' has description '{}', expected a failure sentinel",
            name,
            description
        );
    }

    /// Assert the report's column names, in order
    pub fn assert_report_columns(report: &Report, expected: &[&str]) {
        let actual: Vec<&str> = report
            .rows
            .iter()
            .map(|row| row.column_name.as_str())
            .collect();
        assert_eq!(actual, expected, "Report columns differ");
    }
}
