// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Report
//!
//! Tabular projection of a [`crate::ColumnMap`]. The report is derived and
//! never authoritative; rebuild it from the map whenever it is needed.

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::IrResult;

/// Column headers, in row field order
pub const REPORT_HEADERS: [&str; 4] = [
    "Column Name",
    "Source Columns",
    "Transformations",
    "Description",
];

/// One report row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub column_name: String,
    /// Comma-joined source columns
    pub source_columns: String,
    /// Comma-joined transformation labels
    pub transformations: String,
    pub description: String,
}

impl ReportRow {
    fn fields(&self) -> [&str; 4] {
        [
            &self.column_name,
            &self.source_columns,
            &self.transformations,
            &self.description,
        ]
    }
}

/// JSON value shape for one column in [`Report::to_json`]
#[derive(Debug, Serialize)]
struct JsonEntry<'a> {
    source_columns: &'a str,
    transformations: &'a str,
    description: &'a str,
}

/// Ordered sequence of report rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub rows: Vec<ReportRow>,
}

impl Report {
    pub fn new(rows: Vec<ReportRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as CSV with a header line
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        push_csv_line(&mut out, &REPORT_HEADERS);
        for row in &self.rows {
            push_csv_line(&mut out, &row.fields());
        }
        out
    }

    /// Render as a JSON object keyed by column name, in report order
    pub fn to_json(&self) -> IrResult<String> {
        let map: IndexMap<&str, JsonEntry<'_>> = self
            .rows
            .iter()
            .map(|row| {
                (
                    row.column_name.as_str(),
                    JsonEntry {
                        source_columns: &row.source_columns,
                        transformations: &row.transformations,
                        description: &row.description,
                    },
                )
            })
            .collect();
        Ok(serde_json::to_string_pretty(&map)?)
    }

    /// Render as a bordered terminal table
    ///
    /// Multi-line cells stay inside their column.
    pub fn to_table(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL_CONDENSED)
            .set_content_arrangement(ContentArrangement::Disabled)
            .set_header(REPORT_HEADERS);
        for row in &self.rows {
            table.add_row(row.fields());
        }
        format!("{table}\n")
    }
}

fn push_csv_line(out: &mut String, fields: &[&str]) {
    let line: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
    out.push_str(&line.join(","));
    out.push('\n');
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, sources: &str, tags: &str, description: &str) -> ReportRow {
        ReportRow {
            column_name: name.to_string(),
            source_columns: sources.to_string(),
            transformations: tags.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn test_csv_quotes_fields_with_commas_and_quotes() {
        let report = Report::new(vec![row(
            "total",
            "orders.amount, orders.tax",
            "Aggregation",
            "Sum of \"amount\".",
        )]);
        let csv = report.to_csv();
        let mut lines = csv.lines();

        assert_eq!(
            lines.next(),
            Some("Column Name,Source Columns,Transformations,Description")
        );
        assert_eq!(
            lines.next(),
            Some("total,\"orders.amount, orders.tax\",Aggregation,\"Sum of \"\"amount\"\".\"")
        );
    }

    #[test]
    fn test_json_preserves_row_order() {
        let report = Report::new(vec![
            row("zeta", "t.z", "", "Z."),
            row("alpha", "t.a", "Aggregation", "A."),
        ]);
        let json = report.to_json().unwrap();
        let zeta = json.find("\"zeta\"").unwrap();
        let alpha = json.find("\"alpha\"").unwrap();
        assert!(zeta < alpha);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["alpha"]["transformations"], "Aggregation");
        assert_eq!(value["zeta"]["source_columns"], "t.z");
    }

    #[test]
    fn test_table_aligns_columns() {
        let report = Report::new(vec![row("total", "orders.amount", "Aggregation", "Sum.")]);
        let table = report.to_table();

        assert!(table.ends_with('\n'));
        let header = table.lines().find(|l| l.contains("Column Name")).unwrap();
        assert!(header.contains("Source Columns"));
        assert!(header.contains("Description"));
        let data = table.lines().find(|l| l.contains("total")).unwrap();
        assert!(data.contains("orders.amount"));
        assert!(data.contains("Aggregation"));
    }

    #[test]
    fn test_table_keeps_multiline_cells_aligned() {
        let report = Report::new(vec![
            row("total", "orders.amount", "Aggregation", "Sum of amounts.\nExcludes refunds."),
            row("n", "orders.id", "", "Count."),
        ]);
        let table = report.to_table();
        let widths: Vec<usize> = table.lines().map(|l| l.chars().count()).collect();

        assert!(widths.windows(2).all(|w| w[0] == w[1]), "ragged table:\n{table}");
        let continuation = table.lines().find(|l| l.contains("Excludes refunds.")).unwrap();
        assert!(!continuation.contains("total"));
    }

    #[test]
    fn test_empty_report() {
        let report = Report::default();
        assert!(report.is_empty());
        assert_eq!(report.to_json().unwrap(), "{}");
        assert_eq!(report.to_csv().lines().count(), 1);
    }
}
