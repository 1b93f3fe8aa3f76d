// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Text-based lineage case format parser
//!
//! Cases are separated by `---` and use a YAML-like field syntax:
//!
//! ```text
//! ---
//! description: Aggregate over one table
//! dialect: generic
//! input: |
//!   SELECT SUM(amount) AS total FROM orders;
//! edges: |
//!   orders.amount -> total
//! tags: Aggregation
//! ```
//!
//! `dialect` defaults to `generic`; `edges` and `tags` default to empty.

use std::path::Path;

use sql_coldoc_ir::{Dialect, LineageEdge, TransformationSet, TransformationTag};
use thiserror::Error;

/// A single lineage case definition
#[derive(Debug, Clone)]
pub struct LineageCase {
    pub description: String,
    pub dialect: Dialect,
    pub input: String,
    /// Expected edges, in analyzer order
    pub edges: Vec<LineageEdge>,
    /// Expected transformation tags
    pub tags: TransformationSet,
}

/// Parse errors
#[derive(Debug, Error)]
pub enum CaseParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid value at line {line}: {message}")]
    InvalidValue { line: usize, message: String },

    #[error("Case ending at line {line} is missing field: {field}")]
    MissingField { line: usize, field: &'static str },

    #[error("Empty case file")]
    EmptyFile,
}

/// Parse a case file
pub fn parse_case_file(path: &Path) -> Result<Vec<LineageCase>, CaseParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_case_content(&content)
}

/// Parse case content from a string
pub fn parse_case_content(content: &str) -> Result<Vec<LineageCase>, CaseParseError> {
    let mut cases = Vec::new();
    let mut current = CaseBuilder::default();
    let mut field: Option<String> = None;
    let mut value = Vec::new();
    let mut line_num = 0;

    for line in content.lines() {
        line_num += 1;
        let trimmed = line.trim();

        if trimmed.is_empty() && field.is_none() {
            continue;
        }

        if trimmed == "---" {
            if let Some(name) = field.take() {
                current.set_field(&name, &value, line_num)?;
            }
            value.clear();
            if current.has_fields() {
                cases.push(std::mem::take(&mut current).build(line_num)?);
            }
            continue;
        }

        // Field names start in column zero; indented lines belong to a value
        let is_declaration = !line.starts_with(char::is_whitespace);
        if let Some((key, rest)) = trimmed.split_once(':').filter(|_| is_declaration) {
            if let Some(name) = field.take() {
                current.set_field(&name, &value, line_num)?;
            }
            value.clear();
            field = Some(key.trim().to_string());

            let rest = rest.trim();
            if !rest.is_empty() && rest != "|" {
                value.push(rest.to_string());
            }
            continue;
        }

        if field.is_some() {
            value.push(line.to_string());
        }
    }

    if let Some(name) = field.take() {
        current.set_field(&name, &value, line_num)?;
    }
    if current.has_fields() {
        cases.push(current.build(line_num)?);
    }

    if cases.is_empty() {
        return Err(CaseParseError::EmptyFile);
    }
    Ok(cases)
}

/// Builder for constructing cases incrementally
#[derive(Default)]
struct CaseBuilder {
    description: Option<String>,
    dialect: Option<Dialect>,
    input: Option<String>,
    edges: Vec<LineageEdge>,
    tags: TransformationSet,
}

impl CaseBuilder {
    fn has_fields(&self) -> bool {
        self.description.is_some() || self.input.is_some()
    }

    fn set_field(
        &mut self,
        field: &str,
        value: &[String],
        line: usize,
    ) -> Result<(), CaseParseError> {
        let invalid = |message: String| CaseParseError::InvalidValue { line, message };
        match field {
            "description" => self.description = Some(value.join("\n").trim().to_string()),
            "dialect" => {
                let dialect = value
                    .join("")
                    .parse::<Dialect>()
                    .map_err(|e| invalid(e.to_string()))?;
                self.dialect = Some(dialect);
            }
            "input" => self.input = Some(dedent(value)),
            "edges" => {
                for item in value.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
                    self.edges.push(parse_edge(item).ok_or_else(|| {
                        invalid(format!("expected 'source -> target', found '{item}'"))
                    })?);
                }
            }
            "tags" => {
                for label in value.iter().flat_map(|s| s.split(',')).map(str::trim) {
                    if label.is_empty() {
                        continue;
                    }
                    let tag = label
                        .parse::<TransformationTag>()
                        .map_err(|e| invalid(e.to_string()))?;
                    self.tags.insert(tag);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn build(self, line: usize) -> Result<LineageCase, CaseParseError> {
        let description = self.description.ok_or(CaseParseError::MissingField {
            line,
            field: "description",
        })?;
        let input = self.input.ok_or(CaseParseError::MissingField {
            line,
            field: "input",
        })?;

        Ok(LineageCase {
            description,
            dialect: self.dialect.unwrap_or_default(),
            input,
            edges: self.edges,
            tags: self.tags,
        })
    }
}

fn parse_edge(item: &str) -> Option<LineageEdge> {
    let (source, target) = item.split_once("->")?;
    let (source, target) = (source.trim(), target.trim());
    if source.is_empty() || target.is_empty() {
        return None;
    }
    Some(LineageEdge::new(source, target))
}

/// Remove common leading whitespace from multi-line text
fn dedent(lines: &[String]) -> String {
    let min_indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|line| line.get(min_indent..).unwrap_or(line.trim_start()))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_case() {
        let content = r#"
---
description: Aggregate over one table
dialect: mysql
input: |
  SELECT SUM(amount) AS total
  FROM orders;
edges: |
  orders.amount -> total
tags: Aggregation
"#;

        let cases = parse_case_content(content).unwrap();
        assert_eq!(cases.len(), 1);
        let case = &cases[0];
        assert_eq!(case.description, "Aggregate over one table");
        assert_eq!(case.dialect, Dialect::MySQL);
        assert_eq!(case.input, "SELECT SUM(amount) AS total\nFROM orders;");
        assert_eq!(case.edges, vec![LineageEdge::new("orders.amount", "total")]);
        assert!(case.tags.contains(&TransformationTag::Aggregation));
    }

    #[test]
    fn test_parse_multiple_cases_with_defaults() {
        let content = r#"
---
description: First
input: SELECT 1 AS one;

---
description: Second
input: |
  SELECT c.name FROM customers c LEFT JOIN orders o ON o.customer_id = c.id;
edges: |
  customers.name -> name
tags: Join Operation, Aggregation
"#;

        let cases = parse_case_content(content).unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].dialect, Dialect::Generic);
        assert!(cases[0].edges.is_empty());
        assert!(cases[0].tags.is_empty());
        assert_eq!(cases[1].tags.len(), 2);
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let bad_edge = "---\ndescription: x\ninput: SELECT a FROM t\nedges: |\n  t.a => a\n";
        assert!(matches!(
            parse_case_content(bad_edge),
            Err(CaseParseError::InvalidValue { .. })
        ));

        let bad_tag = "---\ndescription: x\ninput: SELECT a FROM t\ntags: Pivot\n";
        assert!(parse_case_content(bad_tag).is_err());

        let missing_input = "---\ndescription: x\n";
        assert!(matches!(
            parse_case_content(missing_input),
            Err(CaseParseError::MissingField { field: "input", .. })
        ));
    }

    #[test]
    fn test_dedent() {
        let lines = vec![
            "    SELECT".to_string(),
            "      id,".to_string(),
            "      name".to_string(),
        ];
        assert_eq!(dedent(&lines), "SELECT\n  id,\n  name");
    }

    #[test]
    fn test_empty_file() {
        assert!(matches!(parse_case_content(""), Err(CaseParseError::EmptyFile)));
    }
}
