// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Table-driven lineage and tagging cases from `tests/cases/lineage.txt`

use std::path::PathBuf;
use std::sync::Arc;

use sql_coldoc_context::TransformationClassifier;
use sql_coldoc_lineage::{LineageResolver, SqlLineageAnalyzer};
use sql_coldoc_test_utils::{LineageCase, parse_case_file};

fn load_cases() -> Vec<LineageCase> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/cases/lineage.txt");
    parse_case_file(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

#[test]
fn test_case_file_lineage() {
    let cases = load_cases();
    assert_eq!(cases.len(), 7);

    for case in &cases {
        let resolver = LineageResolver::new(Arc::new(SqlLineageAnalyzer::new(case.dialect)));
        assert_eq!(
            resolver.resolve(&case.input),
            case.edges,
            "edges for '{}'",
            case.description
        );
    }
}

#[test]
fn test_case_file_tags() {
    let classifier = TransformationClassifier::new();
    for case in load_cases() {
        assert_eq!(
            classifier.classify(&case.input),
            case.tags,
            "tags for '{}'",
            case.description
        );
    }
}
