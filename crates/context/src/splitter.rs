// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Query splitter
//!
//! Breaks a multi-statement SQL blob into individual statements on `;`.
//!
//! The blob is tokenized with the `sqlparser` tokenizer of the configured
//! dialect, so string literals (including backslash escapes where the
//! dialect allows them), quoted identifiers, comments and dollar-quoted
//! bodies never end a statement. Only semicolons outside parentheses split.
//! Statement text is sliced from the input, never rebuilt from tokens.
//!
//! Splitting never fails. When the tokenizer gives up (an unterminated
//! quote or comment), everything after the last complete statement is kept
//! as one statement and later stages deal with it.

use sqlparser::tokenizer::{Token, TokenWithSpan, Tokenizer};
use sql_coldoc_ir::Dialect;
use tracing::debug;

use crate::source::SourceCursor;

/// Split `sql` into trimmed statements.
///
/// Each statement keeps its terminating semicolon. Segments made only of
/// whitespace and comments are dropped, so `N` semicolon-terminated
/// statements always yield `N` strings.
///
/// # Examples
///
/// ```
/// use sql_coldoc_context::split_statements;
/// use sql_coldoc_ir::Dialect;
///
/// let statements = split_statements("SELECT 'a;b' AS x; SELECT 2;", Dialect::Generic);
/// assert_eq!(statements, vec!["SELECT 'a;b' AS x;", "SELECT 2;"]);
/// ```
pub fn split_statements(sql: &str, dialect: Dialect) -> Vec<String> {
    let parser_dialect = dialect.parser_dialect();
    let mut tokens: Vec<TokenWithSpan> = Vec::new();
    let complete = match Tokenizer::new(parser_dialect.as_ref(), sql)
        .tokenize_with_location_into_buf(&mut tokens)
    {
        Ok(()) => true,
        Err(e) => {
            debug!(%dialect, error = %e, "Tokenizer stopped early, keeping the remainder as one statement");
            false
        }
    };

    let mut cursor = SourceCursor::new(sql);
    let mut statements = Vec::new();
    let mut start = 0;
    let mut has_code = false;
    let mut depth = 0usize;

    for token in &tokens {
        match &token.token {
            Token::SemiColon if depth == 0 => {
                let end = cursor.offset(token.span.end);
                if has_code {
                    statements.push(sql[start..end].trim().to_string());
                }
                start = end;
                has_code = false;
            }
            Token::Whitespace(_) | Token::EOF => {}
            Token::LParen => {
                depth += 1;
                has_code = true;
            }
            Token::RParen => {
                depth = depth.saturating_sub(1);
                has_code = true;
            }
            _ => has_code = true,
        }
    }

    let tail = sql[start..].trim();
    if (has_code || !complete) && !tail.is_empty() {
        statements.push(tail.to_string());
    }

    statements
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(sql: &str) -> Vec<String> {
        split_statements(sql, Dialect::Generic)
    }

    #[test]
    fn test_split_simple_statements() {
        let statements = split("SELECT 1; SELECT 2;\nSELECT 3;");
        assert_eq!(statements, vec!["SELECT 1;", "SELECT 2;", "SELECT 3;"]);
    }

    #[test]
    fn test_unterminated_tail_is_kept() {
        let statements = split("SELECT 1;\nSELECT 2");
        assert_eq!(statements, vec!["SELECT 1;", "SELECT 2"]);
    }

    #[test]
    fn test_empty_segments_are_dropped() {
        assert!(split("").is_empty());
        assert!(split("  ;;\n ; ").is_empty());
        assert_eq!(split(";;SELECT 1;;"), vec!["SELECT 1;"]);
    }

    #[test]
    fn test_semicolon_inside_literals_and_identifiers() {
        let sql = r#"SELECT 'a;b', "c;d", `e;f` FROM t; SELECT 'it''s; fine';"#;
        let statements = split(sql);
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0], r#"SELECT 'a;b', "c;d", `e;f` FROM t;"#);
        assert_eq!(statements[1], "SELECT 'it''s; fine';");
    }

    #[test]
    fn test_backslash_escaped_literal() {
        let sql = r"SELECT 'it\'s; here' AS x FROM t; SELECT 2;";
        let statements = split_statements(sql, Dialect::MySQL);
        assert_eq!(statements, vec![r"SELECT 'it\'s; here' AS x FROM t;", "SELECT 2;"]);
    }

    #[test]
    fn test_bracket_identifier() {
        let statements = split_statements("SELECT [g;h] FROM t; SELECT 2;", Dialect::MsSql);
        assert_eq!(statements, vec!["SELECT [g;h] FROM t;", "SELECT 2;"]);
    }

    #[test]
    fn test_semicolon_inside_comments() {
        let sql = "SELECT 1 -- not; a split\n; /* also; not */ SELECT 2;";
        let statements = split(sql);
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0], "SELECT 1 -- not; a split\n;");
        assert_eq!(statements[1], "/* also; not */ SELECT 2;");
    }

    #[test]
    fn test_comment_only_segments_are_dropped() {
        let statements = split("SELECT 1; -- trailing note\n/* block */");
        assert_eq!(statements, vec!["SELECT 1;"]);
    }

    #[test]
    fn test_dollar_quoted_body() {
        let sql = "CREATE FUNCTION f() RETURNS int AS $body$ SELECT 1; $body$ LANGUAGE sql; SELECT $1;";
        let statements = split_statements(sql, Dialect::PostgreSQL);
        assert_eq!(statements.len(), 2);
        assert!(statements[0].ends_with("LANGUAGE sql;"));
        assert_eq!(statements[1], "SELECT $1;");
    }

    #[test]
    fn test_unterminated_string_swallows_rest() {
        let statements = split("SELECT 1; SELECT 'oops; SELECT 2;");
        assert_eq!(statements, vec!["SELECT 1;", "SELECT 'oops; SELECT 2;"]);
    }

    #[test]
    fn test_multibyte_text_is_preserved() {
        let statements = split("SELECT 'héllo; wörld' AS greeting;\nSELECT '日本';");
        assert_eq!(statements[0], "SELECT 'héllo; wörld' AS greeting;");
        assert_eq!(statements[1], "SELECT '日本';");
    }
}
