// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Context extraction
//!
//! Turns one statement into a [`StatementContext`] by tokenizing it with
//! `sqlparser` and grouping the top-level tokens into clauses.
//!
//! Only tokens at parenthesis depth zero start a clause, so a `WHERE`
//! inside a subquery or an `ORDER BY` inside `OVER (...)` stays part of the
//! enclosing clause. Clause text is sliced from the statement between the
//! spans of its first and last tokens, so spacing, inner comments and
//! quoting stay exactly as written.
//!
//! Extraction never fails: if the tokenizer rejects the statement (for
//! example an unterminated string literal) the result is
//! [`StatementContext::degraded`].

use sqlparser::tokenizer::{Token, TokenWithSpan, Tokenizer};
use sql_coldoc_ir::{Dialect, QueryType, StatementContext};
use tracing::{debug, warn};

use crate::source::SourceCursor;

/// Words that start a clause we do not capture
const OTHER_CLAUSE_KEYWORDS: &[&str] = &[
    "SELECT",
    "FROM",
    "HAVING",
    "LIMIT",
    "OFFSET",
    "UNION",
    "INTERSECT",
    "EXCEPT",
    "WINDOW",
    "QUALIFY",
    "VALUES",
    "SET",
    "RETURNING",
    "INTO",
    "FETCH",
];

const JOIN_MODIFIERS: &[&str] = &["INNER", "LEFT", "RIGHT", "FULL", "CROSS", "NATURAL", "OUTER"];

/// Words after `FROM`/`JOIN` that precede the relation name
const RELATION_PREFIXES: &[&str] = &["LATERAL", "ONLY"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClauseKind {
    Other,
    Join,
    Where,
    GroupBy,
    OrderBy,
}

/// Extracts statement contexts for one dialect
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextExtractor {
    dialect: Dialect,
}

impl ContextExtractor {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Extract the context of a single statement
    pub fn extract(&self, sql: &str) -> StatementContext {
        let parser_dialect = self.dialect.parser_dialect();
        let spanned = match Tokenizer::new(parser_dialect.as_ref(), sql).tokenize_with_location() {
            Ok(spanned) => spanned,
            Err(e) => {
                warn!(dialect = %self.dialect, error = %e, "Failed to tokenize statement, using raw text only");
                return StatementContext::degraded(sql);
            }
        };
        let tokens: Vec<Token> = spanned.iter().map(|t| t.token.clone()).collect();

        let mut context = StatementContext {
            full_query: sql.to_string(),
            query_type: query_type(&tokens),
            tables: relation_names(&tokens),
            parsed: true,
            ..Default::default()
        };

        let mut cursor = SourceCursor::new(sql);
        let starts = clause_starts(&tokens);
        for (n, &(kind, start)) in starts.iter().enumerate() {
            let end = starts.get(n + 1).map_or(spanned.len(), |&(_, next)| next);
            let text = clause_text(&mut cursor, &spanned[start..end]).to_string();
            if text.is_empty() {
                continue;
            }
            match kind {
                ClauseKind::Join => context.joins.push(text),
                ClauseKind::Where => context.where_conditions = text,
                ClauseKind::GroupBy => context.group_by = text,
                ClauseKind::OrderBy => context.order_by = text,
                ClauseKind::Other => {}
            }
        }

        debug!(
            query_type = %context.query_type,
            tables = context.tables.len(),
            joins = context.joins.len(),
            "Extracted statement context"
        );
        context
    }
}

/// Uppercased value of an unquoted word token
fn keyword(token: &Token) -> Option<String> {
    match token {
        Token::Word(word) if word.quote_style.is_none() => Some(word.value.to_ascii_uppercase()),
        _ => None,
    }
}

fn is_trivia(token: &Token) -> bool {
    matches!(token, Token::Whitespace(_) | Token::EOF)
}

/// Next unquoted word at or after `from`, skipping whitespace and comments
fn next_keyword(tokens: &[Token], from: usize) -> Option<String> {
    tokens[from.min(tokens.len())..]
        .iter()
        .find(|t| !is_trivia(t))
        .and_then(keyword)
}

fn is_join_modifier(word: &str) -> bool {
    JOIN_MODIFIERS.contains(&word)
}

/// Whether `JOIN` follows, possibly after more modifiers (`LEFT OUTER JOIN`)
fn join_follows(tokens: &[Token], from: usize) -> bool {
    for token in &tokens[from.min(tokens.len())..] {
        if is_trivia(token) {
            continue;
        }
        match keyword(token).as_deref() {
            Some("JOIN") => return true,
            Some(word) if is_join_modifier(word) => continue,
            _ => return false,
        }
    }
    false
}

/// Token index and kind of every top-level clause
fn clause_starts(tokens: &[Token]) -> Vec<(ClauseKind, usize)> {
    let mut starts = vec![(ClauseKind::Other, 0)];
    let mut depth = 0usize;
    let mut prev_word: Option<String> = None;

    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::LParen => {
                depth += 1;
                prev_word = None;
                continue;
            }
            Token::RParen => {
                depth = depth.saturating_sub(1);
                prev_word = None;
                continue;
            }
            t if is_trivia(t) => continue,
            _ => {}
        }
        if depth > 0 {
            continue;
        }

        let Some(word) = keyword(token) else {
            prev_word = None;
            continue;
        };
        let after_modifier = prev_word.as_deref().is_some_and(is_join_modifier);
        let kind = match word.as_str() {
            "WHERE" => Some(ClauseKind::Where),
            "GROUP" if next_keyword(tokens, i + 1).as_deref() == Some("BY") => {
                Some(ClauseKind::GroupBy)
            }
            "ORDER" if next_keyword(tokens, i + 1).as_deref() == Some("BY") => {
                Some(ClauseKind::OrderBy)
            }
            "JOIN" if !after_modifier => Some(ClauseKind::Join),
            w if is_join_modifier(w) && !after_modifier && join_follows(tokens, i + 1) => {
                Some(ClauseKind::Join)
            }
            w if OTHER_CLAUSE_KEYWORDS.contains(&w) => Some(ClauseKind::Other),
            _ => None,
        };

        if let Some(kind) = kind {
            match starts.last_mut() {
                Some(last) if last.1 == i => last.0 = kind,
                _ => starts.push((kind, i)),
            }
        }
        prev_word = Some(word);
    }

    starts
}

/// Source text of a clause, from its first to its last significant token
///
/// Leading and trailing whitespace, comments and the statement terminator
/// are left out.
fn clause_text<'a>(cursor: &mut SourceCursor<'a>, tokens: &[TokenWithSpan]) -> &'a str {
    let significant =
        |t: &&TokenWithSpan| !is_trivia(&t.token) && !matches!(t.token, Token::SemiColon);
    let first = tokens.iter().find(significant);
    let last = tokens.iter().rev().find(significant);
    match (first, last) {
        (Some(first), Some(last)) => cursor.slice(first.span.start, last.span.end),
        _ => "",
    }
}

/// Leading keyword, or the first DML keyword after a top-level `WITH`
fn query_type(tokens: &[Token]) -> QueryType {
    let mut significant = tokens.iter().filter(|t| !is_trivia(t));
    let Some(first) = significant.next().and_then(keyword) else {
        return QueryType::Unknown;
    };
    if first != "WITH" {
        return QueryType::from_keyword(&first).unwrap_or_default();
    }

    let mut depth = 0usize;
    for token in significant {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => depth = depth.saturating_sub(1),
            t if depth == 0 => {
                if let Some(query_type) = keyword(t)
                    .as_deref()
                    .and_then(QueryType::from_keyword)
                    .filter(QueryType::is_dml)
                {
                    return query_type;
                }
            }
            _ => {}
        }
    }
    QueryType::Unknown
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RelationState {
    Idle,
    /// After `FROM`, `JOIN` or a comma inside `FROM`
    ExpectName { in_from: bool },
    /// Inside a possibly dotted name
    InName { in_from: bool },
    /// After a `.` in a dotted name
    NameDot { in_from: bool },
    /// After a complete relation (alias, `ON` condition, ...)
    AfterName { in_from: bool },
}

/// Top-level relations named in `FROM` and `JOIN`, deduplicated
fn relation_names(tokens: &[Token]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut state = RelationState::Idle;
    let mut depth = 0usize;

    for (i, token) in tokens.iter().enumerate() {
        if is_trivia(token) {
            continue;
        }
        match token {
            Token::LParen => {
                if depth == 0 {
                    state = match state {
                        // Derived table
                        RelationState::ExpectName { in_from } => {
                            RelationState::AfterName { in_from }
                        }
                        // Table function
                        RelationState::InName { in_from } | RelationState::NameDot { in_from } => {
                            current.clear();
                            RelationState::AfterName { in_from }
                        }
                        other => other,
                    };
                }
                depth += 1;
                continue;
            }
            Token::RParen => {
                depth = depth.saturating_sub(1);
                continue;
            }
            _ if depth > 0 => continue,
            _ => {}
        }

        let word = keyword(token);
        match word.as_deref() {
            Some("FROM") => {
                finish_relation(&mut current, &mut names);
                state = RelationState::ExpectName { in_from: true };
                continue;
            }
            Some("JOIN") => {
                finish_relation(&mut current, &mut names);
                state = RelationState::ExpectName { in_from: false };
                continue;
            }
            Some(w)
                if w == "WHERE"
                    || OTHER_CLAUSE_KEYWORDS.contains(&w)
                    || (matches!(w, "GROUP" | "ORDER")
                        && next_keyword(tokens, i + 1).as_deref() == Some("BY")) =>
            {
                finish_relation(&mut current, &mut names);
                state = RelationState::Idle;
                continue;
            }
            _ => {}
        }

        state = match (state, token) {
            (RelationState::ExpectName { in_from }, Token::Word(w)) => {
                if word.as_deref().is_some_and(|k| RELATION_PREFIXES.contains(&k)) {
                    RelationState::ExpectName { in_from }
                } else {
                    current.push_str(&w.value);
                    RelationState::InName { in_from }
                }
            }
            (RelationState::InName { in_from }, Token::Period) => {
                current.push('.');
                RelationState::NameDot { in_from }
            }
            (RelationState::NameDot { in_from }, Token::Word(w)) => {
                current.push_str(&w.value);
                RelationState::InName { in_from }
            }
            (RelationState::InName { in_from }, Token::Comma) if in_from => {
                finish_relation(&mut current, &mut names);
                RelationState::ExpectName { in_from }
            }
            (RelationState::InName { in_from }, _) => {
                finish_relation(&mut current, &mut names);
                RelationState::AfterName { in_from }
            }
            (RelationState::AfterName { in_from: true }, Token::Comma) => {
                RelationState::ExpectName { in_from: true }
            }
            (RelationState::NameDot { in_from }, _) => {
                current.clear();
                RelationState::AfterName { in_from }
            }
            (other, _) => other,
        };
    }
    finish_relation(&mut current, &mut names);

    names
}

fn finish_relation(current: &mut String, names: &mut Vec<String>) {
    if !current.is_empty() && !names.contains(current) {
        names.push(std::mem::take(current));
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(sql: &str) -> StatementContext {
        ContextExtractor::default().extract(sql)
    }

    #[test]
    fn test_extracts_all_clause_fragments() {
        let ctx = extract(
            "SELECT o.id, SUM(o.amount) AS total FROM orders o \
             LEFT JOIN users u ON u.id = o.user_id \
             WHERE o.status = 'paid' GROUP BY o.id ORDER BY total DESC;",
        );

        assert!(ctx.parsed);
        assert_eq!(ctx.query_type, QueryType::Select);
        assert_eq!(ctx.tables, vec!["orders", "users"]);
        assert_eq!(ctx.joins, vec!["LEFT JOIN users u ON u.id = o.user_id"]);
        assert_eq!(ctx.where_conditions, "WHERE o.status = 'paid'");
        assert_eq!(ctx.group_by, "GROUP BY o.id");
        assert_eq!(ctx.order_by, "ORDER BY total DESC");
    }

    #[test]
    fn test_one_fragment_per_join() {
        let ctx = extract(
            "SELECT * FROM a JOIN b ON a.id = b.id INNER JOIN c ON c.id = b.id \
             LEFT OUTER JOIN d ON d.id = c.id CROSS JOIN e",
        );
        assert_eq!(
            ctx.joins,
            vec![
                "JOIN b ON a.id = b.id",
                "INNER JOIN c ON c.id = b.id",
                "LEFT OUTER JOIN d ON d.id = c.id",
                "CROSS JOIN e",
            ]
        );
        assert_eq!(ctx.tables, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_left_function_is_not_a_join() {
        let ctx = extract("SELECT LEFT(name, 3) AS prefix FROM users;");
        assert!(ctx.joins.is_empty());
        assert_eq!(ctx.tables, vec!["users"]);
    }

    #[test]
    fn test_nested_clauses_are_not_top_level() {
        let ctx = extract(
            "SELECT id, ROW_NUMBER() OVER (PARTITION BY region ORDER BY amount) AS rn \
             FROM (SELECT id, region, amount FROM sales WHERE amount > 0) s;",
        );
        assert!(ctx.where_conditions.is_empty());
        assert!(ctx.order_by.is_empty());
        assert!(ctx.tables.is_empty());
    }

    #[test]
    fn test_with_resolves_body_query_type() {
        let ctx = extract(
            "WITH recent AS (SELECT * FROM orders WHERE created_at > '2024-01-01') \
             SELECT customer_id FROM recent ORDER BY customer_id;",
        );
        assert_eq!(ctx.query_type, QueryType::Select);
        assert!(ctx.where_conditions.is_empty());
        assert_eq!(ctx.order_by, "ORDER BY customer_id");
        assert_eq!(ctx.tables, vec!["recent"]);
    }

    #[test]
    fn test_qualified_and_comma_separated_tables() {
        let ctx = extract("SELECT * FROM sales.orders o, sales.customers AS c WHERE o.cid = c.id");
        assert_eq!(ctx.tables, vec!["sales.orders", "sales.customers"]);
        assert_eq!(ctx.where_conditions, "WHERE o.cid = c.id");
    }

    #[test]
    fn test_insert_select_query_type() {
        let ctx = extract("INSERT INTO report (total) SELECT SUM(amount) FROM orders;");
        assert_eq!(ctx.query_type, QueryType::Insert);
        assert_eq!(ctx.tables, vec!["orders"]);
    }

    #[test]
    fn test_clause_text_is_verbatim() {
        let ctx = extract(
            "SELECT id FROM people\nWHERE name = 'O''Brien'  AND \"x\"\"y\" = 1 /* flag */ AND e = 'a\\b'\nORDER BY id;",
        );
        assert_eq!(
            ctx.where_conditions,
            "WHERE name = 'O''Brien'  AND \"x\"\"y\" = 1 /* flag */ AND e = 'a\\b'"
        );
        assert_eq!(ctx.order_by, "ORDER BY id");
    }

    #[test]
    fn test_clause_text_keeps_backslash_escapes() {
        let ctx = ContextExtractor::new(Dialect::MySQL)
            .extract(r"SELECT id FROM people WHERE note = 'it\'s' GROUP BY id;");
        assert_eq!(ctx.where_conditions, r"WHERE note = 'it\'s'");
        assert_eq!(ctx.group_by, "GROUP BY id");
    }

    #[test]
    fn test_unknown_leading_keyword() {
        let ctx = extract("VACUUM;");
        assert!(ctx.parsed);
        assert_eq!(ctx.query_type, QueryType::Unknown);
        assert!(!ctx.has_clauses());
    }

    #[test]
    fn test_tokenizer_failure_degrades() {
        let sql = "SELECT 'unterminated FROM t";
        let ctx = extract(sql);
        assert!(!ctx.parsed);
        assert_eq!(ctx.full_query, sql);
        assert_eq!(ctx.query_type, QueryType::Unknown);
        assert!(!ctx.has_clauses());
    }
}
