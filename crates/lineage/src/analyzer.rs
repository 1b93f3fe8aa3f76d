// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Built-in lineage analyzer
//!
//! Parses a statement with `sqlparser` and reports `[source, target]`
//! dependency paths for every projected column.
//!
//! ## Resolution rules
//!
//! - Targets of a plain query are output column names: the alias, the
//!   identifier itself, or the expression text.
//! - `INSERT INTO t (...) SELECT` and `CREATE TABLE t AS SELECT` qualify
//!   targets with the written table. An explicit insert column list is
//!   mapped by position when its length matches the projection.
//! - Sources are `table.column` after resolving aliases through the
//!   `FROM`/`JOIN` list. A bare identifier is qualified only when a single
//!   relation is in scope or a derived relation exposes it by name.
//! - CTEs and derived tables are followed down to base tables.
//! - A subquery inside an expression resolves its columns through its own
//!   `FROM` list; the enclosing scope never qualifies them.
//! - `*` and `t.*` become `table.*` sources of a `*` target.

use std::collections::HashMap;
use std::convert::Infallible;
use std::ops::ControlFlow;

use sqlparser::ast::{
    Expr, Query, Select, SelectItem, SelectItemQualifiedWildcardKind, SetExpr, Statement,
    TableFactor, TableObject, Visit, Visitor,
};
use sqlparser::parser::Parser;
use sql_coldoc_ir::Dialect;
use tracing::debug;

use crate::error::{LineageError, LineageResult};
use crate::r#trait::{DependencyPath, LineageAnalyzer};

/// Output column of a query block and the base columns feeding it
#[derive(Debug, Clone, PartialEq, Eq)]
struct OutputColumn {
    name: String,
    sources: Vec<String>,
}

impl OutputColumn {
    fn wildcard(table: &str) -> Self {
        Self {
            name: "*".to_string(),
            sources: vec![format!("{table}.*")],
        }
    }
}

/// Output columns of the CTEs visible to a query block, keyed by lowercase name
type CteColumns = HashMap<String, Vec<OutputColumn>>;

/// A relation in a `FROM` clause
#[derive(Debug, Clone)]
enum Relation {
    /// Base table, by its written name
    Table(String),
    /// CTE reference or derived table, by its output columns
    Derived(Vec<OutputColumn>),
}

impl Relation {
    fn sources_for(&self, column: &str) -> Vec<String> {
        match self {
            Relation::Table(name) => vec![format!("{name}.{column}")],
            Relation::Derived(columns) => derived_sources(columns, column),
        }
    }

    fn wildcard_columns(&self) -> Vec<OutputColumn> {
        match self {
            Relation::Table(name) => vec![OutputColumn::wildcard(name)],
            Relation::Derived(columns) => columns.clone(),
        }
    }
}

/// Sources of `column` in a derived relation. A `*` output passes any
/// column name through to its table.
fn derived_sources(columns: &[OutputColumn], column: &str) -> Vec<String> {
    if let Some(found) = columns
        .iter()
        .rev()
        .find(|c| c.name.eq_ignore_ascii_case(column))
    {
        return found.sources.clone();
    }
    columns
        .iter()
        .filter(|c| c.name == "*")
        .flat_map(|c| &c.sources)
        .map(|source| match source.strip_suffix(".*") {
            Some(table) => format!("{table}.{column}"),
            None => source.clone(),
        })
        .collect()
}

fn push_unique(sources: &mut Vec<String>, source: String) {
    if !sources.contains(&source) {
        sources.push(source);
    }
}

/// Relations visible to one `SELECT`, keyed by qualifier (alias or table name)
#[derive(Debug, Default)]
struct RelationScope {
    relations: Vec<(String, Relation)>,
}

impl RelationScope {
    fn from_select(select: &Select, ctes: &CteColumns) -> Self {
        let mut scope = Self::default();
        for table in &select.from {
            scope.add_factor(&table.relation, ctes);
            for join in &table.joins {
                scope.add_factor(&join.relation, ctes);
            }
        }
        scope
    }

    fn add_factor(&mut self, factor: &TableFactor, ctes: &CteColumns) {
        match factor {
            TableFactor::Table { name, alias, .. } => {
                let table = name.to_string();
                let qualifier = match alias {
                    Some(alias) => alias.name.value.clone(),
                    None => table.rsplit('.').next().unwrap_or(&table).to_string(),
                };
                let relation = match ctes.get(&table.to_ascii_lowercase()) {
                    Some(columns) => Relation::Derived(columns.clone()),
                    None => Relation::Table(table),
                };
                self.relations.push((qualifier, relation));
            }
            TableFactor::Derived {
                subquery, alias, ..
            } => {
                let qualifier = alias
                    .as_ref()
                    .map(|alias| alias.name.value.clone())
                    .unwrap_or_default();
                let columns = query_columns(subquery, ctes);
                self.relations.push((qualifier, Relation::Derived(columns)));
            }
            TableFactor::NestedJoin {
                table_with_joins, ..
            } => {
                self.add_factor(&table_with_joins.relation, ctes);
                for join in &table_with_joins.joins {
                    self.add_factor(&join.relation, ctes);
                }
            }
            _ => {}
        }
    }

    fn find(&self, qualifier: &str) -> Option<&Relation> {
        self.relations
            .iter()
            .find(|(q, _)| q.eq_ignore_ascii_case(qualifier))
            .or_else(|| {
                self.relations.iter().find(|(_, relation)| {
                    matches!(relation, Relation::Table(name) if name.eq_ignore_ascii_case(qualifier))
                })
            })
            .map(|(_, relation)| relation)
    }

    fn resolve(&self, qualifier: Option<&str>, column: &str) -> Vec<String> {
        if let Some(qualifier) = qualifier {
            return match self.find(qualifier) {
                Some(relation) => relation.sources_for(column),
                None => vec![format!("{qualifier}.{column}")],
            };
        }

        if let [(_, only)] = self.relations.as_slice() {
            return only.sources_for(column);
        }
        let exposed = self.relations.iter().find_map(|(_, relation)| match relation {
            Relation::Derived(columns) => columns
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(column)),
            Relation::Table(_) => None,
        });
        if let Some(found) = exposed {
            return found.sources.clone();
        }
        // Ambiguous between several base tables
        vec![column.to_string()]
    }
}

/// Sources of a column reference, resolved in `scope`
fn identifier_sources(expr: &Expr, scope: &RelationScope) -> Vec<String> {
    match expr {
        Expr::Identifier(ident) => scope.resolve(None, &ident.value),
        Expr::CompoundIdentifier(idents) => match idents.split_last() {
            Some((column, [])) => scope.resolve(None, &column.value),
            Some((column, qualifier)) => {
                let qualifier: Vec<&str> = qualifier.iter().map(|i| i.value.as_str()).collect();
                scope.resolve(Some(&qualifier.join(".")), &column.value)
            }
            None => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Collects the base columns referenced by one expression
///
/// Column references at the top level resolve in the enclosing scope. A
/// nested query contributes the sources of its own output columns and its
/// body is skipped.
struct SourceCollector<'a> {
    scope: &'a RelationScope,
    ctes: &'a CteColumns,
    nested: usize,
    sources: Vec<String>,
}

impl Visitor for SourceCollector<'_> {
    type Break = Infallible;

    fn pre_visit_query(&mut self, query: &Query) -> ControlFlow<Infallible> {
        if self.nested == 0 {
            for column in query_columns(query, self.ctes) {
                for source in column.sources {
                    push_unique(&mut self.sources, source);
                }
            }
        }
        self.nested += 1;
        ControlFlow::Continue(())
    }

    fn post_visit_query(&mut self, _query: &Query) -> ControlFlow<Infallible> {
        self.nested = self.nested.saturating_sub(1);
        ControlFlow::Continue(())
    }

    fn pre_visit_expr(&mut self, expr: &Expr) -> ControlFlow<Infallible> {
        if self.nested == 0 {
            for source in identifier_sources(expr, self.scope) {
                push_unique(&mut self.sources, source);
            }
        }
        ControlFlow::Continue(())
    }
}

/// Base columns referenced anywhere in `expr`
fn expr_sources(expr: &Expr, scope: &RelationScope, ctes: &CteColumns) -> Vec<String> {
    let mut collector = SourceCollector {
        scope,
        ctes,
        nested: 0,
        sources: Vec::new(),
    };
    let ControlFlow::Continue(()) = expr.visit(&mut collector);
    collector.sources
}

fn output_name(expr: &Expr) -> String {
    match expr {
        Expr::Identifier(ident) => ident.value.clone(),
        Expr::CompoundIdentifier(idents) => idents
            .last()
            .map(|ident| ident.value.clone())
            .unwrap_or_else(|| expr.to_string()),
        _ => expr.to_string(),
    }
}

fn select_columns(select: &Select, ctes: &CteColumns) -> Vec<OutputColumn> {
    let scope = RelationScope::from_select(select, ctes);
    let mut columns = Vec::new();

    for item in &select.projection {
        match item {
            SelectItem::UnnamedExpr(expr) => columns.push(OutputColumn {
                name: output_name(expr),
                sources: expr_sources(expr, &scope, ctes),
            }),
            SelectItem::ExprWithAlias { expr, alias } => columns.push(OutputColumn {
                name: alias.value.clone(),
                sources: expr_sources(expr, &scope, ctes),
            }),
            SelectItem::Wildcard(_) => {
                for (_, relation) in &scope.relations {
                    columns.extend(relation.wildcard_columns());
                }
            }
            SelectItem::QualifiedWildcard(SelectItemQualifiedWildcardKind::ObjectName(name), _) => {
                let parts: Vec<&str> = name
                    .0
                    .iter()
                    .filter_map(|part| part.as_ident())
                    .map(|ident| ident.value.as_str())
                    .collect();
                let qualifier = parts.join(".");
                match scope.find(&qualifier) {
                    Some(relation) => columns.extend(relation.wildcard_columns()),
                    None => columns.push(OutputColumn::wildcard(&qualifier)),
                }
            }
            SelectItem::QualifiedWildcard(SelectItemQualifiedWildcardKind::Expr(expr), _) => {
                debug!(expr = %expr, "Skipping wildcard over an expression");
            }
        }
    }
    columns
}

fn set_expr_columns(body: &SetExpr, ctes: &CteColumns) -> Vec<OutputColumn> {
    match body {
        SetExpr::Select(select) => select_columns(select, ctes),
        SetExpr::Query(query) => query_columns(query, ctes),
        SetExpr::SetOperation { left, right, .. } => {
            // Output names come from the left branch
            let mut columns = set_expr_columns(left, ctes);
            for (column, other) in columns.iter_mut().zip(set_expr_columns(right, ctes)) {
                for source in other.sources {
                    push_unique(&mut column.sources, source);
                }
            }
            columns
        }
        _ => Vec::new(),
    }
}

fn query_columns(query: &Query, ctes: &CteColumns) -> Vec<OutputColumn> {
    let mut scoped = ctes.clone();
    if let Some(with) = &query.with {
        for cte in &with.cte_tables {
            let columns = query_columns(&cte.query, &scoped);
            scoped.insert(cte.alias.name.value.to_ascii_lowercase(), columns);
        }
    }
    set_expr_columns(&query.body, &scoped)
}

/// One `[source, target]` path per source of each column
fn target_paths<I>(columns: Vec<OutputColumn>, targets: I) -> Vec<DependencyPath>
where
    I: IntoIterator<Item = String>,
{
    columns
        .into_iter()
        .zip(targets)
        .flat_map(|(column, target)| {
            column
                .sources
                .into_iter()
                .map(move |source| vec![source, target.clone()])
        })
        .collect()
}

/// Paths for a query whose results land in `table`
fn table_paths(
    table: &str,
    query: &Query,
    explicit_columns: &[String],
) -> Vec<DependencyPath> {
    let columns = query_columns(query, &CteColumns::new());
    let names: Vec<String> = if explicit_columns.len() == columns.len() {
        explicit_columns.to_vec()
    } else {
        columns.iter().map(|c| c.name.clone()).collect()
    };
    let targets = names.into_iter().map(|name| format!("{table}.{name}"));
    target_paths(columns, targets)
}

/// `sqlparser`-backed [`LineageAnalyzer`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlLineageAnalyzer {
    dialect: Dialect,
}

impl SqlLineageAnalyzer {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn statement_paths(&self, statement: &Statement) -> LineageResult<Vec<DependencyPath>> {
        match statement {
            Statement::Query(query) => {
                let columns = query_columns(query, &CteColumns::new());
                let targets: Vec<String> = columns.iter().map(|c| c.name.clone()).collect();
                Ok(target_paths(columns, targets))
            }
            Statement::Insert(insert) => {
                if let TableObject::TableFunction(_) = &insert.table {
                    return Err(LineageError::Unsupported(
                        "INSERT into a table function".to_string(),
                    ));
                }
                let Some(source) = &insert.source else {
                    return Ok(Vec::new());
                };
                let explicit: Vec<String> = insert.columns.iter().map(ToString::to_string).collect();
                Ok(table_paths(&insert.table.to_string(), source, &explicit))
            }
            Statement::CreateTable(create) => Ok(create
                .query
                .as_ref()
                .map(|query| table_paths(&create.name.to_string(), query, &[]))
                .unwrap_or_default()),
            _ => Ok(Vec::new()),
        }
    }
}

impl LineageAnalyzer for SqlLineageAnalyzer {
    fn dependencies(&self, sql: &str) -> LineageResult<Vec<DependencyPath>> {
        let parser_dialect = self.dialect.parser_dialect();
        let statements = Parser::parse_sql(parser_dialect.as_ref(), sql)
            .map_err(|e| LineageError::Parse(e.to_string()))?;

        let mut paths = Vec::new();
        for statement in &statements {
            paths.extend(self.statement_paths(statement)?);
        }
        debug!(dialect = %self.dialect, paths = paths.len(), "Analyzed statement lineage");
        Ok(paths)
    }
}
