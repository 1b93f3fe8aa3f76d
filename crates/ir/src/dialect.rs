// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Dialect Support
//!
//! This module defines the SQL dialects a batch can be analyzed with.
//!
//! ## Design
//!
//! The dialect only influences tokenizing and parsing. Transformation
//! classification is pattern based and dialect-agnostic, so a statement
//! that the selected dialect cannot parse still gets its tags and a
//! degraded context.
//!
//! - **Generic**: permissive ANSI-ish parsing, the default
//! - **MySQL**: backtick identifiers, `#` comments
//! - **PostgreSQL**: dollar-quoted strings, `::` casts
//! - **MsSql**: bracket identifiers, `DATEADD`/`IIF` heavy workloads
//! - **Snowflake**, **Hive**, **BigQuery**: warehouse dialects

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlparser::dialect::{
    BigQueryDialect, Dialect as ParserDialect, GenericDialect, HiveDialect, MsSqlDialect,
    MySqlDialect, PostgreSqlDialect, SnowflakeDialect,
};

use crate::error::IrError;

/// Supported SQL dialects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Dialect-neutral parsing
    #[default]
    Generic,
    /// MySQL (5.7, 8.0) and compatibles
    MySQL,
    /// PostgreSQL (12+) and compatibles
    PostgreSQL,
    /// Microsoft SQL Server / T-SQL
    MsSql,
    /// Snowflake
    Snowflake,
    /// Apache Hive / Spark SQL
    Hive,
    /// Google BigQuery
    BigQuery,
}

impl Dialect {
    /// All dialects, in declaration order
    pub const ALL: [Dialect; 7] = [
        Dialect::Generic,
        Dialect::MySQL,
        Dialect::PostgreSQL,
        Dialect::MsSql,
        Dialect::Snowflake,
        Dialect::Hive,
        Dialect::BigQuery,
    ];

    /// The configuration name of this dialect
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Generic => "generic",
            Dialect::MySQL => "mysql",
            Dialect::PostgreSQL => "postgresql",
            Dialect::MsSql => "mssql",
            Dialect::Snowflake => "snowflake",
            Dialect::Hive => "hive",
            Dialect::BigQuery => "bigquery",
        }
    }

    /// Build the `sqlparser` dialect used to tokenize and parse statements
    pub fn parser_dialect(&self) -> Box<dyn ParserDialect> {
        match self {
            Dialect::Generic => Box::new(GenericDialect {}),
            Dialect::MySQL => Box::new(MySqlDialect {}),
            Dialect::PostgreSQL => Box::new(PostgreSqlDialect {}),
            Dialect::MsSql => Box::new(MsSqlDialect {}),
            Dialect::Snowflake => Box::new(SnowflakeDialect {}),
            Dialect::Hive => Box::new(HiveDialect {}),
            Dialect::BigQuery => Box::new(BigQueryDialect {}),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generic" | "ansi" => Ok(Dialect::Generic),
            "mysql" | "mariadb" | "tidb" => Ok(Dialect::MySQL),
            "postgresql" | "postgres" | "pg" => Ok(Dialect::PostgreSQL),
            "mssql" | "tsql" | "sqlserver" => Ok(Dialect::MsSql),
            "snowflake" => Ok(Dialect::Snowflake),
            "hive" | "spark" => Ok(Dialect::Hive),
            "bigquery" => Ok(Dialect::BigQuery),
            other => Err(IrError::UnknownDialect(other.to_string())),
        }
    }
}
