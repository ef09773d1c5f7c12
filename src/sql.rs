//! SQL statement construction and value escaping
//!
//! All SQL text interpolation in the crate goes through this module. The
//! statement interface is raw text (no parameter binding), so every value
//! rendered into a statement must pass through [`SqlValue::render`], which
//! owns the single escaping code path.

use std::fmt::Write;

/// Escape a text value for inclusion in a single-quoted SQL literal.
///
/// Quote-delimiter doubling. This is a correctness measure for trusted
/// batch data (titles containing apostrophes), not a security boundary.
pub fn escape(value: &str) -> String {
    value.replace('\'', "''")
}

/// A typed value destined for one column of a generated statement.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Integer(i64),
    Real(f64),
    Text(String),
    /// Nullable text; absent values render as an empty-string literal,
    /// never the NULL keyword.
    OptionalText(Option<String>),
}

impl SqlValue {
    /// Render the value as SQL literal text, escaping where required.
    pub fn render(&self) -> String {
        match self {
            SqlValue::Integer(i) => i.to_string(),
            SqlValue::Real(r) => r.to_string(),
            SqlValue::Text(s) => format!("'{}'", escape(s)),
            SqlValue::OptionalText(Some(s)) => format!("'{}'", escape(s)),
            SqlValue::OptionalText(None) => "''".to_string(),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Integer(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Real(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<Option<String>> for SqlValue {
    fn from(v: Option<String>) -> Self {
        SqlValue::OptionalText(v)
    }
}

/// Builder for INSERT statements against one table.
#[derive(Debug, Clone)]
pub struct InsertBuilder {
    table: String,
    columns: Vec<String>,
}

impl InsertBuilder {
    pub fn new(table: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            table: table.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn prefix(&self) -> String {
        format!(
            "INSERT INTO {} ({}) VALUES ",
            self.table,
            self.columns.join(", ")
        )
    }

    fn tuple(row: &[SqlValue]) -> String {
        let rendered: Vec<String> = row.iter().map(SqlValue::render).collect();
        format!("({})", rendered.join(", "))
    }

    /// Build one multi-row INSERT with one value tuple per record.
    ///
    /// Panics in debug builds if a row's width differs from the declared
    /// column list; the statement would be rejected by the engine anyway.
    pub fn multi_row(&self, rows: &[Vec<SqlValue>]) -> String {
        debug_assert!(rows.iter().all(|r| r.len() == self.columns.len()));

        let mut statement = self.prefix();
        for (i, row) in rows.iter().enumerate() {
            if i > 0 {
                statement.push_str(", ");
            }
            let _ = write!(statement, "{}", Self::tuple(row));
        }
        statement
    }

    /// Build a single-row INSERT.
    pub fn single_row(&self, row: &[SqlValue]) -> String {
        debug_assert_eq!(row.len(), self.columns.len());
        format!("{}{}", self.prefix(), Self::tuple(row))
    }
}
