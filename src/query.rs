//! Typed query helpers returning zero-or-one row or an ordered list of rows

use crate::error::Result;
use crate::stage::StageHandle;
use indexmap::IndexMap;
use rusqlite::types::Value;

/// One result row: an insertion-ordered mapping from column name to value.
///
/// Values are typed per the underlying column declaration (integer, real,
/// text); no coercion is performed beyond what the engine itself provides.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: IndexMap<String, Value>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    pub fn get_i64(&self, column: &str) -> Option<i64> {
        match self.values.get(column) {
            Some(Value::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn get_f64(&self, column: &str) -> Option<f64> {
        match self.values.get(column) {
            Some(Value::Real(r)) => Some(*r),
            _ => None,
        }
    }

    pub fn get_str(&self, column: &str) -> Option<&str> {
        match self.values.get(column) {
            Some(Value::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Column names in result order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    /// Render the row as a JSON object, preserving column order.
    pub fn to_json(&self) -> serde_json::Value {
        let mut object = serde_json::Map::new();
        for (name, value) in &self.values {
            let json = match value {
                Value::Null => serde_json::Value::Null,
                Value::Integer(i) => serde_json::Value::from(*i),
                Value::Real(r) => serde_json::Value::from(*r),
                Value::Text(s) => serde_json::Value::from(s.clone()),
                Value::Blob(b) => serde_json::Value::from(format!("<blob:{} bytes>", b.len())),
            };
            object.insert(name.clone(), json);
        }
        serde_json::Value::Object(object)
    }
}

impl StageHandle {
    /// Execute a read query and return the first row, or `None` if zero
    /// rows matched. Zero rows is never an error; with multiple matches
    /// only the first in engine-defined order is returned, so callers
    /// should write statements that are inherently singular.
    pub fn select_one(&self, sql: &str) -> Result<Option<Row>> {
        let mut stmt = self.conn.prepare(sql)?;
        let column_names: Vec<String> =
            stmt.column_names().iter().map(|c| c.to_string()).collect();

        let mut rows = stmt.query([])?;
        match rows.next()? {
            Some(row) => Ok(Some(read_row(row, &column_names)?)),
            None => Ok(None),
        }
    }

    /// Execute a read query and return all matching rows in the engine's
    /// natural result order. For unordered queries that order is
    /// implementation-defined; tests that depend on ordering must supply
    /// an explicit ORDER BY.
    pub fn select_many(&self, sql: &str) -> Result<Vec<Row>> {
        let mut stmt = self.conn.prepare(sql)?;
        let column_names: Vec<String> =
            stmt.column_names().iter().map(|c| c.to_string()).collect();

        let mut results = Vec::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            results.push(read_row(row, &column_names)?);
        }
        Ok(results)
    }

    /// Count the rows of a table.
    pub fn select_count(&self, table: &str) -> Result<i64> {
        let row = self.select_one(&crate::queries::select_count(table))?;
        Ok(row.and_then(|r| r.get_i64("c")).unwrap_or(0))
    }
}

fn read_row(row: &rusqlite::Row<'_>, column_names: &[String]) -> Result<Row> {
    let mut values = IndexMap::with_capacity(column_names.len());
    for (i, name) in column_names.iter().enumerate() {
        let value: Value = row.get(i)?;
        values.insert(name.clone(), value);
    }
    Ok(Row { values })
}
