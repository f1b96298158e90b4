//! Query execution results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single scalar produced by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl CellValue {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::Blob(bytes) => write!(f, "<blob {} bytes>", bytes.len()),
        }
    }
}

/// Rows produced by one statement, with the column names it reported.
///
/// Every row has exactly `columns.len()` values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl ResultSet {
    #[must_use]
    pub const fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Everything a batch of statements returned.
///
/// Only statements that yielded at least one row contribute a [`ResultSet`],
/// so a batch of DDL/DML (or a `SELECT` matching nothing) is an empty result,
/// which is distinct from a failed query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryResult {
    sets: Vec<ResultSet>,
}

impl QueryResult {
    #[must_use]
    pub const fn new(sets: Vec<ResultSet>) -> Self {
        Self { sets }
    }

    #[must_use]
    pub fn sets(&self) -> &[ResultSet] {
        &self.sets
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Total rows across all result sets.
    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.sets.iter().map(ResultSet::row_count).sum()
    }

    pub(crate) fn push(&mut self, set: ResultSet) {
        self.sets.push(set);
    }
}

impl FromIterator<ResultSet> for QueryResult {
    fn from_iter<I: IntoIterator<Item = ResultSet>>(iter: I) -> Self {
        let mut result = Self::default();
        for set in iter {
            result.push(set);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn cell_display() {
        assert_eq!(CellValue::Null.to_string(), "NULL");
        assert_eq!(CellValue::Integer(42).to_string(), "42");
        assert_eq!(CellValue::Real(1.5).to_string(), "1.5");
        assert_eq!(CellValue::Text("ada".into()).to_string(), "ada");
        assert_eq!(CellValue::Blob(vec![0, 1, 2]).to_string(), "<blob 3 bytes>");
    }

    #[test]
    fn cells_serialize_as_plain_scalars() {
        let row = vec![
            CellValue::Integer(1),
            CellValue::Text("x".into()),
            CellValue::Null,
        ];
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"[1,"x",null]"#);
    }

    #[test]
    fn empty_result_is_not_an_error_shape() {
        let result = QueryResult::default();
        assert!(result.is_empty());
        assert_eq!(result.total_rows(), 0);
        assert_eq!(serde_json::to_string(&result).unwrap(), "[]");
    }

    #[test]
    fn total_rows_spans_sets() {
        let result: QueryResult = [
            ResultSet {
                columns: vec!["a".into()],
                rows: vec![vec![CellValue::Integer(1)], vec![CellValue::Integer(2)]],
            },
            ResultSet {
                columns: vec!["b".into()],
                rows: vec![vec![CellValue::Integer(3)]],
            },
        ]
        .into_iter()
        .collect();
        assert_eq!(result.sets().len(), 2);
        assert_eq!(result.total_rows(), 3);
    }
}
