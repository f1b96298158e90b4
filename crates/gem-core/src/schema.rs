//! Database schema model.
//!
//! A [`Schema`] is rebuilt wholesale every time a database is opened; nothing
//! here is ever patched in place.

use serde::{Deserialize, Serialize};

/// One column of a user table, in engine-reported ordinal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    /// Declared type as written in `CREATE TABLE`. Empty when none was given.
    pub declared_type: String,
}

impl Column {
    #[must_use]
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
        }
    }
}

/// A user-defined table and its columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

impl Table {
    #[must_use]
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }
}

/// Ordered list of user tables. Engine-internal tables are never included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    tables: Vec<Table>,
}

impl Schema {
    #[must_use]
    pub const fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    #[must_use]
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// The table whose name seeds the default query after a load.
    #[must_use]
    pub fn first_table(&self) -> Option<&Table> {
        self.tables.first()
    }

    #[must_use]
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|table| table.name == name)
    }
}

impl From<Vec<Table>> for Schema {
    fn from(tables: Vec<Table>) -> Self {
        Self::new(tables)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn users_schema() -> Schema {
        Schema::new(vec![
            Table::new(
                "users",
                vec![Column::new("id", "INTEGER"), Column::new("name", "TEXT")],
            ),
            Table::new("orders", vec![Column::new("id", "INTEGER")]),
        ])
    }

    #[test]
    fn first_table_follows_catalog_order() {
        let schema = users_schema();
        assert_eq!(schema.first_table().map(|t| t.name.as_str()), Some("users"));
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn empty_schema_has_no_first_table() {
        let schema = Schema::default();
        assert!(schema.is_empty());
        assert!(schema.first_table().is_none());
    }

    #[test]
    fn lookup_by_name() {
        let schema = users_schema();
        let orders = schema.table("orders").expect("orders exists");
        assert_eq!(orders.columns.len(), 1);
        assert!(schema.table("missing").is_none());
    }

    #[test]
    fn serializes_as_plain_array() {
        let json = serde_json::to_value(users_schema()).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["name"], "users");
        assert_eq!(json[0]["columns"][1]["declared_type"], "TEXT");
    }
}
