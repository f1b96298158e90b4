//! Open database handles.

use gem_core::{CellValue, Column, QueryResult, ResultSet, Schema, Table};
use libsql::Builder;
use tempfile::TempDir;

use crate::error::{EngineError, open_error, query_error};
use crate::runtime::SCRATCH_PREFIX;
use crate::split::{split_statements, statement_head};

/// File name of the materialized image inside its scratch directory.
const IMAGE_FILE: &str = "image.db";

/// User tables in catalog order. `_` is escaped so only the reserved
/// `sqlite_` prefix is excluded.
const LIST_TABLES_SQL: &str = r"SELECT name FROM sqlite_master
WHERE type = 'table' AND name NOT LIKE 'sqlite\_%' ESCAPE '\'
ORDER BY rowid";

const TABLE_COLUMNS_SQL: &str =
    r#"SELECT cid, name, "type" FROM pragma_table_info(?1) ORDER BY cid"#;

/// Engine-side resources for one open image.
///
/// Field order is drop order: the connection goes before the database, and
/// both go before the scratch directory holding the file.
struct OpenDatabase {
    conn: libsql::Connection,
    #[allow(dead_code)]
    db: libsql::Database,
    #[allow(dead_code)]
    image: TempDir,
}

/// Exclusive owner of one opened database image.
///
/// The image is a private copy of the bytes it was opened from, so writes
/// never reach the user's original file. [`DatabaseHandle::close`] releases
/// everything; dropping the handle does the same.
pub struct DatabaseHandle {
    name: String,
    inner: Option<OpenDatabase>,
}

impl std::fmt::Debug for DatabaseHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseHandle")
            .field("name", &self.name)
            .field("open", &self.is_open())
            .finish()
    }
}

impl DatabaseHandle {
    pub(crate) async fn from_bytes(name: &str, bytes: &[u8]) -> Result<Self, EngineError> {
        let image = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir()
            .map_err(|e| EngineError::Open(format!("failed to stage database image: {e}")))?;
        let path = image.path().join(IMAGE_FILE);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| EngineError::Open(format!("failed to stage database image: {e}")))?;

        let db = Builder::new_local(&path).build().await.map_err(open_error)?;
        let conn = db.connect().map_err(open_error)?;

        // libSQL opens lazily; the first catalog read is what rejects a bad image.
        let mut rows = conn
            .query("SELECT count(*) FROM sqlite_master", ())
            .await
            .map_err(open_error)?;
        rows.next().await.map_err(open_error)?;
        drop(rows);

        tracing::info!(name, bytes = bytes.len(), "database opened");
        Ok(Self {
            name: name.to_string(),
            inner: Some(OpenDatabase { conn, db, image }),
        })
    }

    /// Display name of the image (usually the source file name).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.inner.is_some()
    }

    fn conn(&self) -> Result<&libsql::Connection, EngineError> {
        self.inner
            .as_ref()
            .map(|open| &open.conn)
            .ok_or(EngineError::Closed)
    }

    /// Run one or more semicolon-separated statements in order.
    ///
    /// Stops at the first failing statement. Statements that return no rows
    /// contribute nothing to the result.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Query`] with the engine diagnostic, or
    /// [`EngineError::Closed`] if the handle is closed.
    pub async fn execute(&self, sql: &str) -> Result<QueryResult, EngineError> {
        let conn = self.conn()?;
        run_batch(conn, sql).await
    }

    /// Like [`DatabaseHandle::execute`], but the engine rejects any write.
    ///
    /// Runs with `PRAGMA query_only` enabled and always switches it back off
    /// afterwards. `PRAGMA query_only`, `VACUUM` and `ATTACH` are refused
    /// before anything runs: the first could lift the guard, the others can
    /// create files outside the image even when the write itself fails.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Query`] for failing or writing statements, or
    /// [`EngineError::Closed`] if the handle is closed.
    pub async fn execute_read_only(&self, sql: &str) -> Result<QueryResult, EngineError> {
        let conn = self.conn()?;

        if let Some(refusal) = split_statements(sql).into_iter().find_map(read_only_refusal) {
            return Err(EngineError::Query(refusal));
        }

        conn.execute("PRAGMA query_only = ON", ())
            .await
            .map_err(query_error)?;
        let outcome = run_batch(conn, sql).await;
        if let Err(error) = conn.execute("PRAGMA query_only = OFF", ()).await {
            tracing::warn!(%error, name = %self.name, "failed to leave query_only mode");
        }
        outcome
    }

    /// Read the user tables and their columns.
    ///
    /// A valid database without user tables yields an empty [`Schema`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Query`] if a metadata query fails, or
    /// [`EngineError::Closed`] if the handle is closed.
    pub async fn read_schema(&self) -> Result<Schema, EngineError> {
        let conn = self.conn()?;

        let mut names = Vec::new();
        let mut rows = conn.query(LIST_TABLES_SQL, ()).await.map_err(query_error)?;
        while let Some(row) = rows.next().await.map_err(query_error)? {
            names.push(row.get::<String>(0).map_err(query_error)?);
        }
        drop(rows);

        let mut tables = Vec::with_capacity(names.len());
        for name in names {
            let mut columns = Vec::new();
            let mut rows = conn
                .query(TABLE_COLUMNS_SQL, [name.as_str()])
                .await
                .map_err(query_error)?;
            while let Some(row) = rows.next().await.map_err(query_error)? {
                let column_name = row.get::<String>(1).map_err(query_error)?;
                let declared_type = row
                    .get::<Option<String>>(2)
                    .map_err(query_error)?
                    .unwrap_or_default();
                columns.push(Column::new(column_name, declared_type));
            }
            tables.push(Table::new(name, columns));
        }

        tracing::debug!(name = %self.name, tables = tables.len(), "schema read");
        Ok(Schema::new(tables))
    }

    /// Release the connection, the database and the scratch image.
    ///
    /// Calling it again, or on a handle that failed to open, does nothing.
    pub fn close(&mut self) {
        if let Some(open) = self.inner.take() {
            drop(open);
            tracing::info!(name = %self.name, "database closed");
        }
    }
}

async fn run_batch(conn: &libsql::Connection, sql: &str) -> Result<QueryResult, EngineError> {
    let statements = split_statements(sql);
    if statements.is_empty() {
        return Err(EngineError::Query("no SQL statement to execute".to_string()));
    }

    let mut sets = Vec::new();
    for statement in statements {
        let mut rows = conn.query(statement, ()).await.map_err(query_error)?;
        let width = rows.column_count();
        let columns = (0..width)
            .map(|idx| rows.column_name(idx).unwrap_or_default().to_string())
            .collect();
        let mut set = ResultSet::new(columns);

        while let Some(row) = rows.next().await.map_err(query_error)? {
            let mut values = Vec::with_capacity(set.columns.len());
            for idx in 0..width {
                values.push(to_cell(row.get_value(idx).map_err(query_error)?));
            }
            set.rows.push(values);
        }

        if !set.rows.is_empty() {
            sets.push(set);
        }
    }

    Ok(QueryResult::new(sets))
}

/// Why `statement` may not run in read-only mode, if it may not.
fn read_only_refusal(statement: &str) -> Option<String> {
    let head = statement_head(statement);
    if head.pragma.as_deref() == Some("query_only") {
        return Some("PRAGMA query_only is not allowed in read-only mode".to_string());
    }
    matches!(head.keyword.as_str(), "vacuum" | "attach").then(|| {
        format!(
            "{} is not allowed in read-only mode",
            head.keyword.to_ascii_uppercase()
        )
    })
}

fn to_cell(value: libsql::Value) -> CellValue {
    match value {
        libsql::Value::Null => CellValue::Null,
        libsql::Value::Integer(v) => CellValue::Integer(v),
        libsql::Value::Real(v) => CellValue::Real(v),
        libsql::Value::Text(v) => CellValue::Text(v),
        libsql::Value::Blob(v) => CellValue::Blob(v),
    }
}
