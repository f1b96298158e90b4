use std::fmt::Write;

use gem_core::defaults::WAL_GUIDANCE;
use gem_core::{QueryResult, ResultSet, Schema};
use gem_session::{SessionError, SessionView};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::progress;
use crate::ui;

pub mod table;

pub const NO_QUERY_YET: &str = "No results to display. Run a query to see the output.";
pub const NO_ROWS: &str = "No results. The query ran but returned no rows.";
pub const AI_DISABLED: &str = "AI features disabled. Please provide an API key.";

/// Print rendered output, keeping any active spinner out of the way.
pub fn print(rendered: &str) {
    progress::suspend(|| println!("{rendered}"));
}

/// Print to stderr, keeping any active spinner out of the way.
pub fn eprint(rendered: &str) {
    progress::suspend(|| eprintln!("{rendered}"));
}

fn table_options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.color,
    }
}

fn render_json<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Raw => serde_json::to_string(value)?,
        OutputFormat::Json | OutputFormat::Table => serde_json::to_string_pretty(value)?,
    })
}

#[derive(Serialize)]
struct ResultSetPayload<'a> {
    columns: &'a [String],
    rows: &'a [Vec<gem_core::CellValue>],
    total_rows: usize,
    truncated: bool,
}

impl<'a> ResultSetPayload<'a> {
    fn new(set: &'a ResultSet, limit: Option<usize>) -> Self {
        let shown = limit.map_or(set.rows.len(), |limit| limit.min(set.rows.len()));
        Self {
            columns: &set.columns,
            rows: &set.rows[..shown],
            total_rows: set.rows.len(),
            truncated: shown < set.rows.len(),
        }
    }
}

/// Render a query result. `limit` caps the rows shown per result set.
pub fn render_result(
    result: &QueryResult,
    format: OutputFormat,
    limit: Option<usize>,
) -> anyhow::Result<String> {
    if format != OutputFormat::Table {
        let payload = result
            .sets()
            .iter()
            .map(|set| ResultSetPayload::new(set, limit))
            .collect::<Vec<_>>();
        return render_json(&payload, format);
    }

    if result.is_empty() {
        return Ok(NO_ROWS.to_string());
    }

    let options = table_options();
    let mut out = String::new();
    for (index, set) in result.sets().iter().enumerate() {
        if index > 0 {
            out.push_str("\n\n");
        }
        let payload = ResultSetPayload::new(set, limit);
        out.push_str(&table::render_grid(set.columns.as_slice(), payload.rows, options));
        let _ = write!(out, "\n({} row{}", payload.total_rows, plural(payload.total_rows));
        if payload.truncated {
            let _ = write!(out, ", showing first {}", payload.rows.len());
        }
        out.push(')');
    }
    Ok(out)
}

const fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

/// Render the schema explorer: each table followed by its indented columns.
pub fn render_schema(schema: &Schema, format: OutputFormat) -> anyhow::Result<String> {
    if format != OutputFormat::Table {
        return render_json(schema, format);
    }
    if schema.is_empty() {
        return Ok(WAL_GUIDANCE.to_string());
    }

    let color = ui::prefs().color;
    let mut out = String::new();
    for (index, table) in schema.tables().iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        if color {
            out.push_str(&table::paint("1;36", &table.name));
        } else {
            out.push_str(&table.name);
        }

        let name_width = table
            .columns
            .iter()
            .map(|column| column.name.chars().count())
            .max()
            .unwrap_or(0);
        for column in &table.columns {
            let _ = write!(out, "\n  {:<name_width$}", column.name);
            if !column.declared_type.is_empty() {
                let _ = write!(out, "  {}", column.declared_type);
            }
        }
    }
    Ok(out.lines().map(str::trim_end).collect::<Vec<_>>().join("\n"))
}

/// Error panel text. Notices are labelled differently from failures.
#[must_use]
pub fn render_error(error: &SessionError) -> String {
    let label = if error.is_informational() {
        "Notice"
    } else {
        "Error"
    };
    let label = if ui::prefs().color {
        table::paint(if error.is_informational() { "33" } else { "31" }, label)
    } else {
        label.to_string()
    };
    format!("{label}: {error}")
}

/// The results panel: an error suppresses results; no outcome yet is not the
/// same as an empty result.
pub fn render_results_panel(view: &SessionView, limit: Option<usize>) -> anyhow::Result<String> {
    if let Some(error) = view.last_error() {
        return Ok(render_error(error));
    }
    match view.last_result() {
        Some(result) => render_result(result, OutputFormat::Table, limit),
        None if view.is_executing_query => Ok("Running query...".to_string()),
        None => Ok(NO_QUERY_YET.to_string()),
    }
}

/// Connection line shown above the schema explorer.
#[must_use]
pub fn render_status(view: &SessionView, engine_version: Option<&str>) -> String {
    let mut out = match &view.file_name {
        Some(name) if view.connected => format!("Connected to: {name}"),
        _ => "No database loaded.".to_string(),
    };
    if let Some(schema) = view.schema.as_deref().filter(|_| view.connected) {
        let _ = write!(out, "\nTables: {}", schema.len());
    }
    let _ = write!(
        out,
        "\nSchema explorer: {}",
        if view.sidebar_open { "open" } else { "closed" }
    );
    let _ = write!(
        out,
        "\nAI: {}",
        if view.ai_available {
            "available"
        } else {
            AI_DISABLED
        }
    );
    if let Some(version) = engine_version {
        let _ = write!(out, "\nSQLite {version}");
    }
    out
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use gem_core::{CellValue, Column, Table};
    use gem_session::Outcome;
    use pretty_assertions::assert_eq;

    use super::*;

    fn users() -> QueryResult {
        QueryResult::new(vec![ResultSet {
            columns: vec!["id".into(), "name".into()],
            rows: vec![
                vec![CellValue::Integer(1), CellValue::Text("ada".into())],
                vec![CellValue::Integer(2), CellValue::Text("grace".into())],
            ],
        }])
    }

    #[test]
    fn json_result_is_valid_json() {
        let out = render_result(&users(), OutputFormat::Json, None).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0]["columns"][1], "name");
        assert_eq!(parsed[0]["rows"][1][1], "grace");
        assert_eq!(parsed[0]["truncated"], false);
    }

    #[test]
    fn raw_result_is_single_line() {
        let out = render_result(&users(), OutputFormat::Raw, Some(1)).unwrap();
        assert!(!out.contains('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0]["rows"].as_array().unwrap().len(), 1);
        assert_eq!(parsed[0]["total_rows"], 2);
    }

    #[test]
    fn table_result_reports_row_counts() {
        let out = render_result(&users(), OutputFormat::Table, None).unwrap();
        assert!(out.starts_with("id"));
        assert!(out.ends_with("(2 rows)"));

        let out = render_result(&users(), OutputFormat::Table, Some(1)).unwrap();
        assert!(!out.contains("grace"));
        assert!(out.ends_with("(2 rows, showing first 1)"));
    }

    #[test]
    fn empty_result_differs_from_no_query() {
        let empty = render_result(&QueryResult::default(), OutputFormat::Table, None).unwrap();
        assert_eq!(empty, NO_ROWS);

        let view = SessionView::initial(true);
        assert_eq!(render_results_panel(&view, None).unwrap(), NO_QUERY_YET);
    }

    #[test]
    fn error_suppresses_results() {
        let mut view = SessionView::initial(true);
        view.outcome = Some(Outcome::Failure(SessionError::Query(
            "no such table: missing".into(),
        )));
        assert_eq!(
            render_results_panel(&view, None).unwrap(),
            "Error: no such table: missing"
        );

        view.outcome = Some(Outcome::Success(Arc::new(users())));
        assert!(render_results_panel(&view, None).unwrap().contains("grace"));
    }

    #[test]
    fn schema_tree_lists_tables_then_columns() {
        let schema = Schema::new(vec![
            Table::new(
                "users",
                vec![Column::new("id", "INTEGER"), Column::new("name", "TEXT")],
            ),
            Table::new("tags", vec![Column::new("label", "")]),
        ]);
        assert_eq!(
            render_schema(&schema, OutputFormat::Table).unwrap(),
            "users\n  id    INTEGER\n  name  TEXT\ntags\n  label"
        );
    }

    #[test]
    fn empty_schema_shows_guidance() {
        let out = render_schema(&Schema::default(), OutputFormat::Table).unwrap();
        assert_eq!(out, WAL_GUIDANCE);

        let json = render_schema(&Schema::default(), OutputFormat::Json).unwrap();
        assert_eq!(json, "[]");
    }

    #[test]
    fn status_mentions_connection_and_ai() {
        let mut view = SessionView::initial(false);
        let status = render_status(&view, None);
        assert!(status.starts_with("No database loaded."));
        assert!(status.contains(AI_DISABLED));

        view.connected = true;
        view.file_name = Some("users.db".into());
        view.schema = Some(Arc::new(Schema::default()));
        let status = render_status(&view, Some("3.45.1"));
        assert!(status.starts_with("Connected to: users.db\nTables: 0"));
        assert!(status.ends_with("SQLite 3.45.1"));
    }
}
