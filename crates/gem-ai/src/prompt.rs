//! Prompt construction and response clean-up.

use std::fmt::Write;

use gem_core::Schema;

/// One line pair per table: `-- Table: <name>` then its columns.
#[must_use]
pub fn format_schema(schema: &Schema) -> String {
    let mut out = String::new();
    for (index, table) in schema.tables().iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        let columns = table
            .columns
            .iter()
            .map(|column| {
                if column.declared_type.is_empty() {
                    column.name.clone()
                } else {
                    format!("{} ({})", column.name, column.declared_type)
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(out, "-- Table: {}\n-- Columns: {columns}", table.name);
    }
    out
}

/// Deterministic prompt for a schema and a question.
#[must_use]
pub fn build_prompt(schema: &Schema, question: &str) -> String {
    format!(
        "You are an expert SQLite3 database engineer.\n\
         Given the database schema below, write one valid SQLite3 query that answers the user's question.\n\n\
         Output only the raw SQL. No explanations, no markdown, no code fences.\n\n\
         Schema:\n{schema}\n\n\
         Question:\n{question}\n\n\
         SQL:\n",
        schema = format_schema(schema),
        question = question.trim(),
    )
}

/// Remove one surrounding markdown code fence and outer whitespace.
///
/// The opening fence may carry a `sql`, `sqlite` or `sqlite3` language tag;
/// any other first line is kept as SQL.
/// Text that is not fenced is only trimmed.
#[must_use]
pub fn strip_code_fences(raw: &str) -> String {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        text = match rest.find('\n') {
            Some(newline) if is_language_tag(rest[..newline].trim_end()) => &rest[newline + 1..],
            Some(_) => rest,
            None => strip_inline_tag(rest),
        };
    }

    let text = text.trim_end();
    text.strip_suffix("```").unwrap_or(text).trim().to_string()
}

fn is_language_tag(candidate: &str) -> bool {
    matches!(candidate, "" | "sql" | "sqlite" | "sqlite3")
}

/// Single-line fences: "```sql SELECT 1```".
fn strip_inline_tag(rest: &str) -> &str {
    let tag_end = rest
        .find(|c: char| c.is_whitespace())
        .unwrap_or(rest.len());
    let tag = &rest[..tag_end];
    if !tag.is_empty() && tag_end < rest.len() && matches!(tag, "sql" | "sqlite" | "sqlite3") {
        &rest[tag_end..]
    } else {
        rest
    }
}

#[cfg(test)]
mod tests {
    use gem_core::{Column, Table};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn schema() -> Schema {
        Schema::new(vec![
            Table::new(
                "users",
                vec![Column::new("id", "INTEGER"), Column::new("name", "TEXT")],
            ),
            Table::new("tags", vec![Column::new("label", "")]),
        ])
    }

    #[test]
    fn schema_lines() {
        assert_eq!(
            format_schema(&schema()),
            "-- Table: users\n-- Columns: id (INTEGER), name (TEXT)\n-- Table: tags\n-- Columns: label"
        );
    }

    #[test]
    fn prompt_is_deterministic_and_ordered() {
        let first = build_prompt(&schema(), "  who signed up last?  ");
        let second = build_prompt(&schema(), "who signed up last?");
        assert_eq!(first, second);

        let schema_at = first.find("-- Table: users").unwrap();
        let question_at = first.find("who signed up last?").unwrap();
        assert!(schema_at < question_at);
        assert!(first.trim_end().ends_with("SQL:"));
    }

    #[rstest]
    #[case("```sql\nSELECT 1;\n```", "SELECT 1;")]
    #[case("```\nSELECT 1;\n```", "SELECT 1;")]
    #[case("```sqlite\nSELECT *\nFROM users;\n```\n", "SELECT *\nFROM users;")]
    #[case("  \n```sql\n  SELECT 1;  \n```  \n", "SELECT 1;")]
    #[case("SELECT 1;", "SELECT 1;")]
    #[case("  SELECT 1;\n", "SELECT 1;")]
    #[case("```SELECT 1;```", "SELECT 1;")]
    #[case("```sql SELECT 1;```", "SELECT 1;")]
    #[case("```SELECT\n* FROM t\n```", "SELECT\n* FROM t")]
    #[case("SELECT 1;\n```", "SELECT 1;")]
    #[case("```select\nname from users;\n```", "select\nname from users;")]
    #[case("```sqlite3\nwith t as (select 1) select * from t\n```", "with t as (select 1) select * from t")]
    fn strips_fences(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(strip_code_fences(raw), expected);
    }
}
