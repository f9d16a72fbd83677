//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders slice snapshots in the format selected by `--output`. Tables
//! use `tabled`, structured formats go through serde, plain emits one
//! identifier per line.

use std::io::{self, Write};

use tabled::{Table, Tabled, settings::Style};

use crate::cli::OutputFormat;

/// Render a list in the chosen format.
///
/// - `table`: one `Tabled` row per item via `to_row`
/// - `json` / `json-compact` / `yaml`: the items themselves via serde
/// - `plain`: `id_fn` per item, one per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Table::new(rows).with(Style::rounded()).to_string()
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render one item; `table` uses the pre-formatted `detail_fn` view.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Print a status line to stderr, respecting quiet mode.
pub fn print_notice(notice: &str, quiet: bool) {
    if !quiet && !notice.is_empty() {
        eprintln!("{notice}");
    }
}

/// `label: value` lines with the labels padded to a common width.
pub fn detail_lines(fields: &[(&str, String)]) -> String {
    let width = fields.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    fields
        .iter()
        .map(|(label, value)| format!("{label:<width$}  {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.unwrap_or_else(|e| format!("{{\"error\": \"serialization failed: {e}\"}}"))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| format!("error: serialization failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Serialize)]
    struct Item {
        id: i64,
        name: &'static str,
    }

    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "Name")]
        name: String,
    }

    fn items() -> Vec<Item> {
        vec![Item { id: 4, name: "Ana" }, Item { id: 9, name: "Radu" }]
    }

    #[test]
    fn plain_lists_one_id_per_line() {
        let out = render_list(
            &OutputFormat::Plain,
            &items(),
            |i| Row { name: i.name.into() },
            |i| i.id.to_string(),
        );
        assert_eq!(out, "4\n9");
    }

    #[test]
    fn table_uses_row_headers() {
        let out = render_list(
            &OutputFormat::Table,
            &items(),
            |i| Row { name: i.name.into() },
            |i| i.id.to_string(),
        );
        assert!(out.contains("Name"));
        assert!(out.contains("Radu"));
    }

    #[test]
    fn compact_json_is_single_line() {
        let out = render_single(&OutputFormat::JsonCompact, &items()[0], |_| String::new(), |_| String::new());
        assert_eq!(out, r#"{"id":4,"name":"Ana"}"#);
    }

    #[test]
    fn detail_lines_align_values() {
        let out = detail_lines(&[("ID", "4".into()), ("Name", "Ana".into())]);
        assert_eq!(out, "ID    4\nName  Ana");
    }
}
