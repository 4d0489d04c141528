use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(value, table_options()),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn table_options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn render_table<T: Serialize>(value: &T, options: table::TableOptions) -> anyhow::Result<String> {
    match serde_json::to_value(value)? {
        Value::Array(items) => Ok(render_array_table(&items, options)),
        Value::Object(map) => {
            let headers = ["key", "value"];
            let mut entries = map.into_iter().collect::<Vec<_>>();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let rows = entries
                .into_iter()
                .map(|(key, value)| vec![key, value_to_cell(&value)])
                .collect::<Vec<_>>();
            Ok(table::render_entity_table(&headers, &rows, options))
        }
        scalar => Ok(value_to_cell(&scalar)),
    }
}

/// Columns are the union of all row keys, sorted.
fn render_array_table(items: &[Value], options: table::TableOptions) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }

    if !items.iter().all(Value::is_object) {
        let headers = ["value"];
        let rows = items
            .iter()
            .map(|item| vec![value_to_cell(item)])
            .collect::<Vec<_>>();
        return table::render_entity_table(&headers, &rows, options);
    }

    let mut headers = Vec::<&str>::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !headers.contains(&key.as_str()) {
                headers.push(key);
            }
        }
    }
    headers.sort_unstable();

    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| map.get(*header).map_or_else(|| String::from("-"), value_to_cell))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    table::render_entity_table(&headers, &rows, options)
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        Value::Array(items) if items.iter().all(Value::is_string) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Serialize;

    use super::table::TableOptions;
    use super::{render, render_table};
    use crate::cli::OutputFormat;

    const PLAIN: TableOptions = TableOptions {
        max_width: None,
        color: false,
    };

    #[derive(Serialize)]
    struct Row {
        id: &'static str,
        title: &'static str,
        labels: Vec<&'static str>,
        page_id: Option<&'static str>,
    }

    fn row(id: &'static str, title: &'static str) -> Row {
        Row {
            id,
            title,
            labels: vec!["home", "shopping"],
            page_id: None,
        }
    }

    #[test]
    fn json_render_is_valid_json() {
        let out = render(&row("a", "Groceries"), OutputFormat::Json).expect("json render");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["title"], "Groceries");
        assert_eq!(parsed["page_id"], serde_json::Value::Null);
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let out = render(&vec![row("a", "x"), row("b", "y")], OutputFormat::Raw).expect("raw");
        assert!(!out.contains('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn array_table_sorts_columns_and_joins_string_lists() {
        let out = render_table(&vec![row("a", "Groceries")], PLAIN).expect("table");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);

        let header: Vec<&str> = lines[0].split_whitespace().collect();
        assert_eq!(header, vec!["id", "labels", "page_id", "title"]);
        assert!(lines[1].chars().all(|c| c == '-'));
        assert!(lines[2].contains("home, shopping"));
        assert!(lines[2].trim_end().ends_with("Groceries"));
    }

    #[test]
    fn object_table_is_key_value() {
        let out = render_table(&row("a", "Groceries"), PLAIN).expect("table");
        assert!(out.lines().next().is_some_and(|line| line.starts_with("key")));
        assert!(out.contains("Groceries"));
    }

    #[test]
    fn empty_array_says_so() {
        let rows: Vec<Row> = Vec::new();
        assert_eq!(render_table(&rows, PLAIN).expect("table"), "(no rows)");
    }
}
