use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => Ok(render_table(&serde_json::to_value(value)?)),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", render(value, format)?);
    Ok(())
}

pub fn table_options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn render_table(value: &Value) -> String {
    match value {
        Value::Array(items) => render_rows(items),
        Value::Object(map) => {
            // Paged responses render their items, with the paging line below.
            if let Some(Value::Array(items)) = map.get("items") {
                let footer = format!(
                    "page {} ({} total)",
                    map.get("page").map_or_else(|| "-".into(), cell),
                    map.get("total").map_or_else(|| "-".into(), cell),
                );
                return format!("{}\n{footer}", render_rows(items));
            }
            let rows: Vec<Vec<String>> = map
                .iter()
                .map(|(key, value)| vec![key.clone(), cell(value)])
                .collect();
            table::render(&["key", "value"], &rows, table_options())
        }
        scalar => cell(scalar),
    }
}

fn render_rows(items: &[Value]) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }

    let mut headers: Vec<&str> = Vec::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !headers.contains(&key.as_str()) {
                headers.push(key);
            }
        }
    }
    if headers.is_empty() {
        let rows: Vec<Vec<String>> = items.iter().map(|item| vec![cell(item)]).collect();
        return table::render(&["value"], &rows, table_options());
    }

    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|item| {
            headers
                .iter()
                .map(|header| item.get(header).map_or_else(|| String::from("-"), cell))
                .collect()
        })
        .collect();
    table::render(&headers, &rows, table_options())
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::String(v) => v.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::render;
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Example {
        id: i64,
        status: &'static str,
        patient_id: Option<&'static str>,
    }

    const EXAMPLE: Example = Example {
        id: 7,
        status: "overdue",
        patient_id: None,
    };

    #[test]
    fn json_render_is_valid_json() {
        let out = render(&EXAMPLE, OutputFormat::Json).expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["id"], 7);
        assert!(parsed["patient_id"].is_null());
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let out = render(&EXAMPLE, OutputFormat::Raw).expect("raw render should work");
        assert!(!out.contains('\n'));
        assert!(out.contains("\"status\":\"overdue\""));
    }

    #[test]
    fn table_render_for_object_is_key_value() {
        let out = render(&EXAMPLE, OutputFormat::Table).expect("table render should work");
        assert!(out.lines().next().is_some_and(|line| line.starts_with("key")));
        assert!(out.contains("overdue"));
    }

    #[test]
    fn table_render_for_page_lists_items() {
        let page = serde_json::json!({
            "items": [{"id": 1, "title": "Call back"}, {"id": 2, "title": "Refill"}],
            "page": 1,
            "per_page": 10,
            "total": 2,
            "has_more": false,
        });
        let out = render(&page, OutputFormat::Table).expect("table render should work");
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("id"));
        assert!(lines[0].contains("title"));
        assert_eq!(lines.last().copied(), Some("page 1 (2 total)"));
    }

    #[test]
    fn empty_list_renders_placeholder() {
        let rows: Vec<Example> = Vec::new();
        let out = render(&rows, OutputFormat::Table).expect("table render should work");
        assert_eq!(out, "(no rows)");
    }
}
