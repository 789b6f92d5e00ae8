use serde::Serialize;
use serde_json::{Map, Value};

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

/// Objects become `key | value` rows with nested objects flattened to dotted
/// keys (`execution.severity.critical`); arrays of objects become one row
/// per element.
fn render_table<T: Serialize>(value: &T, options: table::TableOptions) -> anyhow::Result<String> {
    match serde_json::to_value(value)? {
        Value::Array(items) => Ok(render_array_table(&items, options)),
        Value::Object(map) => {
            let mut rows = Vec::new();
            flatten_into("", &map, &mut rows);
            Ok(table::render_entity_table(&["key", "value"], &rows, options))
        }
        scalar => Ok(table::render_entity_table(
            &["value"],
            &[vec![value_to_cell(&scalar)]],
            options,
        )),
    }
}

fn flatten_into(prefix: &str, map: &Map<String, Value>, rows: &mut Vec<Vec<String>>) {
    let mut entries = map.iter().collect::<Vec<_>>();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    for (key, value) in entries {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(inner) if !inner.is_empty() => flatten_into(&path, inner, rows),
            other => rows.push(vec![path, value_to_cell(other)]),
        }
    }
}

fn render_array_table(items: &[Value], options: table::TableOptions) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }

    if !items.iter().all(Value::is_object) {
        let rows = items
            .iter()
            .map(|item| vec![value_to_cell(item)])
            .collect::<Vec<_>>();
        return table::render_entity_table(&["value"], &rows, options);
    }

    let mut headers = Vec::<String>::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    if headers.is_empty() {
        return String::from("(no columns)");
    }

    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| map.get(header).map_or_else(|| String::from("-"), value_to_cell))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    table::render_entity_table(&header_refs, &rows, options)
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Serialize;

    use super::table::{TableOptions, render_entity_table};
    use super::{render, render_table};
    use crate::cli::OutputFormat;

    const PLAIN: TableOptions = TableOptions {
        max_width: None,
        color: false,
    };

    #[derive(Serialize)]
    struct Breakdown {
        critical: u64,
        major: u64,
    }

    #[derive(Serialize)]
    struct Summary {
        assigned: u64,
        severity: Breakdown,
        refreshed_at: Option<String>,
    }

    fn summary() -> Summary {
        Summary {
            assigned: 4,
            severity: Breakdown {
                critical: 1,
                major: 0,
            },
            refreshed_at: None,
        }
    }

    #[test]
    fn json_render_is_valid_json() {
        let out = render(&summary(), OutputFormat::Json).expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["severity"]["critical"], 1);
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let out = render(&summary(), OutputFormat::Raw).expect("raw render should work");
        assert!(!out.contains('\n'));
    }

    #[test]
    fn nested_objects_flatten_to_dotted_keys() {
        let out = render_table(&summary(), PLAIN).expect("table render should work");
        let keys: Vec<&str> = out
            .lines()
            .skip(2)
            .filter_map(|line| line.split_whitespace().next())
            .collect();
        assert_eq!(
            keys,
            vec!["assigned", "refreshed_at", "severity.critical", "severity.major"]
        );
        assert!(out.lines().any(|line| line.starts_with("refreshed_at") && line.trim_end().ends_with('-')));
    }

    #[test]
    fn arrays_render_one_row_per_element() {
        #[derive(Serialize)]
        struct Row {
            module_name: &'static str,
            test_case_count: u64,
        }
        let rows = vec![
            Row {
                module_name: "Finance",
                test_case_count: 1,
            },
            Row {
                module_name: "Human resources",
                test_case_count: 2,
            },
        ];
        let out = render_table(&rows, PLAIN).expect("table render should work");
        let header = out.lines().next().unwrap_or_default();
        assert!(header.find("module_name") < header.find("test_case_count"));
        assert_eq!(out.lines().count(), 4);
    }

    #[test]
    fn empty_array_has_placeholder() {
        let out = render_table(&Vec::<u8>::new(), PLAIN).expect("table render should work");
        assert_eq!(out, "(no rows)");
    }

    #[test]
    fn table_alignment_handles_mixed_widths() {
        let headers = ["scenario_id", "kind", "severity"];
        let rows = vec![
            vec!["scn-1".to_string(), "fail".to_string(), "critical".to_string()],
            vec![
                "scn-200".to_string(),
                "blocked".to_string(),
                "undecided".to_string(),
            ],
        ];

        let table = render_entity_table(&headers, &rows, PLAIN);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("scenario_id"));
        assert!(lines[1].chars().all(|c| c == '-'));
    }
}
