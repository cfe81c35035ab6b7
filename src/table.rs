//! Vertical key/value rendering for a single JSON object.
//!
//! Field specs:
//! - `name` renders as `NAME:  value`
//! - `$name$` renders the value as an emphasized `== value` header line
//! - `name => LABEL` renders as `LABEL:  value`
//!
//! Fields that are missing or `null` produce no line.

use owo_colors::OwoColorize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Default)]
pub struct TableStyle {
    pub color: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldSpec<'a> {
    key: &'a str,
    label: String,
    emphasized: bool,
}

fn parse_field(spec: &str) -> FieldSpec<'_> {
    let spec = spec.trim();
    if let Some(inner) = spec
        .strip_prefix('$')
        .and_then(|rest| rest.strip_suffix('$'))
    {
        return FieldSpec {
            key: inner,
            label: default_label(inner),
            emphasized: true,
        };
    }
    if let Some((key, label)) = spec.split_once("=>") {
        return FieldSpec {
            key: key.trim(),
            label: label.trim().to_string(),
            emphasized: false,
        };
    }
    FieldSpec {
        key: spec,
        label: default_label(spec),
        emphasized: false,
    }
}

fn default_label(key: &str) -> String {
    key.replace('_', " ").to_uppercase()
}

fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        other => Some(other.to_string()),
    }
}

enum Line {
    Header(String),
    Row(String, String),
}

/// Renders `fields` of `record` top to bottom, in the order given.
pub fn vertical(record: &Map<String, Value>, fields: &[&str], style: TableStyle) -> String {
    let mut lines = Vec::new();
    for spec in fields.iter().map(|spec| parse_field(spec)) {
        let Some(value) = record.get(spec.key).and_then(display_value) else {
            continue;
        };
        if spec.emphasized {
            lines.push(Line::Header(value));
        } else {
            lines.push(Line::Row(format!("{}:", spec.label), value));
        }
    }

    let width = lines
        .iter()
        .filter_map(|line| match line {
            Line::Row(label, _) => Some(label.chars().count()),
            Line::Header(_) => None,
        })
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for line in lines {
        match line {
            Line::Header(value) => {
                let header = format!("== {}", value);
                if style.color {
                    out.push_str(&header.bold().to_string());
                } else {
                    out.push_str(&header);
                }
            }
            Line::Row(label, value) => {
                let row = format!("{:<width$} {}", label, value, width = width);
                out.push_str(row.trim_end());
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn parses_field_specs() {
        assert_eq!(
            parse_field("$device_name$"),
            FieldSpec {
                key: "device_name",
                label: "DEVICE NAME".to_string(),
                emphasized: true,
            }
        );
        assert_eq!(
            parse_field("application_name => FLEET"),
            FieldSpec {
                key: "application_name",
                label: "FLEET".to_string(),
                emphasized: false,
            }
        );
        assert_eq!(parse_field("ip_address").label, "IP ADDRESS");
    }

    #[test]
    fn renders_aligned_rows_with_header() {
        let record = object(json!({
            "device_name": "gateway-01",
            "id": 42,
            "is_online": true,
            "device_type": "raspberrypi4-64",
        }));
        let rendered = vertical(
            &record,
            &["$device_name$", "id", "device_type", "is_online"],
            TableStyle::default(),
        );
        assert_eq!(
            rendered,
            "== gateway-01\n\
             ID:          42\n\
             DEVICE TYPE: raspberrypi4-64\n\
             IS ONLINE:   true\n"
        );
    }

    #[test]
    fn omits_missing_and_null_fields() {
        let record = object(json!({ "id": 1, "note": null }));
        let rendered = vertical(&record, &["id", "note", "last_seen"], TableStyle::default());
        assert_eq!(rendered, "ID: 1\n");
    }

    #[test]
    fn renamed_field_uses_custom_label() {
        let record = object(json!({ "application_name": "greenhouse" }));
        let rendered = vertical(
            &record,
            &["application_name => FLEET"],
            TableStyle::default(),
        );
        assert_eq!(rendered, "FLEET: greenhouse\n");
    }

    #[test]
    fn empty_string_value_keeps_the_row() {
        let record = object(json!({ "note": "" }));
        let rendered = vertical(&record, &["note"], TableStyle::default());
        assert_eq!(rendered, "NOTE:\n");
    }

    #[test]
    fn color_only_touches_the_header() {
        let record = object(json!({ "device_name": "gateway-01", "id": 7 }));
        let rendered = vertical(&record, &["$device_name$", "id"], TableStyle { color: true });
        assert!(rendered.contains("\u{1b}[1m== gateway-01"));
        assert!(rendered.ends_with("ID: 7\n"));
    }
}
