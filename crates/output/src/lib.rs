use std::collections::BTreeSet;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
    Csv,
    Quiet,
}

/// Keys tried, in order, when printing one identifier per row.
const QUIET_KEYS: [&str; 2] = ["id", "email"];

pub struct OutputRenderer {
    format: OutputFormat,
}

impl OutputRenderer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn render<T: Serialize>(&self, value: &T) -> Result<()> {
        let rendered = self.render_to_string(value)?;
        if !rendered.is_empty() {
            println!("{}", rendered);
        }
        Ok(())
    }

    /// Formats `value` the way [`OutputRenderer::render`] would print it.
    /// Arrays of objects become tables or CSV; anything else falls back to
    /// pretty JSON.
    pub fn render_to_string<T: Serialize>(&self, value: &T) -> Result<String> {
        let json_value = serde_json::to_value(value)?;

        let rendered = match self.format {
            OutputFormat::Table => match Self::table(&json_value) {
                Some(table) => table,
                None => serde_json::to_string_pretty(&json_value)?,
            },
            OutputFormat::Json => serde_json::to_string_pretty(&json_value)?,
            OutputFormat::Yaml => serde_yaml::to_string(&json_value)?
                .trim_end()
                .to_string(),
            OutputFormat::Csv => match Self::csv(&json_value) {
                Some(csv) => csv,
                None => serde_json::to_string_pretty(&json_value)?,
            },
            OutputFormat::Quiet => Self::quiet(&json_value).join("\n"),
        };

        Ok(rendered)
    }

    fn table(value: &Value) -> Option<String> {
        let (headers, rows) = Self::coerce_rows(value)?;

        let mut builder = Builder::default();
        builder.push_record(headers);
        for row in rows {
            builder.push_record(row);
        }

        Some(builder.build().with(Style::rounded()).to_string())
    }

    fn csv(value: &Value) -> Option<String> {
        let (headers, rows) = Self::coerce_rows(value)?;

        let mut lines = Vec::with_capacity(rows.len() + 1);
        lines.push(
            headers
                .iter()
                .map(|h| Self::csv_field(h))
                .collect::<Vec<_>>()
                .join(","),
        );
        for row in rows {
            lines.push(
                row.iter()
                    .map(|cell| Self::csv_field(cell))
                    .collect::<Vec<_>>()
                    .join(","),
            );
        }

        Some(lines.join("\n"))
    }

    fn csv_field(field: &str) -> String {
        if field.contains([',', '"', '\n']) {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn quiet(value: &Value) -> Vec<String> {
        let ident = |obj: &serde_json::Map<String, Value>| {
            QUIET_KEYS
                .iter()
                .find_map(|key| obj.get(*key).map(Self::value_to_string))
        };

        match value {
            Value::Array(rows) => rows
                .iter()
                .filter_map(|row| match row {
                    Value::Object(obj) => ident(obj),
                    Value::Null => None,
                    other => Some(Self::value_to_string(other)),
                })
                .collect(),
            Value::Object(obj) => ident(obj).into_iter().collect(),
            Value::Null => Vec::new(),
            other => vec![Self::value_to_string(other)],
        }
    }

    fn coerce_rows(value: &Value) -> Option<(Vec<String>, Vec<Vec<String>>)> {
        let rows = match value {
            Value::Array(rows) if !rows.is_empty() => rows,
            _ => return None,
        };

        let mut headers = BTreeSet::new();
        for row in rows {
            if let Value::Object(obj) = row {
                headers.extend(obj.keys().cloned());
            }
        }

        if headers.is_empty() {
            return None;
        }

        let headers_vec: Vec<String> = headers.into_iter().collect();
        let data: Vec<Vec<String>> = rows
            .iter()
            .filter_map(|row| match row {
                Value::Object(obj) => Some(
                    headers_vec
                        .iter()
                        .map(|header| obj.get(header).map(Self::value_to_string).unwrap_or_default())
                        .collect(),
                ),
                _ => None,
            })
            .collect();

        Some((headers_vec, data))
    }

    fn value_to_string(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => String::new(),
            other => serde_json::to_string(other).unwrap_or_default(),
        }
    }
}
