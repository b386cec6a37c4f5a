// Output formatting for CLI

use std::io::Write;

use anyhow::Result;

use crate::cli::config::OutputFormat;

/// Format and output reports
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Output one report
    pub fn output(&self, value: &serde_json::Value, writer: &mut impl Write) -> Result<()> {
        match self.format {
            OutputFormat::Pretty => {
                writeln!(writer, "{}", serde_json::to_string_pretty(value)?)?;
            }
            OutputFormat::Json => {
                writeln!(writer, "{}", serde_json::to_string(value)?)?;
            }
            OutputFormat::KeyValue => {
                self.output_key_value("", value, writer)?;
            }
        }
        Ok(())
    }

    /// Output as flattened key-value pairs
    fn output_key_value(&self, prefix: &str, value: &serde_json::Value, writer: &mut impl Write) -> Result<()> {
        match value {
            serde_json::Value::Object(obj) => {
                for (key, value) in obj {
                    let key = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", prefix, key)
                    };
                    self.output_key_value(&key, value, writer)?;
                }
            }
            serde_json::Value::Array(arr) => {
                for (index, value) in arr.iter().enumerate() {
                    self.output_key_value(&format!("{}[{}]", prefix, index), value, writer)?;
                }
            }
            other => {
                writeln!(writer, "{}: {}", prefix, format_value(other))?;
            }
        }
        Ok(())
    }
}

/// Format a scalar JSON value for display
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "(none)".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_value() {
        let formatter = OutputFormatter::new(OutputFormat::KeyValue);
        let value = json!({"file": "a.mp3", "ape": {"offset": 10, "len": 64}, "id3v1": null});
        let mut out = Vec::new();
        formatter.output(&value, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("file: a.mp3\n"));
        assert!(text.contains("ape.offset: 10\n"));
        assert!(text.contains("ape.len: 64\n"));
        assert!(text.contains("id3v1: (none)\n"));
    }

    #[test]
    fn test_compact_json() {
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let mut out = Vec::new();
        formatter.output(&json!({"index": 8}), &mut out).unwrap();
        assert_eq!(out, b"{\"index\":8}\n");
    }
}
