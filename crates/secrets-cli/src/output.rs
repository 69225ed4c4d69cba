//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;
use serde_json::Value;

use secrets_manager::{BundleMetadata, Config};

use crate::cli::Format;
use crate::error::CliError;

/// Placeholder printed instead of a secret value.
pub const MASK: &str = "********";

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Get the current format.
    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Check if JSON format is selected.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self.format, Format::Json)
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }

    /// Write a serializable value to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_string<T>(&self, value: &T) -> Result<String, CliError>
    where
        T: Serialize + TableDisplay,
    {
        let mut buf = Vec::new();
        self.write(&mut buf, value)?;
        String::from_utf8(buf).map_err(|e| CliError::Format(format!("UTF-8 error: {e}")))
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

/// Result of checking a secrets file.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigList {
    /// The file that was checked.
    pub source: String,
    /// Whether region names were checked against the store grammar.
    pub strict: bool,
    /// Every secret declared in the file.
    pub secrets: Vec<Config>,
}

impl TableDisplay for ConfigList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(
            writer,
            "{:<24}  {:<40}  {:<16}",
            "ID", "PATH", "REGION"
        )?;
        writeln!(writer, "{}", "─".repeat(84))?;

        for secret in &self.secrets {
            writeln!(
                writer,
                "{:<24}  {:<40}  {:<16}",
                truncate(&secret.id, 24),
                truncate(&secret.path, 40),
                secret.region
            )?;
        }

        writeln!(writer)?;
        let mode = if self.strict { "strict" } else { "lenient" };
        writeln!(
            writer,
            "{}: {} secret(s) OK ({mode})",
            self.source,
            self.secrets.len()
        )?;
        Ok(())
    }
}

/// A resolved secret with its values rendered for display.
#[derive(Debug, Clone, Serialize)]
pub struct SecretView {
    /// Non-secret description of the instance.
    pub config: BTreeMap<String, Value>,
    /// When and how often the secret was resolved.
    pub metadata: BundleMetadata,
    /// Key to rendered value; masked unless revealed.
    pub values: BTreeMap<String, String>,
}

impl TableDisplay for SecretView {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let id = self.config.get("id").and_then(Value::as_str).unwrap_or_default();
        writeln!(writer, "Secret: {id}")?;
        writeln!(writer, "══════════════════════════════════")?;
        for (name, value) in &self.config {
            if name == "id" {
                continue;
            }
            let value = value.as_str().map_or_else(|| value.to_string(), str::to_string);
            writeln!(writer, "{:<16}  {value}", format!("{}:", capitalize(name)))?;
        }
        writeln!(writer, "{:<16}  {}", "Resolved:", self.metadata.resolved_at)?;
        writeln!(writer)?;

        if self.values.is_empty() {
            writeln!(writer, "No keys in secret")?;
            return Ok(());
        }

        writeln!(writer, "{:<24}  VALUE", "KEY")?;
        writeln!(writer, "{}", "─".repeat(48))?;
        for (key, value) in &self.values {
            writeln!(writer, "{:<24}  {value}", truncate(key, 24))?;
        }
        writeln!(writer)?;
        writeln!(writer, "Total: {} key(s)", self.values.len())?;
        Ok(())
    }
}

/// A single value of a resolved secret.
#[derive(Debug, Clone, Serialize)]
pub struct SecretValue {
    /// The secret id.
    pub id: String,
    /// The looked-up key.
    pub key: String,
    /// The rendered value; masked unless revealed.
    pub value: String,
}

impl TableDisplay for SecretValue {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "{}", self.value)?;
        Ok(())
    }
}

/// Renders a secret value, or [`MASK`] unless `reveal` is set.
///
/// Strings are printed without quotes; other values as compact JSON.
#[must_use]
pub fn render_value(value: &Value, reveal: bool) -> String {
    if !reveal {
        return MASK.to_string();
    }
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max_len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrets_manager::{FetchContext, MemoryStore, Plugin};

    fn config_list() -> ConfigList {
        ConfigList {
            source: "Secretsfile".into(),
            strict: false,
            secrets: vec![
                Config::new("db", "apps/db", "us-east-1"),
                Config::new("api", "apps/api", "eu-west-2"),
            ],
        }
    }

    fn secret_view(reveal: bool) -> SecretView {
        let store = MemoryStore::new();
        store.put("apps/db", r#"{"password":"p1","port":5432}"#);
        let mut plugin = Plugin::with_config(Config::new("db", "apps/db", "us-east-1"));
        plugin.provision(&store).expect("should provision");
        let bundle = plugin
            .get_secret(&FetchContext::background())
            .expect("should resolve")
            .clone();
        SecretView {
            config: plugin.display_config(),
            metadata: *bundle.metadata(),
            values: bundle
                .entries()
                .iter()
                .map(|(k, v)| (k.clone(), render_value(v, reveal)))
                .collect(),
        }
    }

    #[test]
    fn output_format_default_is_table() {
        let fmt = OutputFormat::default();
        assert_eq!(fmt.format(), Format::Table);
        assert!(!fmt.is_json());
    }

    #[test]
    fn output_format_json() {
        let fmt = OutputFormat::new(Format::Json);
        assert_eq!(fmt.format(), Format::Json);
        assert!(fmt.is_json());
    }

    #[test]
    fn config_list_table_output() {
        let output = OutputFormat::new(Format::Table)
            .to_string(&config_list())
            .expect("should format");
        assert!(output.contains("ID"));
        assert!(output.contains("apps/db"));
        assert!(output.contains("eu-west-2"));
        assert!(output.contains("Secretsfile: 2 secret(s) OK (lenient)"));
    }

    #[test]
    fn config_list_json_output() {
        let output = OutputFormat::new(Format::Json)
            .to_string(&config_list())
            .expect("should format");
        let parsed: Value = serde_json::from_str(&output).expect("valid json");
        assert_eq!(parsed["secrets"][0]["id"], "db");
        assert_eq!(parsed["secrets"][1]["region"], "eu-west-2");
        assert_eq!(parsed["strict"], false);
    }

    #[test]
    fn secret_view_masks_values() {
        let output = OutputFormat::new(Format::Table)
            .to_string(&secret_view(false))
            .expect("should format");
        assert!(output.contains("Secret: db"));
        assert!(output.contains("Provider:"));
        assert!(output.contains("memory"));
        assert!(output.contains("password"));
        assert!(output.contains(MASK));
        assert!(!output.contains("p1"));
        assert!(output.contains("Total: 2 key(s)"));
    }

    #[test]
    fn secret_view_json_reveals_on_request() {
        let output = OutputFormat::new(Format::Json)
            .to_string(&secret_view(true))
            .expect("should format");
        let parsed: Value = serde_json::from_str(&output).expect("valid json");
        assert_eq!(parsed["values"]["password"], "p1");
        assert_eq!(parsed["values"]["port"], "5432");
        assert_eq!(parsed["config"]["provider"], "memory");
        assert_eq!(parsed["metadata"]["generation"], 1);
    }

    #[test]
    fn secret_value_table_prints_value_only() {
        let value = SecretValue {
            id: "db".into(),
            key: "password".into(),
            value: "p1".into(),
        };
        let output = OutputFormat::default().to_string(&value).expect("should format");
        assert_eq!(output, "p1\n");
    }

    #[test]
    fn render_value_variants() {
        assert_eq!(render_value(&Value::from("p1"), false), MASK);
        assert_eq!(render_value(&Value::from("p1"), true), "p1");
        assert_eq!(render_value(&Value::from(5432), true), "5432");
        assert_eq!(render_value(&serde_json::json!({"a": 1}), true), r#"{"a":1}"#);
    }

    #[test]
    fn truncate_short_string() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn truncate_long_string() {
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn truncate_very_short_max() {
        assert_eq!(truncate("hello", 3), "hel");
    }

    #[test]
    fn capitalize_field_names() {
        assert_eq!(capitalize("region"), "Region");
        assert_eq!(capitalize(""), "");
    }
}
