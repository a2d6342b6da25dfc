use anyhow::{Context, Result};
use clap::ValueEnum;
use kubesql_parser::Query;
use serde::Deserialize;

/// Encoding used to print parsed queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented JSON.
    #[default]
    Json,
    /// YAML document.
    Yaml,
}

/// Render `query` in `format`, newline terminated.
pub fn render(query: &Query, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(query).context("encode JSON")?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Yaml => serde_yaml::to_string(query).context("encode YAML"),
    }
}
