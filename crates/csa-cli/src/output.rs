//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::{CliError, Result};
use crate::session::{Session, Stage};
use colored::*;
use csa_domain::{FieldMapping, FieldSpec, FieldValue};
use csa_extractor::ExtractionMetadata;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Shown in tables for fields the contract does not contain.
const ABSENT: &str = "(not found)";

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format an extracted mapping for review.
    pub fn format_mapping(&self, mapping: &FieldMapping) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(mapping)?),
            OutputFormat::Table => Ok(self.format_mapping_table(mapping)),
            OutputFormat::Quiet => Ok(mapping
                .iter()
                .filter_map(|(name, value)| value.as_text().map(|text| format!("{}\t{}", name, text)))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_mapping_table(&self, mapping: &FieldMapping) -> String {
        if mapping.is_empty() {
            return self.colorize("No fields extracted.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (name, value) in mapping.iter() {
            let shown = match value {
                FieldValue::Text(text) => text.clone(),
                FieldValue::Absent => ABSENT.to_string(),
            };
            builder.push_record([name.to_string(), shown]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format the field catalog.
    pub fn format_fields(&self, fields: &[FieldSpec]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json: Vec<serde_json::Value> = fields
                    .iter()
                    .map(|f| serde_json::json!({ "name": f.name, "description": f.description }))
                    .collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Description"]);
                for field in fields {
                    builder.push_record([field.name, field.description]);
                }
                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
            OutputFormat::Quiet => Ok(fields
                .iter()
                .map(|f| f.name)
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format template placeholder keys, each flagged as in the catalog or not.
    pub fn format_placeholders(&self, keys: &[String]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json: Vec<serde_json::Value> = keys
                    .iter()
                    .map(|k| serde_json::json!({ "key": k, "in_catalog": FieldSpec::is_known(k) }))
                    .collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Table => {
                if keys.is_empty() {
                    return Ok(self.colorize("No placeholders found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Placeholder", "In catalog"]);
                for key in keys {
                    let known = if FieldSpec::is_known(key) { "yes" } else { "no" };
                    builder.push_record([format!("{{{{{}}}}}", key), known.to_string()]);
                }
                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
            OutputFormat::Quiet => Ok(keys.join("\n")),
        }
    }

    /// Summarize the session for the `status` command.
    pub fn format_status(&self, session: &Session) -> String {
        let mut lines = vec![format!("Stage:    {}", session.stage())];
        if let Some(document) = session.document() {
            lines.push(format!(
                "Contract: {} ({} bytes)",
                document.name(),
                document.size()
            ));
        }
        if let Some(mapping) = session.mapping() {
            lines.push(format!(
                "Fields:   {} extracted, {} found in contract",
                mapping.len(),
                mapping.present_count()
            ));
        }
        let next = match session.stage() {
            Stage::Empty => "upload <path>",
            Stage::Uploaded => "extract",
            Stage::Extracted => "generate [path]",
        };
        lines.push(self.colorize(&format!("Next:     {}", next), "cyan"));
        lines.join("\n")
    }

    /// One-line extraction summary.
    pub fn extraction_summary(&self, metadata: &ExtractionMetadata, mapping: &FieldMapping) -> String {
        self.success(&format!(
            "Extracted {} field(s) from '{}' in {} ms ({} parse, {})",
            mapping.present_count(),
            metadata.source_name,
            metadata.processing_time_ms,
            metadata.strategy,
            metadata.model_name
        ))
    }

    /// Show a rejected model reply for inspection.
    pub fn raw_response(&self, raw: &str) -> String {
        format!(
            "{}\n{}",
            self.colorize("Raw model response:", "magenta"),
            raw
        )
    }

    /// The model's reply shown alongside the review; quiet output omits it.
    pub fn reply_echo(&self, raw: &str) -> Option<String> {
        match self.format {
            OutputFormat::Quiet => None,
            _ => Some(self.raw_response(raw)),
        }
    }

    /// Format a failed action, with the model's reply when it was rejected.
    pub fn error_report(&self, err: &CliError) -> String {
        let mut report = self.error(&err.to_string());
        if let Some(raw) = err.raw_response() {
            report.push('\n');
            report.push_str(&self.raw_response(raw));
        }
        report
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csa_domain::FIELD_CATALOG;

    fn test_mapping() -> FieldMapping {
        let mut mapping = FieldMapping::new();
        mapping.insert("Supplier Name", "Acme Corp");
        mapping.insert("Penalties", FieldValue::Absent);
        mapping
    }

    #[test]
    fn test_json_mapping_keeps_null() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_mapping(&test_mapping()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["Supplier Name"], "Acme Corp");
        assert!(value["Penalties"].is_null());
    }

    #[test]
    fn test_table_mapping() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_mapping(&test_mapping()).unwrap();
        assert!(output.contains("Acme Corp"));
        assert!(output.contains(ABSENT));
    }

    #[test]
    fn test_quiet_mapping_skips_absent() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_mapping(&test_mapping()).unwrap();
        assert_eq!(output, "Supplier Name\tAcme Corp");
    }

    #[test]
    fn test_empty_mapping() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_mapping(&FieldMapping::new()).unwrap();
        assert!(output.contains("No fields extracted"));
    }

    #[test]
    fn test_fields_quiet() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_fields(&FIELD_CATALOG).unwrap();
        assert_eq!(output.lines().count(), FIELD_CATALOG.len());
        assert!(output.starts_with("Supplier Name"));
    }

    #[test]
    fn test_placeholders_flag_catalog_membership() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let keys = vec!["Supplier Name".to_string(), "Approver".to_string()];
        let output = formatter.format_placeholders(&keys).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["in_catalog"], true);
        assert_eq!(value[1]["in_catalog"], false);
    }

    #[test]
    fn test_status_of_empty_session() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_status(&Session::new());
        assert!(output.contains("no contract"));
        assert!(output.contains("upload <path>"));
    }

    #[test]
    fn test_error_report_includes_raw_reply() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let failure = csa_extractor::parse_response("no fields here").unwrap_err();
        let err = CliError::from(csa_extractor::ExtractorError::from(failure));

        let report = formatter.error_report(&err);
        assert!(report.starts_with("✗ Extraction failed"));
        assert!(report.ends_with("Raw model response:\nno fields here"));
    }

    #[test]
    fn test_reply_echo_follows_format() {
        let reply = r#"{"Supplier Name": "Acme Corp"}"#;
        let table = Formatter::new(OutputFormat::Table, false);
        let shown = table.reply_echo(reply).unwrap();
        assert!(shown.starts_with("Raw model response:"));
        assert!(shown.ends_with(reply));

        let quiet = Formatter::new(OutputFormat::Quiet, false);
        assert!(quiet.reply_echo(reply).is_none());
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.error("test"), "✗ test");
    }
}
