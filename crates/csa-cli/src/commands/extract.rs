//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::config::Config;
use crate::error::Result;
use crate::generator::Generator;
use crate::output::Formatter;
use crate::session::Session;
use csa_domain::traits::LlmProvider;
use csa_domain::FieldMapping;
use csa_extractor::Extractor;
use csa_llm::GeminiProvider;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Execute the extract command.
pub async fn execute_extract(
    args: ExtractArgs,
    config: &Config,
    api_key: Option<&str>,
    formatter: &Formatter,
) -> Result<()> {
    let mut session = Session::new();
    session.upload_path(&args.contract)?;

    let extractor = build_extractor(config, api_key)?;
    let generator = Generator::from_config(config, None);
    let mapping = extract_and_review(&mut session, &extractor, &generator, formatter).await?;

    if let Some(path) = args.save {
        save_mapping(mapping, &path)?;
        eprintln!("{}", formatter.success(&format!("Saved fields to {}", path.display())));
    }

    Ok(())
}

/// Build the extractor for the configured model endpoint.
///
/// The API key is only required here, so commands that never call the model
/// work without one.
pub fn build_extractor(config: &Config, api_key: Option<&str>) -> Result<Extractor<GeminiProvider>> {
    let api_key = config.resolve_api_key(api_key)?;
    let provider = config.provider(api_key)?;
    Ok(Extractor::new(provider, config.extraction.clone())?)
}

/// Extract the uploaded contract and print the review.
pub(crate) async fn extract_and_review<'s, L>(
    session: &'s mut Session,
    extractor: &Extractor<L>,
    generator: &Generator,
    formatter: &Formatter,
) -> Result<&'s FieldMapping>
where
    L: LlmProvider,
    L::Error: fmt::Display,
{
    let outcome = session.extract(extractor).await?;
    eprintln!(
        "{}",
        formatter.extraction_summary(&outcome.metadata, &outcome.mapping)
    );
    print_reply(&outcome.raw_response, formatter);
    print_review(&outcome.mapping, generator, formatter)?;
    Ok(&outcome.mapping)
}

/// Echo the model's reply to stderr, so stdout stays the mapping alone.
pub(crate) fn print_reply(raw: &str, formatter: &Formatter) {
    if let Some(echo) = formatter.reply_echo(raw) {
        eprintln!("{}", echo);
    }
}

/// Print the mapping and any template placeholders it leaves unfilled.
pub(crate) fn print_review(
    mapping: &FieldMapping,
    generator: &Generator,
    formatter: &Formatter,
) -> Result<()> {
    println!("{}", formatter.format_mapping(mapping)?);

    match generator.unfilled(mapping) {
        Ok(unfilled) if unfilled.is_empty() => {}
        Ok(unfilled) => eprintln!(
            "{}",
            formatter.warning(&format!(
                "Template placeholders left unfilled: {}",
                unfilled.join(", ")
            ))
        ),
        Err(e) => warn!(
            "Could not check placeholders in {}: {}",
            generator.template_path().display(),
            e
        ),
    }
    Ok(())
}

/// Write the mapping as JSON, nulls kept.
pub(crate) fn save_mapping(mapping: &FieldMapping, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(mapping)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use csa_domain::FieldValue;

    #[test]
    fn test_save_mapping_writes_json_with_nulls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fields.json");

        let mut mapping = FieldMapping::new();
        mapping.insert("Supplier Name", "Acme Corp");
        mapping.insert("Penalties", FieldValue::Absent);
        save_mapping(&mapping, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["Supplier Name"], "Acme Corp");
        assert!(value["Penalties"].is_null());
    }

    #[test]
    fn test_build_extractor_needs_api_key() {
        let result = build_extractor(&Config::default(), None);
        assert!(matches!(result, Err(crate::CliError::Config(_))));
    }

    #[test]
    fn test_build_extractor_with_key() {
        let extractor = build_extractor(&Config::default(), Some("test-key")).unwrap();
        assert_eq!(extractor.config().max_text_length, 200_000);
    }
}
