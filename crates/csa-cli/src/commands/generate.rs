//! Generate command implementation.

use crate::cli::GenerateArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::generator::Generator;
use crate::output::Formatter;
use csa_domain::FieldMapping;
use csa_extractor::parse_response;
use std::fs;
use std::path::Path;

/// Execute the generate command.
pub fn execute_generate(args: GenerateArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let mapping = load_mapping(&args.fields)?;
    let generator = Generator::from_config(config, args.template.as_deref());

    let form = generator.generate(&mapping, args.output.as_deref())?;
    println!(
        "{}",
        formatter.success(&format!(
            "Generated {} ({} block(s) filled)",
            form.path.display(),
            form.replaced_blocks
        ))
    );
    Ok(())
}

/// Read a saved mapping. The file goes through the same parser as a model
/// reply, so hand-edited files may use the permissive dialect.
pub(crate) fn load_mapping(path: &Path) -> Result<FieldMapping> {
    let contents = fs::read_to_string(path).map_err(|e| {
        CliError::InvalidInput(format!("Cannot read mapping file {}: {}", path.display(), e))
    })?;
    let parsed = parse_response(&contents).map_err(|failure| {
        CliError::InvalidInput(format!("{}: {}", path.display(), failure))
    })?;
    Ok(parsed.mapping)
}
