//! Placeholders command implementation.

use crate::cli::PlaceholdersArgs;
use crate::config::Config;
use crate::error::Result;
use crate::generator::Generator;
use crate::output::Formatter;

/// Execute the placeholders command.
pub fn execute_placeholders(
    args: PlaceholdersArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let generator = Generator::from_config(config, args.template.as_deref());
    let keys: Vec<String> = generator.template()?.placeholders()?.into_iter().collect();

    println!("{}", formatter.format_placeholders(&keys)?);
    Ok(())
}
