//! Run command implementation: extract then generate.

use crate::cli::RunArgs;
use crate::commands::extract::{build_extractor, extract_and_review};
use crate::config::Config;
use crate::error::Result;
use crate::generator::Generator;
use crate::output::Formatter;
use crate::session::Session;

/// Execute the run command.
pub async fn execute_run(
    args: RunArgs,
    config: &Config,
    api_key: Option<&str>,
    formatter: &Formatter,
) -> Result<()> {
    let mut session = Session::new();
    session.upload_path(&args.contract)?;

    let extractor = build_extractor(config, api_key)?;
    let generator = Generator::from_config(config, args.template.as_deref());
    extract_and_review(&mut session, &extractor, &generator, formatter).await?;

    let form = session.generate(&generator, args.output.as_deref())?;
    eprintln!(
        "{}",
        formatter.success(&format!("Generated {}", form.path.display()))
    );
    Ok(())
}
