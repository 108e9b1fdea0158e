//! CSA CLI - Generate a Contract Summary Approval form from a contract.

use clap::Parser;
use csa_cli::commands;
use csa_cli::repl;
use csa_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_level());

    // Load config; the formatter needs its settings, so fall back to defaults
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    if let Err(e) = run(cli, &config, &formatter).await {
        eprintln!("Error: {}", e);
        if let Some(raw) = e.raw_response() {
            eprintln!("{}", formatter.raw_response(raw));
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &Config, formatter: &Formatter) -> csa_cli::Result<()> {
    let api_key = cli.api_key.as_deref();

    match cli.command {
        None | Some(Command::Repl) => {
            repl::run_repl(config, api_key, formatter).await?;
        }
        Some(Command::Extract(args)) => {
            commands::execute_extract(args, config, api_key, formatter).await?;
        }
        Some(Command::Generate(args)) => {
            commands::execute_generate(args, config, formatter)?;
        }
        Some(Command::Run(args)) => {
            commands::execute_run(args, config, api_key, formatter).await?;
        }
        Some(Command::Fields) => {
            commands::execute_fields(formatter)?;
        }
        Some(Command::Placeholders(args)) => {
            commands::execute_placeholders(args, config, formatter)?;
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
