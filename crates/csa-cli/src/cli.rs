//! CLI command definitions and argument parsing.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// CSA - Generate a Contract Summary Approval form from a contract.
#[derive(Debug, Parser)]
#[command(name = "csa")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (default: ~/.csa/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// API key for the model endpoint
    #[arg(long, env = "CSA_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (values only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract fields from a contract and review them
    Extract(ExtractArgs),

    /// Fill the template from a saved field mapping
    Generate(GenerateArgs),

    /// Extract and generate in one step
    Run(RunArgs),

    /// List the fields requested from the model
    Fields,

    /// List the placeholders in the template
    Placeholders(PlaceholdersArgs),

    /// Enter interactive REPL mode
    Repl,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Contract document (.pdf or .docx)
    pub contract: PathBuf,

    /// Save the extracted mapping as JSON
    #[arg(short, long)]
    pub save: Option<PathBuf>,
}

/// Arguments for the generate command.
#[derive(Debug, Parser)]
pub struct GenerateArgs {
    /// Field mapping file (as written by `extract --save`)
    #[arg(long)]
    pub fields: PathBuf,

    /// Output file or directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Template document (overrides the configured one)
    #[arg(short, long)]
    pub template: Option<PathBuf>,
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Contract document (.pdf or .docx)
    pub contract: PathBuf,

    /// Output file or directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Template document (overrides the configured one)
    #[arg(short, long)]
    pub template: Option<PathBuf>,
}

/// Arguments for the placeholders command.
#[derive(Debug, Parser)]
pub struct PlaceholdersArgs {
    /// Template document (overrides the configured one)
    #[arg(short, long)]
    pub template: Option<PathBuf>,
}

impl Cli {
    /// Default log filter for the requested verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_repl() {
        let cli = Cli::parse_from(["csa"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_extract_command() {
        let cli = Cli::parse_from(["csa", "extract", "contract.pdf", "--save", "fields.json"]);
        match cli.command {
            Some(Command::Extract(args)) => {
                assert_eq!(args.contract, PathBuf::from("contract.pdf"));
                assert_eq!(args.save, Some(PathBuf::from("fields.json")));
            }
            _ => panic!("Expected Extract command"),
        }
    }

    #[test]
    fn test_generate_command() {
        let cli = Cli::parse_from([
            "csa",
            "generate",
            "--fields",
            "fields.json",
            "-o",
            "out.docx",
            "--template",
            "form.docx",
        ]);
        match cli.command {
            Some(Command::Generate(args)) => {
                assert_eq!(args.fields, PathBuf::from("fields.json"));
                assert_eq!(args.output, Some(PathBuf::from("out.docx")));
                assert_eq!(args.template, Some(PathBuf::from("form.docx")));
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(Cli::parse_from(["csa", "fields"]).log_level(), "warn");
        assert_eq!(Cli::parse_from(["csa", "-v", "fields"]).log_level(), "info");
        assert_eq!(Cli::parse_from(["csa", "fields", "-vv"]).log_level(), "debug");
    }

    #[test]
    fn test_format_conversion() {
        let cli = Cli::parse_from(["csa", "--format", "json", "fields"]);
        let format: crate::config::OutputFormat = cli.format.unwrap().into();
        assert_eq!(format, crate::config::OutputFormat::Json);
    }
}
