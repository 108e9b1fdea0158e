//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use csa_extractor::ExtractorConfig;
use csa_llm::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use csa_llm::GeminiProvider;
use csa_template::{FillOptions, DEFAULT_OUTPUT_FILE_NAME};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default template location, relative to the working directory.
pub const DEFAULT_TEMPLATE_PATH: &str = "F1 Contract Summary Approval Form.docx";

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Model endpoint settings
    #[serde(default)]
    pub llm: LlmSettings,

    /// Template settings
    #[serde(default)]
    pub template: TemplateSettings,

    /// Extraction limits
    #[serde(default)]
    pub extraction: ExtractorConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Model endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmSettings {
    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model path, e.g. `models/gemini-1.5-flash`
    #[serde(default = "default_model")]
    pub model: String,

    /// API key (lowest precedence after `--api-key` and `CSA_API_KEY`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Template settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSettings {
    /// Template document
    #[serde(default = "default_template_path")]
    pub path: PathBuf,

    /// File name for the filled form
    #[serde(default = "default_output_file_name")]
    pub output_file_name: String,

    /// Text written for fields the contract does not contain
    #[serde(default)]
    pub null_text: String,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        Ok(csa_dir()?.join("config.toml"))
    }

    /// Load configuration from `path`, or the default location when `None`.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Check values that would only fail later, mid-action.
    pub fn validate(&self) -> Result<()> {
        self.extraction.validate().map_err(CliError::Config)?;
        if self.llm.timeout_secs == 0 {
            return Err(CliError::Config(
                "llm.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.template.output_file_name.trim().is_empty() {
            return Err(CliError::Config(
                "template.output_file_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Pick the API key: command line / environment first, then the file.
    pub fn resolve_api_key(&self, from_cli: Option<&str>) -> Result<String> {
        from_cli
            .or(self.llm.api_key.as_deref())
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                CliError::Config(
                    "No API key. Pass --api-key, set CSA_API_KEY, or add llm.api_key to the config file"
                        .to_string(),
                )
            })
    }

    /// Build the model provider.
    pub fn provider(&self, api_key: String) -> Result<GeminiProvider> {
        Ok(GeminiProvider::builder(api_key)
            .base_url(&self.llm.base_url)
            .model(&self.llm.model)
            .timeout(Duration::from_secs(self.llm.timeout_secs))
            .build()?)
    }

    /// Options for filling the template.
    pub fn fill_options(&self) -> FillOptions {
        FillOptions {
            null_text: self.template.null_text.clone(),
            output_file_name: self.template.output_file_name.clone(),
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            path: default_template_path(),
            output_file_name: default_output_file_name(),
            null_text: String::new(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

/// `~/.csa`, home of the config file and REPL history.
pub fn csa_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    Ok(home.join(".csa"))
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_template_path() -> PathBuf {
    PathBuf::from(DEFAULT_TEMPLATE_PATH)
}

fn default_output_file_name() -> String {
    DEFAULT_OUTPUT_FILE_NAME.to_string()
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
