//! Template filling for the generate step.

use crate::config::Config;
use crate::error::Result;
use csa_domain::FieldMapping;
use csa_template::{FillOptions, Template};
use std::path::{Path, PathBuf};
use tracing::info;

/// Fills the configured template and writes the result.
#[derive(Debug, Clone)]
pub struct Generator {
    template_path: PathBuf,
    options: FillOptions,
}

/// Where a generate step wrote the form, and what it left unfilled.
#[derive(Debug, Clone)]
pub struct GeneratedForm {
    /// Written file
    pub path: PathBuf,
    /// Paragraphs and cells whose text changed
    pub replaced_blocks: usize,
    /// MIME type of the written file
    pub mime_type: &'static str,
}

impl Generator {
    /// Create a generator for one template.
    pub fn new(template_path: impl Into<PathBuf>, options: FillOptions) -> Self {
        Self {
            template_path: template_path.into(),
            options,
        }
    }

    /// Generator for the configured template, unless overridden.
    pub fn from_config(config: &Config, template_override: Option<&Path>) -> Self {
        let path = template_override
            .map(Path::to_path_buf)
            .unwrap_or_else(|| config.template.path.clone());
        Self::new(path, config.fill_options())
    }

    /// Template location.
    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    /// Load the template. Read fresh on every call so edits are picked up.
    pub fn template(&self) -> Result<Template> {
        Ok(Template::open(&self.template_path)?)
    }

    /// Fill the template and write it to `output`.
    ///
    /// Without `output` the form is written under its configured file name in
    /// the working directory; a directory `output` receives the form under
    /// that name.
    pub fn generate(&self, mapping: &FieldMapping, output: Option<&Path>) -> Result<GeneratedForm> {
        let filled = self.template()?.fill(mapping, &self.options)?;
        let target = match output {
            Some(path) => path,
            None => Path::new(filled.file_name()),
        };
        let path = filled.save(target)?;
        info!("Generated form at {}", path.display());

        Ok(GeneratedForm {
            path,
            replaced_blocks: filled.replaced_blocks(),
            mime_type: filled.mime_type(),
        })
    }

    /// Placeholder keys in the template that the mapping does not cover.
    pub fn unfilled(&self, mapping: &FieldMapping) -> Result<Vec<String>> {
        Ok(self.template()?.unfilled_placeholders(mapping)?)
    }
}
