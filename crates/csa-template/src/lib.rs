//! CSA Template
//!
//! Fills a DOCX summary-form template with an extracted field mapping.
//!
//! Every body-level paragraph and every table cell is treated as one block of
//! merged text. Each `{{key}}` token in a block is replaced by the mapping's
//! value for `key`, longest key first. Tokens with no mapping entry stay in
//! the document verbatim.
//!
//! ```no_run
//! use csa_domain::FieldMapping;
//! use csa_template::{FillOptions, Template};
//!
//! # fn example() -> csa_template::Result<()> {
//! let template = Template::open("F1 Contract Summary Approval Form.docx")?;
//!
//! let mut mapping = FieldMapping::new();
//! mapping.insert("Supplier Name", "Acme Corp");
//!
//! let filled = template.fill(&mapping, &FillOptions::default())?;
//! filled.save(filled.file_name())?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod filler;
mod template;
mod xml;

pub use error::{Result, TemplateError};
pub use template::{
    FillOptions, FilledDocument, Template, DEFAULT_OUTPUT_FILE_NAME, DOCUMENT_PART,
    DOCX_MIME_TYPE,
};
