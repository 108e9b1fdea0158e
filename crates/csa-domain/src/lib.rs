//! CSA Domain Layer
//!
//! Core vocabulary shared by every CSA crate: the catalog of contract fields
//! the extraction prompt asks for, the field mapping produced by an extraction,
//! and the trait boundary to the language-model provider.
//!
//! ## Key Concepts
//!
//! - **Field catalog**: the fixed, ordered list of contract fields
//! - **Field value**: extracted text, or an explicit absent marker
//! - **Field mapping**: field name → field value, one per session
//! - **Placeholder token**: `{{Field Name}}` inside a template
//!
//! ## Architecture
//!
//! This crate holds no I/O. Infrastructure (HTTP, archives, terminals) lives
//! in the other crates and depends on the types defined here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod field;
pub mod mapping;
pub mod traits;

// Re-exports for convenience
pub use field::{FieldSpec, FIELD_CATALOG};
pub use mapping::{placeholder_token, FieldMapping, FieldValue};
