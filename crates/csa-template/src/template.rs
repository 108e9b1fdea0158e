//! Template loading, filling and archive rewrite

use crate::error::{Result, TemplateError};
use crate::filler::{self, Substitutions};
use crate::xml;
use csa_domain::FieldMapping;
use std::collections::BTreeSet;
use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

/// Archive entry holding the main document body
pub const DOCUMENT_PART: &str = "word/document.xml";

/// MIME type of a `.docx` download
pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// File name offered for the filled document
pub const DEFAULT_OUTPUT_FILE_NAME: &str = "CSA_Filled.docx";

/// Options controlling how values are written into the template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillOptions {
    /// Text written for fields whose value is absent
    pub null_text: String,

    /// Name given to the filled document
    pub output_file_name: String,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            null_text: String::new(),
            output_file_name: DEFAULT_OUTPUT_FILE_NAME.to_string(),
        }
    }
}

/// A DOCX template with `{{key}}` placeholders
///
/// The template bytes are never modified; every fill produces a fresh
/// [`FilledDocument`].
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    bytes: Vec<u8>,
}

impl Template {
    /// Load a template from disk
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        debug!("Loaded template '{}' ({} bytes)", name, bytes.len());
        Ok(Self { name, bytes })
    }

    /// Wrap template bytes already in memory
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Template file name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Distinct placeholder keys in the document body
    pub fn placeholders(&self) -> Result<BTreeSet<String>> {
        let mut roots = xml::parse(&self.document_xml()?)?;
        Ok(filler::scan_placeholders(&mut roots))
    }

    /// Placeholder keys the mapping has no entry for
    pub fn unfilled_placeholders(&self, mapping: &FieldMapping) -> Result<Vec<String>> {
        Ok(self
            .placeholders()?
            .into_iter()
            .filter(|key| !mapping.contains(key))
            .collect())
    }

    /// Produce a filled copy of the template
    pub fn fill(&self, mapping: &FieldMapping, options: &FillOptions) -> Result<FilledDocument> {
        let substitutions = Substitutions::new(mapping, &options.null_text);

        let mut roots = xml::parse(&self.document_xml()?)?;
        let replaced_blocks = filler::fill_blocks(&mut roots, &substitutions);
        let document_xml = xml::write(&roots)?;

        let bytes = self.rebuild(&document_xml)?;
        info!(
            "Filled template '{}': {} of {} mapped fields, {} blocks rewritten",
            self.name,
            mapping.present_count(),
            mapping.len(),
            replaced_blocks
        );

        Ok(FilledDocument {
            file_name: options.output_file_name.clone(),
            bytes,
            replaced_blocks,
        })
    }

    fn archive(&self) -> Result<ZipArchive<Cursor<&[u8]>>> {
        Ok(ZipArchive::new(Cursor::new(self.bytes.as_slice()))?)
    }

    fn document_xml(&self) -> Result<String> {
        let mut archive = self.archive()?;
        let mut part = archive.by_name(DOCUMENT_PART).map_err(|e| match e {
            zip::result::ZipError::FileNotFound => TemplateError::MissingPart(DOCUMENT_PART),
            other => TemplateError::Archive(other),
        })?;
        let mut xml = String::new();
        part.read_to_string(&mut xml)?;
        Ok(xml)
    }

    /// Copy every entry byte-for-byte except the document part
    fn rebuild(&self, document_xml: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive()?;
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        for index in 0..archive.len() {
            let entry = archive.by_index_raw(index)?;
            if entry.name() == DOCUMENT_PART {
                drop(entry);
                writer.start_file(DOCUMENT_PART, options)?;
                writer.write_all(document_xml.as_bytes())?;
            } else {
                writer.raw_copy_file(entry)?;
            }
        }

        Ok(writer.finish()?.into_inner())
    }
}

/// A filled copy of a template, ready to save or offer for download
#[derive(Debug, Clone)]
pub struct FilledDocument {
    file_name: String,
    bytes: Vec<u8>,
    replaced_blocks: usize,
}

impl FilledDocument {
    /// Suggested file name
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// DOCX bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// MIME type for download
    pub fn mime_type(&self) -> &'static str {
        DOCX_MIME_TYPE
    }

    /// Paragraphs and cells whose text changed
    pub fn replaced_blocks(&self) -> usize {
        self.replaced_blocks
    }

    /// Write to `path`, or to the suggested name inside `path` if it is a
    /// directory
    pub fn save(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        let target = if path.is_dir() {
            path.join(&self.file_name)
        } else {
            path.to_path_buf()
        };
        fs::write(&target, &self.bytes).map_err(|source| TemplateError::Write {
            path: target.clone(),
            source,
        })?;
        info!("Wrote {} ({} bytes)", target.display(), self.bytes.len());
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csa_domain::FieldValue;

    fn docx(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn body(content: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="urn:w"><w:body>{}</w:body></w:document>"#,
            content
        )
    }

    fn read_entry(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut entry = archive.by_name(name).unwrap();
        let mut out = String::new();
        entry.read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn test_fill_replaces_document_part_only() {
        let xml = body(r#"<w:p><w:r><w:t>{{a}}</w:t></w:r></w:p>"#);
        let template = Template::from_bytes(
            "t.docx",
            docx(&[("[Content_Types].xml", "<Types/>"), (DOCUMENT_PART, &xml)]),
        );

        let mut mapping = FieldMapping::new();
        mapping.insert("a", "filled");
        let filled = template.fill(&mapping, &FillOptions::default()).unwrap();

        assert_eq!(read_entry(filled.bytes(), "[Content_Types].xml"), "<Types/>");
        assert!(read_entry(filled.bytes(), DOCUMENT_PART).contains("filled"));
        assert_eq!(filled.replaced_blocks(), 1);
        assert_eq!(filled.file_name(), DEFAULT_OUTPUT_FILE_NAME);
        assert_eq!(filled.mime_type(), DOCX_MIME_TYPE);
    }

    #[test]
    fn test_missing_document_part() {
        let template = Template::from_bytes("t.docx", docx(&[("other.xml", "<x/>")]));
        let err = template.fill(&FieldMapping::new(), &FillOptions::default());
        assert!(matches!(err, Err(TemplateError::MissingPart(DOCUMENT_PART))));
    }

    #[test]
    fn test_not_an_archive() {
        let template = Template::from_bytes("t.docx", b"not a zip".to_vec());
        assert!(matches!(
            template.placeholders(),
            Err(TemplateError::Archive(_))
        ));
    }

    #[test]
    fn test_malformed_xml() {
        let template = Template::from_bytes(
            "t.docx",
            docx(&[(DOCUMENT_PART, "<w:document><w:body>")]),
        );
        assert!(matches!(
            template.fill(&FieldMapping::new(), &FillOptions::default()),
            Err(TemplateError::Xml(_))
        ));
    }

    #[test]
    fn test_unfilled_placeholders() {
        let xml = body(r#"<w:p><w:r><w:t>{{a}} {{b}}</w:t></w:r></w:p>"#);
        let template = Template::from_bytes("t.docx", docx(&[(DOCUMENT_PART, &xml)]));

        let mut mapping = FieldMapping::new();
        mapping.insert("a", FieldValue::Absent);
        assert_eq!(template.unfilled_placeholders(&mapping).unwrap(), vec!["b"]);
    }

    #[test]
    fn test_open_missing_file() {
        let err = Template::open("/definitely/not/here.docx").unwrap_err();
        assert!(matches!(err, TemplateError::Read { .. }));
        assert!(err.to_string().contains("here.docx"));
    }
}
