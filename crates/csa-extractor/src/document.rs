//! Contract upload handling and plain-text extraction
//!
//! The file type is decided by extension only. DOCX files are zip archives
//! whose visible text lives in `word/document.xml`; PDFs go through
//! `pdf-extract`.

use crate::error::DocumentError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::{debug, warn};

/// Archive entry holding the main DOCX body
pub const DOCX_BODY_PART: &str = "word/document.xml";

/// Supported upload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Portable Document Format
    Pdf,
    /// Office Open XML word-processing document
    Docx,
}

impl DocumentKind {
    /// Detect the kind from a file name's extension (case-insensitive)
    pub fn from_file_name(name: &str) -> Result<Self, DocumentError> {
        let extension = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "docx" => Ok(DocumentKind::Docx),
            _ => Err(DocumentError::UnsupportedType(name.to_string())),
        }
    }

    /// Canonical lowercase extension
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
        }
    }
}

/// An uploaded contract: its name, detected kind, and raw bytes
#[derive(Debug, Clone)]
pub struct ContractDocument {
    name: String,
    kind: DocumentKind,
    bytes: Vec<u8>,
}

impl ContractDocument {
    /// Read an upload from disk
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        // Reject by extension before touching the file
        DocumentKind::from_file_name(&name)?;
        let bytes = std::fs::read(path)?;
        Self::from_bytes(name, bytes)
    }

    /// Wrap bytes received under a given file name
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, DocumentError> {
        let name = name.into();
        let kind = DocumentKind::from_file_name(&name)?;
        Ok(Self { name, kind, bytes })
    }

    /// File name as uploaded
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Detected kind
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Size of the upload in bytes
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Extract the visible text as newline-separated lines
    pub fn extract_text(&self) -> Result<String, DocumentError> {
        let text = match self.kind {
            DocumentKind::Docx => docx_text(Cursor::new(&self.bytes))?,
            DocumentKind::Pdf => pdf_text(&self.bytes)?,
        };

        debug!(
            name = %self.name,
            kind = self.kind.extension(),
            chars = text.len(),
            "Extracted contract text"
        );
        if text.trim().is_empty() {
            warn!(name = %self.name, "Contract text is empty");
        }
        Ok(text)
    }
}

fn pdf_text(bytes: &[u8]) -> Result<String, DocumentError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| DocumentError::Pdf(e.to_string()))
}

fn docx_text<R: Read + Seek>(reader: R) -> Result<String, DocumentError> {
    let mut archive = zip::ZipArchive::new(reader)?;
    let mut body = archive
        .by_name(DOCX_BODY_PART)
        .map_err(|e| DocumentError::Docx(format!("Cannot find {}: {}", DOCX_BODY_PART, e)))?;

    let mut xml = String::new();
    body.read_to_string(&mut xml)?;
    paragraphs_text(&xml)
}

/// Join every paragraph's text, in document order, with newlines
///
/// Paragraphs inside tables are included; empty paragraphs yield empty lines.
pub(crate) fn paragraphs_text(xml: &str) -> Result<String, DocumentError> {
    let mut reader = Reader::from_str(xml);
    let mut lines = Vec::new();
    // Paragraphs can nest (text boxes), so track one buffer per open paragraph
    let mut open: Vec<String> = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => open.push(String::new()),
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if let Some(current) = open.last_mut() {
                    match e.name().as_ref() {
                        b"w:tab" => current.push('\t'),
                        b"w:br" | b"w:cr" => current.push('\n'),
                        _ => {}
                    }
                }
                if e.name().as_ref() == b"w:p" {
                    lines.push(String::new());
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    if let Some(paragraph) = open.pop() {
                        lines.push(paragraph);
                    }
                }
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text {
                    let text = e
                        .unescape()
                        .map_err(|e| DocumentError::Docx(e.to_string()))?;
                    if let Some(current) = open.last_mut() {
                        current.push_str(&text);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(DocumentError::Docx(format!(
                    "XML error at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn docx_bytes(document_xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(DOCX_BODY_PART, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>MASTER SUPPLY </w:t></w:r><w:r><w:t>AGREEMENT</w:t></w:r></w:p>
    <w:p/>
    <w:p><w:r><w:t>Fee:</w:t><w:tab/><w:t>USD &amp; PKR</w:t></w:r></w:p>
    <w:tbl><w:tr><w:tc><w:p><w:r><w:t>Term</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
  </w:body>
</w:document>"#;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(DocumentKind::from_file_name("a.pdf").unwrap(), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_file_name("A.DOCX").unwrap(), DocumentKind::Docx);
        assert!(matches!(
            DocumentKind::from_file_name("notes.txt"),
            Err(DocumentError::UnsupportedType(_))
        ));
        assert!(DocumentKind::from_file_name("docx").is_err());
    }

    #[test]
    fn test_paragraphs_text_joins_runs_and_lines() {
        let text = paragraphs_text(BODY).unwrap();
        assert_eq!(text, "MASTER SUPPLY AGREEMENT\n\nFee:\tUSD & PKR\nTerm");
    }

    #[test]
    fn test_extract_text_from_docx_upload() {
        let doc = ContractDocument::from_bytes("contract.docx", docx_bytes(BODY)).unwrap();
        assert_eq!(doc.kind(), DocumentKind::Docx);
        let text = doc.extract_text().unwrap();
        assert!(text.starts_with("MASTER SUPPLY AGREEMENT"));
    }

    #[test]
    fn test_corrupt_docx_is_an_error() {
        let doc = ContractDocument::from_bytes("contract.docx", b"not a zip".to_vec()).unwrap();
        assert!(matches!(doc.extract_text(), Err(DocumentError::Zip(_))));
    }

    #[test]
    fn test_docx_without_body_part() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/other.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<x/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let doc = ContractDocument::from_bytes("contract.docx", bytes).unwrap();
        assert!(matches!(doc.extract_text(), Err(DocumentError::Docx(_))));
    }

    #[test]
    fn test_corrupt_pdf_is_an_error() {
        let doc = ContractDocument::from_bytes("contract.pdf", b"not a pdf at all".to_vec()).unwrap();
        assert!(matches!(doc.extract_text(), Err(DocumentError::Pdf(_))));
    }

    #[test]
    fn test_open_rejects_unsupported_before_reading() {
        let result = ContractDocument::open("/definitely/missing/contract.txt");
        assert!(matches!(result, Err(DocumentError::UnsupportedType(_))));
    }

    #[test]
    fn test_open_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Contract.DOCX");
        std::fs::write(&path, docx_bytes(BODY)).unwrap();

        let doc = ContractDocument::open(&path).unwrap();
        assert_eq!(doc.name(), "Contract.DOCX");
        assert!(doc.size() > 0);
    }
}
