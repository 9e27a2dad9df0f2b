//! Raw document acquisition: PDF text layer and the content digest.

use md5::{Digest, Md5};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// No extractable text on any page (scanned-image PDF). The one
    /// fatal condition: surfaced as `success: false`.
    #[error("could not extract text from PDF (no text layer; scanned image?)")]
    DocumentUnreadable,
    #[error("could not parse PDF: {0}")]
    Pdf(String),
    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),
}

/// MD5 hex digest of the raw bytes. Pure function of the input, computed
/// regardless of parsing outcome, so the upload layer can reject
/// re-uploads of a byte-identical file.
pub fn content_hash(bytes: &[u8]) -> String {
    format!("{:x}", Md5::digest(bytes))
}

/// One uploaded statement: per-page extracted text plus the content hash.
/// Created once per upload, read-only afterwards.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pages: Vec<String>,
    file_hash: String,
}

impl RawDocument {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ExtractError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ExtractError> {
        let file_hash = content_hash(bytes);
        let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
            .map_err(|e| ExtractError::Pdf(e.to_string()))?;
        Self::assemble(pages, file_hash)
    }

    /// Test seam and non-PDF entry: pages of already-extracted text.
    /// The hash covers the joined text since there are no raw bytes.
    pub fn from_text_pages(pages: Vec<String>) -> Result<Self, ExtractError> {
        let file_hash = content_hash(pages.join("\n").as_bytes());
        Self::assemble(pages, file_hash)
    }

    fn assemble(pages: Vec<String>, file_hash: String) -> Result<Self, ExtractError> {
        if pages.iter().all(|p| p.trim().is_empty()) {
            return Err(ExtractError::DocumentUnreadable);
        }
        Ok(Self { pages, file_hash })
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    /// All pages joined, for whole-document pattern searches.
    pub fn full_text(&self) -> String {
        self.pages.join("\n")
    }

    pub fn file_hash(&self) -> &str {
        &self.file_hash
    }
}
