//! End-to-end extraction pipeline.
//!
//! One call per document, synchronous and stateless: safe to run in
//! parallel across documents without coordination. The entry points
//! always resolve to a well-formed [`ExtractionResult`] — the only
//! fatal condition (no text layer) becomes `success: false`.

use std::path::Path;
use tracing::warn;

use passbook_core::{CategoryRules, ExtractionResult};

use crate::document::{content_hash, RawDocument};
use crate::profile::BankProfile;
use crate::{lines, locate, reconcile, table};

/// Immutable per-call configuration: bank-format profile plus category
/// taxonomies. Construct once, share freely.
#[derive(Debug, Clone, Default)]
pub struct ExtractConfig {
    pub profile: BankProfile,
    pub rules: CategoryRules,
}

/// Run the full pipeline over an acquired document.
pub fn extract_statement(doc: &RawDocument, config: &ExtractConfig) -> ExtractionResult {
    let full_text = doc.full_text();
    let metadata = locate::locate_metadata(&full_text, &config.profile);
    let table_rows = table::extract_from_pages(doc.pages(), &config.profile);
    // the fallback always runs; either path may have the higher yield
    let text_rows = lines::extract_from_text(&full_text, &config.profile).unwrap_or_else(|e| {
        warn!(error = %e, "text-line fallback failed");
        Vec::new()
    });
    reconcile::reconcile(
        table_rows,
        text_rows,
        metadata,
        doc.file_hash().to_string(),
        &config.rules,
    )
}

/// Extract from an in-memory PDF. Parse failures come back as a failure
/// envelope that still carries the content hash, so duplicate-upload
/// detection works even for unreadable files.
pub fn extract_from_bytes(bytes: &[u8], config: &ExtractConfig) -> ExtractionResult {
    match RawDocument::from_bytes(bytes) {
        Ok(doc) => extract_statement(&doc, config),
        Err(err) => ExtractionResult::failure(content_hash(bytes), err.to_string()),
    }
}

/// Extract from a PDF on disk. The caller owns the file and its cleanup.
pub fn extract_from_path(path: impl AsRef<Path>, config: &ExtractConfig) -> ExtractionResult {
    match std::fs::read(path.as_ref()) {
        Ok(bytes) => extract_from_bytes(&bytes, config),
        Err(err) => ExtractionResult::failure(
            String::new(),
            format!("could not read {}: {err}", path.as_ref().display()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreadable_bytes_fail_gracefully() {
        let r = extract_from_bytes(b"not a pdf at all", &ExtractConfig::default());
        assert!(!r.success);
        assert!(r.error.as_deref().is_some_and(|e| !e.is_empty()));
        assert!(r.transactions.is_empty());
        // hash still present for dedup
        assert_eq!(r.file_hash.len(), 32);
    }

    #[test]
    fn test_missing_file_fails_gracefully() {
        let r = extract_from_path("/no/such/file.pdf", &ExtractConfig::default());
        assert!(!r.success);
        assert!(r.error.is_some());
    }
}
