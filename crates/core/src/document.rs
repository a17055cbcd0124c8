//! Upload validation for project and milestone documents.
//!
//! Only PDF and DOCX files up to 10 MiB are accepted. Validation runs
//! before the document store is touched so a rejected upload never leaves
//! a stray file behind.

use crate::error::CoreError;

/// Accepted file extensions (lowercase, without the dot).
pub const ALLOWED_DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "docx"];

/// Maximum accepted document size: 10 MiB.
pub const MAX_DOCUMENT_BYTES: u64 = 10 * 1024 * 1024;

/// Validate an uploaded document's filename extension and size.
///
/// Returns [`CoreError::InvalidDocument`] naming the specific reason: the
/// unsupported extension, or how far over the size limit the file is.
pub fn validate_document(filename: &str, size_bytes: u64) -> Result<(), CoreError> {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if !ALLOWED_DOCUMENT_EXTENSIONS.contains(&extension.as_str()) {
        return Err(CoreError::InvalidDocument(format!(
            "Unsupported file type '{}'. Allowed types: {}",
            if extension.is_empty() {
                "(none)".to_string()
            } else {
                format!(".{extension}")
            },
            ALLOWED_DOCUMENT_EXTENSIONS.join(", ")
        )));
    }

    if size_bytes > MAX_DOCUMENT_BYTES {
        let over = size_bytes - MAX_DOCUMENT_BYTES;
        return Err(CoreError::InvalidDocument(format!(
            "File is {:.1} MiB over the {} MiB limit",
            over as f64 / (1024.0 * 1024.0),
            MAX_DOCUMENT_BYTES / (1024 * 1024)
        )));
    }

    Ok(())
}
