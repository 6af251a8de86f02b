//! Text extraction from uploaded resume files (PDF, TXT, MD).
//!
//! The file kind is decided from the name and declared content type before
//! any bytes are parsed. PDF decoding runs on the blocking pool.

use bytes::Bytes;
use thiserror::Error;
use tracing::info;

pub mod handlers;
pub mod pdf;
pub mod upload;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Unsupported file type. Please upload PDF, TXT, or MD.")]
    Unsupported,

    #[error("The extracted text is empty. This PDF might be an image scan without OCR.")]
    EmptyPdf,

    #[error("This PDF is password protected. Please provide an unlocked version.")]
    PasswordProtected,

    #[error("PDF processing failed: {0}. Try copy-pasting the text.")]
    Pdf(String),

    #[error("The file is not valid UTF-8 text. Try copy-pasting the text.")]
    InvalidUtf8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Text,
}

impl FileKind {
    /// Classifies an upload by content type or file extension.
    pub fn detect(file_name: &str, content_type: Option<&str>) -> Result<Self, ExtractionError> {
        let mime = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase())
            .unwrap_or_default();
        let name = file_name.to_ascii_lowercase();

        if mime == "application/pdf" || name.ends_with(".pdf") {
            Ok(FileKind::Pdf)
        } else if mime == "text/plain" || name.ends_with(".txt") || name.ends_with(".md") {
            Ok(FileKind::Text)
        } else {
            Err(ExtractionError::Unsupported)
        }
    }
}

/// A file received from the browser.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Produces the plain text of an uploaded file.
pub async fn extract_text(upload: Upload) -> Result<String, ExtractionError> {
    let kind = FileKind::detect(&upload.file_name, upload.content_type.as_deref())?;
    info!(
        "Extracting text from {} ({:?}, {} bytes)",
        upload.file_name,
        kind,
        upload.data.len()
    );

    match kind {
        FileKind::Pdf => pdf::extract_pdf(upload.data).await,
        FileKind::Text => decode_text(&upload.data),
    }
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Reads a text or markdown file verbatim. Markdown is not rendered.
pub fn decode_text(data: &[u8]) -> Result<String, ExtractionError> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    String::from_utf8(data.to_vec()).map_err(|_| ExtractionError::InvalidUtf8)
}
