//! PDF text extraction via `pdf-extract`.

use bytes::Bytes;
use tracing::warn;

use crate::extract::ExtractionError;

const PAGE_SEPARATOR: &str = "\n\n";

/// Extracts the text of every page, off the async runtime. A panic inside
/// the decoder becomes an `ExtractionError`.
pub async fn extract_pdf(data: Bytes) -> Result<String, ExtractionError> {
    let encrypted = has_encryption_dictionary(&data);
    match tokio::task::spawn_blocking(move || extract_pdf_text(&data)).await {
        Ok(result) => result,
        Err(join_error) => {
            warn!("PDF decoder aborted: {join_error}");
            if encrypted {
                Err(ExtractionError::PasswordProtected)
            } else {
                Err(ExtractionError::Pdf("the document could not be decoded".to_string()))
            }
        }
    }
}

/// Synchronous extraction: pages in order, blank line between pages, trimmed.
pub fn extract_pdf_text(data: &[u8]) -> Result<String, ExtractionError> {
    let encrypted = has_encryption_dictionary(data);

    let pages = match pdf_extract::extract_text_from_mem_by_pages(data) {
        Ok(pages) => pages,
        Err(e) => {
            let detail = e.to_string();
            warn!("PDF extraction failed (encrypted={encrypted}): {detail}");
            if encrypted || mentions_encryption(&detail) {
                return Err(ExtractionError::PasswordProtected);
            }
            return Err(ExtractionError::Pdf(detail));
        }
    };

    // A user password makes the decoder fail above. Owner-only files decode
    // normally, so empty text here is a scan either way.
    let text = join_pages(&pages);
    if text.is_empty() {
        return Err(ExtractionError::EmptyPdf);
    }

    Ok(text)
}

fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    pages
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
        .trim()
        .to_string()
}

/// True when the file declares an `/Encrypt` dictionary in its trailer.
/// Page content is never scanned.
fn has_encryption_dictionary(data: &[u8]) -> bool {
    trailer_section(data).is_some_and(|section| find(section, b"/Encrypt").is_some())
}

/// The cross-reference section the final `startxref` points at: either an
/// xref table plus its `trailer` dictionary, or an xref stream's dictionary.
fn trailer_section(data: &[u8]) -> Option<&[u8]> {
    let marker = rfind(data, b"startxref")?;
    let digits: String = data[marker + b"startxref".len()..]
        .iter()
        .skip_while(|b| b.is_ascii_whitespace())
        .take_while(|b| b.is_ascii_digit())
        .map(|&b| char::from(b))
        .collect();
    let offset: usize = digits.parse().ok()?;

    let section = data.get(offset..marker)?;
    let end = find(section, b"stream").unwrap_or(section.len());
    Some(&section[..end])
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w == needle)
}

fn mentions_encryption(detail: &str) -> bool {
    let detail = detail.to_ascii_lowercase();
    ["password", "encrypt", "decrypt"]
        .iter()
        .any(|needle| detail.contains(needle))
}
