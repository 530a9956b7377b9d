//! Resume text extraction for uploaded files.
//!
//! PDF and DOCX are parsed on the blocking pool; images are deferred to the
//! conversation driver, which sends them to the vision-capable model on the
//! next turn. Nothing here fails past `extract_resume_text`.

pub mod docx;

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::notice::Notice;
use crate::models::session::{ResumeFile, IMAGE_RESUME_MARKER};

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const UNSUPPORTED_FILE_TYPE: &str = "Unsupported file type";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("extraction worker failed: {0}")]
    Worker(String),
}

/// Result of the extraction boundary: the text to store as `resume_text`,
/// plus an error notice when extraction failed.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub text: String,
    pub notice: Option<Notice>,
}

/// Uses the declared MIME type, falling back to the file extension when the
/// client sent none or only `application/octet-stream`.
pub fn resolve_mime_type(declared: Option<&str>, file_name: &str) -> String {
    match declared {
        Some(mime) if !mime.is_empty() && mime != "application/octet-stream" => mime.to_string(),
        _ => mime_guess::from_path(file_name)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string(),
    }
}

/// Extracts resume text. Failures become an empty string plus an error notice.
pub async fn extract_resume_text(file: &ResumeFile) -> Extraction {
    match extract_text(&file.mime_type, file.data.clone()).await {
        Ok(text) => {
            debug!(
                "Extracted {} chars from {} ({})",
                text.len(),
                file.file_name,
                file.mime_type
            );
            Extraction { text, notice: None }
        }
        Err(e) => {
            warn!("Resume extraction failed for {}: {e}", file.file_name);
            Extraction {
                text: String::new(),
                notice: Some(Notice::error(format!("Error processing file: {e}"))),
            }
        }
    }
}

async fn extract_text(mime_type: &str, data: Bytes) -> Result<String, ExtractError> {
    match mime_type {
        PDF_MIME => run_blocking(move || extract_pdf(&data)).await,
        DOCX_MIME => {
            run_blocking(move || docx::extract_paragraphs(&data).map(|p| p.join("\n"))).await
        }
        mime if mime.starts_with("image/") => Ok(IMAGE_RESUME_MARKER.to_string()),
        _ => Ok(UNSUPPORTED_FILE_TYPE.to_string()),
    }
}

fn extract_pdf(data: &[u8]) -> Result<String, ExtractError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(data)
        .map_err(|e| ExtractError::Pdf(e.to_string()))?;
    Ok(join_pages(pages))
}

/// Page order is preserved; one segment per page. pdf-extract pads each page
/// with blank lines, which would otherwise split a page into several segments.
fn join_pages(pages: Vec<String>) -> String {
    pages
        .iter()
        .map(|page| page.trim_matches(|c: char| c == '\n' || c == '\r'))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Runs a parser on the blocking pool. A panicking parser surfaces as `Worker`.
async fn run_blocking<F>(job: F) -> Result<String, ExtractError>
where
    F: FnOnce() -> Result<String, ExtractError> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| ExtractError::Worker(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notice::NoticeLevel;

    fn upload(name: &str, mime: &str, data: &[u8]) -> ResumeFile {
        ResumeFile::new(name.into(), mime.into(), Bytes::copy_from_slice(data))
    }

    /// Minimal uncompressed PDF with one Helvetica text line per page.
    fn build_pdf(pages: &[&str]) -> Vec<u8> {
        let font_id = 3 + 2 * pages.len();
        let kids: Vec<String> = (0..pages.len())
            .map(|i| format!("{} 0 R", 3 + 2 * i))
            .collect();

        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                pages.len()
            ),
        ];
        for (i, text) in pages.iter().enumerate() {
            let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
                 /Resources << /Font << /F1 {font_id} 0 R >> >> /Contents {} 0 R >>",
                4 + 2 * i
            ));
            objects.push(format!(
                "<< /Length {} >>\nstream\n{content}\nendstream",
                content.len()
            ));
        }
        objects.push(
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        );

        let mut out = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }

        let xref_at = out.len();
        let mut tail = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            tail.push_str(&format!("{offset:010} 00000 n \n"));
        }
        tail.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
            objects.len() + 1
        ));
        out.extend_from_slice(tail.as_bytes());
        out
    }

    #[test]
    fn test_join_pages_preserves_order() {
        let pages = vec!["page one".to_string(), "page two".into(), "page three".into()];
        let text = join_pages(pages);
        assert_eq!(text, "page one\npage two\npage three");
        assert_eq!(text.split('\n').count(), 3);
    }

    #[test]
    fn test_join_pages_strips_blank_line_padding() {
        let pages = vec!["\n\nPageOne\n".to_string(), "\n\nPageTwo\n\n".into()];
        assert_eq!(join_pages(pages), "PageOne\nPageTwo");
    }

    #[tokio::test]
    async fn test_pdf_pages_are_newline_joined() {
        let pdf = build_pdf(&["PageOne", "PageTwo"]);
        let result = extract_resume_text(&upload("cv.pdf", PDF_MIME, &pdf)).await;
        assert!(result.notice.is_none(), "{:?}", result.notice);
        assert_eq!(result.text, "PageOne\nPageTwo");
    }

    #[test]
    fn test_resolve_mime_prefers_declared() {
        assert_eq!(resolve_mime_type(Some("image/png"), "cv.pdf"), "image/png");
    }

    #[test]
    fn test_resolve_mime_guesses_from_extension() {
        assert_eq!(resolve_mime_type(None, "cv.pdf"), PDF_MIME);
        assert_eq!(
            resolve_mime_type(Some("application/octet-stream"), "cv.docx"),
            DOCX_MIME
        );
        assert_eq!(resolve_mime_type(None, "cv.jpeg"), "image/jpeg");
    }

    #[tokio::test]
    async fn test_image_is_deferred() {
        let result = extract_resume_text(&upload("cv.jpg", "image/jpeg", b"\xff\xd8")).await;
        assert_eq!(result.text, IMAGE_RESUME_MARKER);
        assert!(result.notice.is_none());
    }

    #[tokio::test]
    async fn test_unsupported_type_ignores_content() {
        for data in [&b""[..], &b"hello"[..], &b"%PDF-1.4"[..]] {
            let result = extract_resume_text(&upload("cv.txt", "text/plain", data)).await;
            assert_eq!(result.text, UNSUPPORTED_FILE_TYPE);
            assert!(result.notice.is_none());
        }
    }

    #[tokio::test]
    async fn test_docx_paragraphs_joined_by_newline() {
        let docx = docx::tests::build_docx(
            "<w:p><w:r><w:t>Ada</w:t></w:r></w:p><w:p/><w:p><w:r><w:t>Rust</w:t></w:r></w:p>",
        );
        let result = extract_resume_text(&upload("cv.docx", DOCX_MIME, &docx)).await;
        assert_eq!(result.text, "Ada\n\nRust");
    }

    #[tokio::test]
    async fn test_corrupt_pdf_yields_empty_text_and_notice() {
        let result = extract_resume_text(&upload("cv.pdf", PDF_MIME, b"not a pdf")).await;
        assert_eq!(result.text, "");
        let notice = result.notice.expect("notice");
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.message.starts_with("Error processing file:"));
    }

    #[tokio::test]
    async fn test_corrupt_docx_yields_empty_text_and_notice() {
        let result = extract_resume_text(&upload("cv.docx", DOCX_MIME, b"not a zip")).await;
        assert_eq!(result.text, "");
        assert!(result.notice.is_some());
    }
}
