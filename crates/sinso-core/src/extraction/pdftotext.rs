use crate::error::SinsoError;
use crate::extraction::table::tables_from_layout;
use crate::extraction::{PageContent, PdfExtractor};
use std::io::Write;
use std::process::Command;

/// PDF extraction backend using pdftotext (from poppler-utils).
///
/// Uses `pdftotext -layout` to preserve whitespace alignment of tables,
/// then rebuilds each page's tables from the aligned columns.
pub struct PdftotextExtractor;

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor for PdftotextExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, SinsoError> {
        let mut tmpfile =
            tempfile::NamedTempFile::new().map_err(|e| SinsoError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(pdf_bytes)
            .map_err(|e| SinsoError::Extraction(e.to_string()))?;

        let output = Command::new("pdftotext")
            .arg("-layout")
            .arg("-enc")
            .arg("UTF-8")
            .arg(tmpfile.path())
            .arg("-") // output to stdout
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    SinsoError::PdftotextNotFound
                } else {
                    SinsoError::Extraction(format!("pdftotext failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(SinsoError::PdftotextFailed { code, stderr });
        }

        let text = String::from_utf8_lossy(&output.stdout);
        let pages = split_pages(&text);

        if pages.is_empty() {
            return Err(SinsoError::Extraction("no text content found in PDF".into()));
        }

        log::debug!("pdftotext produced {} page(s)", pages.len());
        Ok(pages)
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

/// Split pdftotext output into pages (form feed `\x0c` separates pages).
/// The trailing empty chunk after the final form feed is dropped.
fn split_pages(text: &str) -> Vec<PageContent> {
    let chunks: Vec<&str> = text.split('\x0c').collect();
    let keep = chunks
        .iter()
        .rposition(|c| !c.trim().is_empty())
        .map_or(0, |last| last + 1);

    chunks[..keep]
        .iter()
        .enumerate()
        .map(|(i, page_text)| PageContent {
            page_number: i + 1,
            text: page_text.to_string(),
            tables: tables_from_layout(page_text),
        })
        .collect()
}
