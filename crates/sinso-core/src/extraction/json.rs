use crate::error::SinsoError;
use crate::extraction::{Document, PageContent, PdfExtractor};

/// Reads a page dump produced by a ruled-table extractor.
///
/// The input is a JSON [`Document`]: per page the plain text and every table
/// as a grid of optional cell strings. This is the layout the positional
/// column maps were measured against.
pub struct JsonDocumentExtractor;

impl JsonDocumentExtractor {
    pub fn new() -> Self {
        JsonDocumentExtractor
    }
}

impl Default for JsonDocumentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor for JsonDocumentExtractor {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<PageContent>, SinsoError> {
        let doc: Document = serde_json::from_slice(bytes)
            .map_err(|e| SinsoError::Extraction(format!("invalid page dump: {e}")))?;

        if doc.pages.is_empty() {
            return Err(SinsoError::Extraction("page dump contains no pages".into()));
        }

        let pages = doc
            .pages
            .into_iter()
            .enumerate()
            .map(|(i, mut page)| {
                if page.page_number == 0 {
                    page.page_number = i + 1;
                }
                page
            })
            .collect();

        Ok(pages)
    }

    fn backend_name(&self) -> &str {
        "json"
    }
}
