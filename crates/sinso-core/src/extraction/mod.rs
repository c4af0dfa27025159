pub mod json;
pub mod pdftotext;
pub mod table;

use serde::{Deserialize, Serialize};

use crate::error::SinsoError;

/// A row-major grid of cells. Merged or empty cells are `None`.
pub type Table = Vec<Vec<Option<String>>>;

/// Content extracted from a single page of a PDF.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageContent {
    /// 1-based; informational only, pages are consumed by position.
    #[serde(default)]
    pub page_number: usize,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub tables: Vec<Table>,
}

/// A whole notice as handed to the parser.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    pub pages: Vec<PageContent>,
}

impl Document {
    pub fn new(pages: Vec<PageContent>) -> Self {
        Document { pages }
    }

    /// Page at 0-based position, if the document is long enough.
    pub fn page(&self, index: usize) -> Option<&PageContent> {
        self.pages.get(index)
    }
}

/// Trait for PDF text/table extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract text and tables from PDF bytes, returning one PageContent per page.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, SinsoError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
