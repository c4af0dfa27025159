pub mod calc;
pub mod error;
pub mod extraction;
pub mod model;
pub mod parsing;
pub mod rules;
pub mod store;

use error::SinsoError;
use extraction::{Document, PdfExtractor};

pub use calc::Calculator;
pub use parsing::{extract, parse_document, NoticeParser, ParsedDocument};

/// Main API entry point: extract a filing notice into its record graph.
///
/// The backend turns the bytes into pages; the pages are then parsed with
/// the default column layout. Only a backend failure is an error: fields the
/// parser cannot find are left empty and reported as warnings.
pub fn parse_pdf(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
) -> Result<ParsedDocument, SinsoError> {
    let pages = extractor.extract_pages(pdf_bytes)?;
    if pages.is_empty() {
        return Err(SinsoError::Extraction(format!(
            "{} backend returned no pages",
            extractor.backend_name()
        )));
    }
    log::debug!(
        "{} backend extracted {} page(s)",
        extractor.backend_name(),
        pages.len()
    );
    Ok(parse_document(&Document::new(pages)))
}
