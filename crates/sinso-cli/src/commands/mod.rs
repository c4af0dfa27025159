pub mod analyze;
pub mod brackets;
pub mod calculate;
pub mod parse;

use sinso_core::error::SinsoError;
use sinso_core::extraction::json::JsonDocumentExtractor;
use sinso_core::extraction::pdftotext::PdftotextExtractor;
use sinso_core::extraction::PdfExtractor;
use sinso_core::rules::builtin;
use sinso_core::rules::schema::TaxTable;
use sinso_core::store::{MemoryStore, TaxpayerId};
use sinso_core::ParsedDocument;
use std::path::{Path, PathBuf};

/// Extract a notice, choosing the backend by file extension: `.json` is a
/// pre-extracted page dump, anything else goes through pdftotext.
pub fn load_notice(input_file: &Path) -> Result<ParsedDocument, SinsoError> {
    let is_json = input_file
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let extractor: Box<dyn PdfExtractor> = if is_json {
        Box::new(JsonDocumentExtractor::new())
    } else {
        Box::new(PdftotextExtractor::new())
    };

    let bytes = std::fs::read(input_file)?;
    let parsed = sinso_core::parse_pdf(&bytes, extractor.as_ref())?;
    for w in &parsed.warnings {
        log::warn!("page {}: {}", w.page_number, w.reason);
    }
    if let Some(hint) = missing_business_hint(is_json, &parsed) {
        eprintln!("Note: {hint}");
    }
    Ok(parsed)
}

/// pdftotext layout text loses the ruled business table, so a PDF that yields
/// no business rows most likely lost them in extraction.
fn missing_business_hint(is_json: bool, parsed: &ParsedDocument) -> Option<&'static str> {
    if is_json || !parsed.records.businesses.is_empty() {
        return None;
    }
    Some(
        "no business rows were recovered from the PDF text; revenue and tax will read as 0. \
         Pass a JSON page dump with ruled tables for business-level figures.",
    )
}

/// Extract a notice into a fresh in-memory store.
pub fn store_notice(input_file: &Path) -> Result<(MemoryStore, TaxpayerId), SinsoError> {
    let parsed = load_notice(input_file)?;
    let mut store = MemoryStore::new();
    let id = store.insert(
        parsed.records,
        Some(input_file.display().to_string()),
    );
    Ok((store, id))
}

/// The custom table when given, else the named or default preset.
pub fn select_table(
    preset: Option<String>,
    table: Option<PathBuf>,
) -> Result<TaxTable, SinsoError> {
    match table {
        Some(path) => sinso_core::rules::load_table(&path),
        None => builtin::load_preset(preset.as_deref().unwrap_or(builtin::DEFAULT_PRESET)),
    }
}
