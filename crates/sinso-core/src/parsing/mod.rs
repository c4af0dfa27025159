pub mod business;
pub mod card;
pub mod expense;
pub mod history;
pub mod layout;
pub mod penalty;
pub mod summary;
pub mod values;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::extraction::Document;
use crate::model::RecordGraph;
use layout::ColumnLayout;

/// Pages in a complete notice.
pub const EXPECTED_PAGES: usize = 5;

/// A field-level miss noted while parsing. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseWarning {
    /// 1-based page position the warning refers to.
    pub page_number: usize,
    pub reason: String,
}

/// Result of parsing a notice: the records plus any field-level misses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub records: RecordGraph,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ParseWarning>,
}

/// Maps the five pages of a filing notice onto a [`RecordGraph`].
///
/// Each page is parsed on its own and the results are merged by page
/// position. A pattern that does not match leaves its field empty (or
/// zero for the fixed catalogs); parsing itself never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoticeParser {
    layout: ColumnLayout,
}

impl NoticeParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(layout: ColumnLayout) -> Self {
        NoticeParser { layout }
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    pub fn extract(&self, doc: &Document) -> RecordGraph {
        self.parse(doc).records
    }

    pub fn parse(&self, doc: &Document) -> ParsedDocument {
        let mut records = RecordGraph::default();
        let mut warnings = Vec::new();

        if doc.pages.len() < EXPECTED_PAGES {
            note(
                &mut warnings,
                doc.pages.len() + 1,
                format!(
                    "document has {} of {} pages; later sections skipped",
                    doc.pages.len(),
                    EXPECTED_PAGES
                ),
            );
        }

        if let Some(page) = doc.page(0) {
            records.taxpayer = summary::parse_summary(&page.text, &page.tables, &self.layout);
            if records.taxpayer.tax_year.is_none() {
                note(&mut warnings, 1, "attribution year not found in title".into());
            }

            records.businesses = business::parse_businesses(&page.tables, &self.layout.business);
            if records.businesses.is_empty() {
                note(&mut warnings, 1, "no business registration rows found".into());
            }

            records.other_incomes = summary::parse_other_incomes(&page.text);
            records.deductions = summary::parse_deductions(&page.text);
        }

        if let Some(page) = doc.page(1) {
            records.penalty_taxes = penalty::parse_penalties(&page.text);
        }
        records.penalty_taxes.extend(penalty::fixed_penalties());

        if let Some(page) = doc.page(2) {
            records.tax_history = history::parse_tax_history(&page.text, &mut warnings);
        }

        if let Some(page) = doc.page(3) {
            records.income_rate_history = history::parse_income_rates(&page.text, &mut warnings);
            records.sg_expenses = expense::parse_expense_ratios(&page.text);
        }

        if let Some(page) = doc.page(4) {
            records.credit_card_usage = card::parse_card_usage(&page.text);
        }

        log::info!(
            "parsed notice (layout {}): {} business(es), {} penalty line(s), {} history year(s), {} income-rate year(s), {} expense row(s)",
            self.layout.revision,
            records.businesses.len(),
            records.penalty_taxes.len(),
            records.tax_history.len(),
            records.income_rate_history.len(),
            records.sg_expenses.len(),
        );

        ParsedDocument { records, warnings }
    }
}

/// Parse a document with the default column layout.
pub fn parse_document(doc: &Document) -> ParsedDocument {
    NoticeParser::new().parse(doc)
}

/// Extract the record graph of a document with the default column layout.
pub fn extract(doc: &Document) -> RecordGraph {
    NoticeParser::new().extract(doc)
}

pub(crate) fn note(warnings: &mut Vec<ParseWarning>, page_number: usize, reason: String) {
    log::debug!("page {page_number}: {reason}");
    warnings.push(ParseWarning {
        page_number,
        reason,
    });
}

pub(crate) fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("built-in pattern compiles")
}

/// First capture group of the first match.
pub(crate) fn capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)?.get(1).map(|m| m.as_str())
}
