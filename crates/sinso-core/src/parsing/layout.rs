/// Fixed cell positions in the notice's ruled tables.
///
/// The extracted table geometry has no stable header row, so business rows
/// and the payment-extension row are read by column index. A new revision of
/// the printed notice is a new constant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub revision: &'static str,
    pub business: BusinessColumns,
    /// Row containing both "납부기한" and "ARS" labels.
    pub payment_extension_cell: usize,
    pub ars_auth_number_cell: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessColumns {
    pub reg_no: usize,
    pub name: usize,
    pub income_type: usize,
    pub industry_code: usize,
    pub business_type: usize,
    pub bookkeeping: usize,
    pub expense_type: usize,
    pub revenue: usize,
    pub std_general: usize,
    pub std_own: usize,
    pub simple_general: usize,
    pub simple_own: usize,
}

impl ColumnLayout {
    /// Layout of the 2024 attribution-year notice.
    pub const NTS_2024: ColumnLayout = ColumnLayout {
        revision: "nts-2024",
        business: BusinessColumns {
            reg_no: 0,
            name: 2,
            income_type: 4,
            industry_code: 8,
            business_type: 9,
            bookkeeping: 10,
            expense_type: 12,
            revenue: 14,
            std_general: 16,
            std_own: 18,
            simple_general: 19,
            simple_own: 20,
        },
        payment_extension_cell: 5,
        ars_auth_number_cell: 17,
    };
}

impl Default for ColumnLayout {
    fn default() -> Self {
        ColumnLayout::NTS_2024
    }
}

/// Cell text with embedded line breaks removed; blank cells read as `None`.
pub fn cell(row: &[Option<String>], col: usize) -> Option<String> {
    let raw = row.get(col)?.as_deref()?;
    let joined: String = raw.chars().filter(|&c| c != '\n' && c != '\r').collect();
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
