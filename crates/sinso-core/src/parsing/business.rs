use std::sync::LazyLock;

use regex::Regex;

use crate::extraction::Table;
use crate::model::BusinessEntry;
use crate::parsing::layout::{cell, BusinessColumns};
use crate::parsing::pattern;
use crate::parsing::values::{to_int, to_rate};

/// Business registration number, whole cell only.
pub static REG_NO: LazyLock<Regex> = LazyLock::new(|| pattern(r"^\d{3}-\d{2}-\d{5}$"));

/// Scan every table for business rows.
///
/// A row is a business row when its registration-number cell is a complete
/// `NNN-NN-NNNNN` and the row reaches the revenue column. Every other field
/// is read from its fixed column.
pub fn parse_businesses(tables: &[Table], cols: &BusinessColumns) -> Vec<BusinessEntry> {
    tables
        .iter()
        .flatten()
        .filter_map(|row| try_parse_row(row, cols))
        .collect()
}

fn try_parse_row(row: &[Option<String>], cols: &BusinessColumns) -> Option<BusinessEntry> {
    if row.len() <= cols.revenue {
        return None;
    }

    let reg_no = cell(row, cols.reg_no)?;
    if !REG_NO.is_match(&reg_no) {
        return None;
    }

    let rate = |col| cell(row, col).as_deref().and_then(to_rate);

    Some(BusinessEntry {
        business_reg_no: reg_no,
        business_name: cell(row, cols.name),
        income_type_code: cell(row, cols.income_type),
        industry_code: cell(row, cols.industry_code),
        business_type: cell(row, cols.business_type),
        bookkeeping_obligation: cell(row, cols.bookkeeping),
        expense_rate_type: cell(row, cols.expense_type),
        revenue: cell(row, cols.revenue).as_deref().and_then(to_int),
        std_expense_rate_general: rate(cols.std_general),
        std_expense_rate_own: rate(cols.std_own),
        simple_expense_rate_general: rate(cols.simple_general),
        simple_expense_rate_own: rate(cols.simple_own),
    })
}
