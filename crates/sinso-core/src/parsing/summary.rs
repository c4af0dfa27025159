use std::sync::LazyLock;

use regex::Regex;

use crate::extraction::Table;
use crate::model::{
    DeductionItem, DeductionKind, Flag, OtherIncomeFlag, OtherIncomeKind, TaxpayerSummary,
};
use crate::parsing::layout::{cell, ColumnLayout};
use crate::parsing::values::{to_int, to_year};
use crate::parsing::{capture, pattern};

static TITLE_YEAR: LazyLock<Regex> = LazyLock::new(|| pattern(r"(\d{4})년\s*귀속"));
static NAME_BIRTH: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"성명\s+(\S+)\s+생년월일\s+(\d{2}\.\d{2}\.\d{2})"));
static GUIDE_TYPE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?s)안내유형\s+(.+?)(?:\n|기장의무)"));
static BOOKKEEPING: LazyLock<Regex> = LazyLock::new(|| pattern(r"기장의무\s+(\S+)"));
static ESTIMATED_RATE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"추계시\s*적용경비율\s+(\S+)"));
static RELIGION_INCOME: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"종교인기타\s*소득유무\s*[:：]?\s*([OXox])"));
static APPLICABILITY: LazyLock<Regex> = LazyLock::new(|| pattern(r"해당여부\s+([OXox\s]+)"));

/// Deduction probes, one per catalog line. The amount must end in "원".
static DEDUCTION_PROBES: LazyLock<Vec<(DeductionKind, Regex)>> = LazyLock::new(|| {
    DeductionKind::ALL
        .iter()
        .map(|&kind| {
            let re = match kind {
                DeductionKind::InterimPrepayment => r"중간예납세액\s+([\d,]+)원",
                DeductionKind::WithheldServiceIncome => {
                    r"원천징수세액\s*[(（]인적용역\s*사업소득[)）]\s*([\d,]+)원"
                }
                DeductionKind::NationalPension => r"국민연금보험료\s+([\d,]+)원",
                DeductionKind::PersonalPensionSavings => r"개인연금저축\s+([\d,]+)원",
                DeductionKind::SmallBusinessMutualAid => {
                    r"소기업소상공인공제부금\s*[(（]노란우산공제[)）]\s*([\d,]+)원"
                }
                DeductionKind::RetirementPensionCredit => r"퇴직연금세액공제\s+([\d,]+)원",
                DeductionKind::PensionAccountCredit => r"연금계좌세액공제\s+([\d,]+)원",
            };
            (kind, pattern(re))
        })
        .collect()
});

/// Taxpayer header fields from page 1 text, plus the two unlabeled cells of
/// the payment-extension row.
pub fn parse_summary(text: &str, tables: &[Table], layout: &ColumnLayout) -> TaxpayerSummary {
    let mut summary = TaxpayerSummary {
        tax_year: capture(&TITLE_YEAR, text).and_then(to_year),
        ..Default::default()
    };

    if let Some(caps) = NAME_BIRTH.captures(text) {
        summary.name = Some(caps[1].to_string());
        summary.birth_date = Some(caps[2].to_string());
    }

    summary.guide_type = capture(&GUIDE_TYPE, text)
        .map(|s| s.replace('\n', " ").trim().to_string())
        .filter(|s| !s.is_empty());
    summary.bookkeeping_obligation = capture(&BOOKKEEPING, text).map(str::to_string);
    summary.estimated_expense_rate = capture(&ESTIMATED_RATE, text).map(str::to_string);
    summary.religion_income = capture(&RELIGION_INCOME, text)
        .and_then(Flag::from_glyph)
        .unwrap_or_default();

    if let Some(row) = find_payment_row(tables) {
        summary.payment_extension = cell(row, layout.payment_extension_cell);
        summary.ars_auth_number = cell(row, layout.ars_auth_number_cell);
    } else {
        log::debug!("payment-extension row not found");
    }

    summary
}

/// First table row whose labels mention both the payment deadline and ARS.
fn find_payment_row(tables: &[Table]) -> Option<&[Option<String>]> {
    tables.iter().flatten().map(Vec::as_slice).find(|row| {
        let joined = row
            .iter()
            .flatten()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        joined.contains("납부기한") && joined.contains("ARS")
    })
}

/// The "해당여부" row: up to six O/X glyphs in fixed category order.
/// Missing glyphs (or a missing row) read as `X`.
pub fn parse_other_incomes(text: &str) -> Vec<OtherIncomeFlag> {
    let glyphs: Vec<Flag> = capture(&APPLICABILITY, text)
        .map(|s| s.chars().filter_map(Flag::from_char).collect())
        .unwrap_or_default();

    OtherIncomeKind::ALL
        .iter()
        .enumerate()
        .map(|(i, &income_type)| OtherIncomeFlag {
            income_type,
            has_data: glyphs.get(i).copied().unwrap_or_default(),
        })
        .collect()
}

/// All seven deduction lines; a missing line is recorded as zero.
pub fn parse_deductions(text: &str) -> Vec<DeductionItem> {
    DEDUCTION_PROBES
        .iter()
        .map(|(kind, re)| {
            let amount = capture(re, text).and_then(to_int);
            if amount.is_none() {
                log::debug!("deduction '{}' not found, recording 0", kind.item_name());
            }
            DeductionItem {
                amount: amount.unwrap_or(0),
                ..DeductionItem::zero(*kind)
            }
        })
        .collect()
}
