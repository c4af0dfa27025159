use std::sync::LazyLock;

use regex::Regex;

use crate::model::{IncomeRateYear, TaxHistoryYear};
use crate::parsing::values::{to_int, to_rate, to_year};
use crate::parsing::{capture, note, pattern, ParseWarning};

/// Years shown side by side on pages 3 and 4.
pub const HISTORY_YEARS: usize = 3;

const AMOUNT: &str = r"([\-\d,]+)";
const PERCENT: &str = r"([\d.]+)\s*%";
const SIGNED_PERCENT: &str = r"([\-\d.]+)\s*%";

/// `<label> v1 v2 v3` on one line, amounts separated by whitespace.
fn amount_row(label: &str) -> Regex {
    pattern(&format!(r"{label}\s+{AMOUNT}\s+{AMOUNT}\s+{AMOUNT}"))
}

/// `<label> r1% r2% r3%`.
fn percent_row(label: &str) -> Regex {
    pattern(&format!(r"{label}\s+{PERCENT}\s+{PERCENT}\s+{PERCENT}"))
}

static ATTRIBUTION_YEAR: LazyLock<Regex> = LazyLock::new(|| pattern(r"(\d{4})귀속"));
static TOTAL_INCOME: LazyLock<Regex> = LazyLock::new(|| amount_row("종합소득금액"));
static INCOME_DEDUCTION: LazyLock<Regex> = LazyLock::new(|| amount_row("소득공제"));
static TAXABLE_INCOME: LazyLock<Regex> = LazyLock::new(|| amount_row("과세표준"));
static TAX_RATE: LazyLock<Regex> = LazyLock::new(|| percent_row("세율"));
static CALCULATED_TAX: LazyLock<Regex> = LazyLock::new(|| amount_row("산출세액"));
static DEDUCTION_TAX: LazyLock<Regex> = LazyLock::new(|| amount_row("공제[·ㆍᆞ・]\\s*감면세액"));
static DETERMINED_TAX: LazyLock<Regex> = LazyLock::new(|| amount_row("결정세액"));
static EFFECTIVE_RATE: LazyLock<Regex> = LazyLock::new(|| percent_row("실효세율"));

static BUSINESS_REG_NO: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"사업자\s*등\s*록\s*번\s*호\s*(\d{3}-\d{2}-\d{5})"));
static BUSINESS_NAME: LazyLock<Regex> = LazyLock::new(|| pattern(r"상\s*호\s*(.+?)\s+사업자"));
static CALENDAR_YEAR: LazyLock<Regex> = LazyLock::new(|| pattern(r"(\d{4})년"));
static REVENUE: LazyLock<Regex> = LazyLock::new(|| amount_row("수입금액"));
static NECESSARY_EXPENSES: LazyLock<Regex> = LazyLock::new(|| amount_row("필요경비"));
static INCOME: LazyLock<Regex> = LazyLock::new(|| amount_row("소득금액"));
static INCOME_RATE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(&format!(
        r"소득률\s*\(?당해업체\)?\s*{SIGNED_PERCENT}\s*{SIGNED_PERCENT}\s*{SIGNED_PERCENT}"
    ))
});

/// The three per-year values captured from one labelled row.
#[derive(Debug, Clone, Default)]
struct YearRow<'t> {
    values: Option<[&'t str; HISTORY_YEARS]>,
}

impl<'t> YearRow<'t> {
    fn capture(re: &Regex, text: &'t str) -> Self {
        let values = re.captures(text).and_then(|caps| {
            Some([
                caps.get(1)?.as_str(),
                caps.get(2)?.as_str(),
                caps.get(3)?.as_str(),
            ])
        });
        YearRow { values }
    }

    fn matched(&self) -> bool {
        self.values.is_some()
    }

    /// Value for the i-th year. An unmatched row, or a year past the
    /// captured values, reads as `None`.
    fn at(&self, i: usize) -> Option<&'t str> {
        self.values.and_then(|v| v.get(i).copied())
    }

    fn amount(&self, i: usize) -> Option<i64> {
        self.at(i).and_then(to_int)
    }
}

/// Join the year tokens with row values by position. The years found are
/// truncated to `HISTORY_YEARS`; a year count that differs from the number
/// of values on a matched row is noted but never fatal.
fn aligned_years(
    years: Vec<i32>,
    rows: &[&YearRow<'_>],
    page_number: usize,
    warnings: &mut Vec<ParseWarning>,
) -> Vec<i32> {
    let found = years.len();
    let years: Vec<i32> = years.into_iter().take(HISTORY_YEARS).collect();

    if found != HISTORY_YEARS && rows.iter().any(|r| r.matched()) {
        log::warn!(
            "page {page_number}: found {found} year column(s) for {HISTORY_YEARS} values per row"
        );
        note(
            warnings,
            page_number,
            format!("found {found} year column(s), expected {HISTORY_YEARS}; unmatched values dropped or left empty"),
        );
    }

    years
}

/// Page 3: the filing summary of the last three years.
pub fn parse_tax_history(text: &str, warnings: &mut Vec<ParseWarning>) -> Vec<TaxHistoryYear> {
    let years: Vec<i32> = ATTRIBUTION_YEAR
        .captures_iter(text)
        .filter_map(|c| to_year(&c[1]))
        .collect();

    let total_income = YearRow::capture(&TOTAL_INCOME, text);
    let income_deduction = YearRow::capture(&INCOME_DEDUCTION, text);
    let taxable_income = YearRow::capture(&TAXABLE_INCOME, text);
    let tax_rate = YearRow::capture(&TAX_RATE, text);
    let calculated_tax = YearRow::capture(&CALCULATED_TAX, text);
    let deduction_tax = YearRow::capture(&DEDUCTION_TAX, text);
    let determined_tax = YearRow::capture(&DETERMINED_TAX, text);
    let effective_rate = YearRow::capture(&EFFECTIVE_RATE, text);

    let rows = [
        &total_income,
        &income_deduction,
        &taxable_income,
        &tax_rate,
        &calculated_tax,
        &deduction_tax,
        &determined_tax,
        &effective_rate,
    ];
    for (label, row) in ["종합소득금액", "소득공제", "과세표준", "세율", "산출세액", "공제·감면세액", "결정세액", "실효세율"]
        .iter()
        .zip(rows)
    {
        if !row.matched() {
            log::debug!("page 3: row '{label}' not found");
        }
    }

    aligned_years(years, &rows, 3, warnings)
        .into_iter()
        .enumerate()
        .map(|(i, attribution_year)| TaxHistoryYear {
            attribution_year,
            total_income: total_income.amount(i),
            income_deduction: income_deduction.amount(i),
            taxable_income: taxable_income.amount(i),
            tax_rate: tax_rate.at(i).and_then(to_rate),
            calculated_tax: calculated_tax.amount(i),
            deduction_tax: deduction_tax.amount(i),
            determined_tax: determined_tax.amount(i),
            effective_tax_rate: effective_rate.at(i).and_then(to_rate),
        })
        .collect()
}

/// Page 4, upper half: reported income rate of the one business the page
/// covers. Years are every distinct `<year>년` token in order of appearance.
pub fn parse_income_rates(text: &str, warnings: &mut Vec<ParseWarning>) -> Vec<IncomeRateYear> {
    let business_reg_no = capture(&BUSINESS_REG_NO, text).map(str::to_string);
    let business_name = capture(&BUSINESS_NAME, text)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let mut years: Vec<i32> = Vec::new();
    for c in CALENDAR_YEAR.captures_iter(text) {
        if let Some(y) = to_year(&c[1]) {
            if !years.contains(&y) {
                years.push(y);
            }
        }
    }

    let revenue = YearRow::capture(&REVENUE, text);
    let necessary_expenses = YearRow::capture(&NECESSARY_EXPENSES, text);
    let income = YearRow::capture(&INCOME, text);
    let income_rate = YearRow::capture(&INCOME_RATE, text);

    let rows = [&revenue, &necessary_expenses, &income, &income_rate];

    aligned_years(years, &rows, 4, warnings)
        .into_iter()
        .enumerate()
        .map(|(i, attribution_year)| IncomeRateYear {
            business_reg_no: business_reg_no.clone(),
            business_name: business_name.clone(),
            attribution_year,
            revenue: revenue.amount(i),
            necessary_expenses: necessary_expenses.amount(i),
            income: income.amount(i),
            income_rate: income_rate.at(i).and_then(to_rate),
        })
        .collect()
}
