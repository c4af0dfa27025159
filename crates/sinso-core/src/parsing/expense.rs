use std::sync::LazyLock;

use regex::Regex;

use crate::model::ExpenseRatioRow;
use crate::parsing::values::{to_int, to_rate, to_year};
use crate::parsing::{capture, pattern};

static ANALYSIS_YEAR: LazyLock<Regex> = LazyLock::new(|| pattern(r"(\d{4})년\s*매출액\s*대비"));

/// `<code>[.] <account name> <amount> <company %> <industry %>`
static ACCOUNT_ROW: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(\d+)[.\s]*([가-힣]+(?:[가-힣\s]+)?)\s+([\-\d,]+)\s+([\d.]+)\s+([\d.]+)")
});

/// Page 4, lower half: selling and administrative expense accounts as a
/// share of revenue, next to the industry average.
pub fn parse_expense_ratios(text: &str) -> Vec<ExpenseRatioRow> {
    let analysis_year = capture(&ANALYSIS_YEAR, text).and_then(to_year);

    let rows: Vec<ExpenseRatioRow> = ACCOUNT_ROW
        .captures_iter(text)
        .map(|caps| ExpenseRatioRow {
            analysis_year,
            account_code: caps[1].to_string(),
            account_name: caps[2].split_whitespace().collect::<Vec<_>>().join(" "),
            amount: to_int(&caps[3]),
            company_rate: to_rate(&caps[4]),
            industry_avg_rate: to_rate(&caps[5]),
        })
        .collect();

    log::debug!("page 4: {} expense account row(s)", rows.len());
    rows
}
