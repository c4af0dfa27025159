use std::sync::LazyLock;

use regex::Regex;

use crate::model::{CardCategory, CardUsageRow};
use crate::parsing::values::{to_int, to_year};
use crate::parsing::{capture, pattern};

static USAGE_YEAR: LazyLock<Regex> = LazyLock::new(|| pattern(r"(\d{4})년\s*사업용\s*신용카드"));
static COUNTS: LazyLock<Regex> = LazyLock::new(|| six_values("건수"));
static AMOUNTS: LazyLock<Regex> = LazyLock::new(|| six_values("금액"));

fn six_values(label: &str) -> Regex {
    let values = [r"([\d,]+)"; 6].join(r"\s+");
    pattern(&format!(r"{label}\s+{values}"))
}

/// One value per card category, or all `None` when the row is missing.
fn row_values(re: &Regex, text: &str) -> [Option<i64>; 6] {
    match re.captures(text) {
        Some(caps) => std::array::from_fn(|i| caps.get(i + 1).and_then(|m| to_int(m.as_str()))),
        None => [None; 6],
    }
}

/// Page 5: business credit card usage, always one row per category.
pub fn parse_card_usage(text: &str) -> Vec<CardUsageRow> {
    let usage_year = capture(&USAGE_YEAR, text).and_then(to_year);
    let counts = row_values(&COUNTS, text);
    let amounts = row_values(&AMOUNTS, text);

    if counts.iter().all(Option::is_none) && amounts.iter().all(Option::is_none) {
        log::debug!("page 5: no card usage figures found");
    }

    CardCategory::ALL
        .iter()
        .zip(counts.into_iter().zip(amounts))
        .map(|(&category, (count, amount))| CardUsageRow {
            usage_year,
            category,
            count,
            amount,
        })
        .collect()
}
