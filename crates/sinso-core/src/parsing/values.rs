use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse an amount string from the notice into whole won.
///
/// Handles formats like:
/// - "1,234,000" -> 1234000
/// - "1,234,000원" -> 1234000
/// - "-12,500" -> -12500
/// - "12.9%" -> 12 (truncated toward zero)
/// - "", "원", ",," -> None
pub fn to_int(s: &str) -> Option<i64> {
    let cleaned: String = s
        .chars()
        .map(halfwidth)
        .filter(|&c| c != ',' && c != '원' && !c.is_whitespace())
        .collect();
    let cleaned = cleaned.strip_suffix('%').unwrap_or(&cleaned);
    parse_decimal(cleaned)?.trunc().to_i64()
}

/// Parse a rate string ("70.0", "5.84%", "-3.2 %") into a percentage value.
pub fn to_rate(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .map(halfwidth)
        .filter(|&c| c != ',' && c != '원' && c != '%' && !c.is_whitespace())
        .collect();
    parse_decimal(&cleaned)
}

/// Parse a year token such as "2024".
pub fn to_year(s: &str) -> Option<i32> {
    s.trim().chars().map(halfwidth).collect::<String>().parse().ok()
}

/// Fold full-width digits and number punctuation (`０`-`９`, `，．－％`) to ASCII.
/// The label patterns match them through Unicode `\d`.
fn halfwidth(c: char) -> char {
    match c {
        '０'..='９' | '，' | '．' | '－' | '％' => {
            char::from_u32(c as u32 - 0xFEE0).unwrap_or(c)
        }
        _ => c,
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s).ok()
}
