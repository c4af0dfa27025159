use std::sync::LazyLock;

use regex::Regex;

use crate::model::PenaltyItem;
use crate::parsing::values::to_int;
use crate::parsing::{capture, pattern};

/// What a penalty probe's capture represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Measure {
    Count,
    Amount,
}

struct PenaltyProbe {
    penalty_type: &'static str,
    detail_type: &'static str,
    measure: Measure,
    re: Regex,
}

static PROBES: LazyLock<Vec<PenaltyProbe>> = LazyLock::new(|| {
    let probe = |penalty_type: &'static str,
                 detail_type: &'static str,
                 measure: Measure,
                 re: &str| PenaltyProbe {
        penalty_type,
        detail_type,
        measure,
        re: pattern(&format!("(?s){re}")),
    };
    vec![
        probe(
            "(세금)계산서관련 보고불성실",
            "미(지연) 제출금액",
            Measure::Amount,
            r"미\(지연\)\s*제출금액\s*([\d,]+)\s*원",
        ),
        probe(
            "현금영수증미발급",
            "미발급 금액",
            Measure::Amount,
            r"미발급\s*금액\s*([\d,]+)\s*원",
        ),
        probe(
            "현금영수증발급거부",
            "10만원 미만",
            Measure::Count,
            r"현금영수증발급거부\s*10만원\s*미만\s*(\d+)\s*건",
        ),
        probe(
            "현금영수증발급거부",
            "10만원 이상",
            Measure::Amount,
            r"10만원미만\s*\d+\s*건\s*10만원이상\s*([\d,]+)\s*원",
        ),
        probe(
            "신용카드발급거부",
            "10만원 미만",
            Measure::Count,
            r"신용카드발급거부\s*10만원\s*미만\s*(\d+)\s*건",
        ),
        probe(
            "신용카드발급거부",
            "10만원 이상",
            Measure::Amount,
            r"신용카드발급거부\s*10만원미만\s*\d+\s*건\s*10만원이상\s*([\d,]+)\s*원",
        ),
        probe(
            "사업장현황신고불성실",
            "무과소신고금액",
            Measure::Amount,
            r"무과소신고금액\s*([\d,]+)\s*원",
        ),
    ]
});

/// Penalty types listed without figures. Their presence alone matters.
pub const FIXED_PENALTY_TYPES: [&str; 3] = [
    "무신고 또는 무기장가산세",
    "현금영수증미가맹",
    "사업용계좌미신고",
];

/// Matched penalty probes from page 2, in probe order. Unmatched probes
/// emit nothing.
pub fn parse_penalties(text: &str) -> Vec<PenaltyItem> {
    PROBES
        .iter()
        .filter_map(|probe| {
            let raw = capture(&probe.re, text)?;
            let value = to_int(raw);
            Some(PenaltyItem {
                penalty_type: probe.penalty_type.to_string(),
                detail_type: Some(probe.detail_type.to_string()),
                count: value.filter(|_| probe.measure == Measure::Count),
                amount: value.filter(|_| probe.measure == Measure::Amount),
            })
        })
        .collect()
}

/// The always-present penalty types, with no detail and no figures.
pub fn fixed_penalties() -> Vec<PenaltyItem> {
    FIXED_PENALTY_TYPES
        .iter()
        .map(|t| PenaltyItem {
            penalty_type: t.to_string(),
            detail_type: None,
            count: None,
            amount: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE2: &str = "\
가산세 항목
(세금)계산서관련 보고불성실 미(지연) 제출금액 1,500,000 원
현금영수증미발급 미발급 금액 230,000 원
현금영수증발급거부 10만원 미만 3 건
10만원이상 0 원
무과소신고금액 0 원
";

    #[test]
    fn test_amount_and_count_probes() {
        let items = parse_penalties(PAGE2);
        let types: Vec<(&str, Option<&str>)> = items
            .iter()
            .map(|p| (p.penalty_type.as_str(), p.detail_type.as_deref()))
            .collect();
        assert_eq!(
            types,
            vec![
                ("(세금)계산서관련 보고불성실", Some("미(지연) 제출금액")),
                ("현금영수증미발급", Some("미발급 금액")),
                ("현금영수증발급거부", Some("10만원 미만")),
                ("사업장현황신고불성실", Some("무과소신고금액")),
            ]
        );
        assert_eq!(items[0].amount, Some(1_500_000));
        assert_eq!(items[0].count, None);
        assert_eq!(items[2].count, Some(3));
        assert_eq!(items[2].amount, None);
        assert_eq!(items[3].amount, Some(0));
    }

    #[test]
    fn test_count_and_amount_are_exclusive() {
        let text = "신용카드발급거부 10만원미만 2 건 10만원이상 450,000 원";
        let items = parse_penalties(text);
        assert!(items.iter().all(|p| !(p.count.is_some() && p.amount.is_some())));
        let over = items
            .iter()
            .find(|p| p.penalty_type == "신용카드발급거부" && p.amount.is_some())
            .unwrap();
        assert_eq!(over.amount, Some(450_000));
        assert_eq!(over.detail_type.as_deref(), Some("10만원 이상"));
    }

    #[test]
    fn test_no_matches_is_empty() {
        assert!(parse_penalties("해당 없음").is_empty());
    }

    #[test]
    fn test_fixed_penalties() {
        let fixed = fixed_penalties();
        assert_eq!(fixed.len(), 3);
        assert!(fixed
            .iter()
            .all(|p| p.detail_type.is_none() && p.count.is_none() && p.amount.is_none()));
    }
}
