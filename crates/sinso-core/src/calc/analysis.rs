use crate::calc::engine::Calculator;
use crate::calc::outcome::{Comment, RiskAnalysis, RiskLevel, Severity};
use crate::error::SinsoError;
use crate::model::{CardCategory, IncomeRateYear, RecordGraph};
use crate::store::{TaxpayerId, TaxpayerStore};
use rust_decimal::Decimal;

/// Share of the industry average below which a reported income rate is low.
const LOW_RATE_FACTOR: Decimal = Decimal::from_parts(8, 0, 0, false, 1);
/// Percentage of card spend at unrelated venues that is flagged.
const UNRELATED_CARD_LIMIT: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

const NOTE: &str = "현재 템플릿 기반 분석입니다. 신고 내역에서 추출한 수치에 정해진 규칙을 적용한 결과이며 세무 자문을 대신하지 않습니다.";

impl Calculator {
    /// Load one taxpayer from `store` and derive the risk narrative.
    pub fn analyze(
        &self,
        store: &dyn TaxpayerStore,
        id: TaxpayerId,
    ) -> Result<RiskAnalysis, SinsoError> {
        let stored = store.load(id)?.ok_or(SinsoError::TaxpayerNotFound(id))?;
        Ok(self.assess(id, &stored.records))
    }

    /// Risk narrative of an already loaded record graph.
    pub fn assess(&self, taxpayer_id: TaxpayerId, records: &RecordGraph) -> RiskAnalysis {
        let mut narrative = Narrative::default();

        self.income_rate_comments(records, &mut narrative);
        card_usage_comments(records, &mut narrative);
        deduction_comments(records, &mut narrative);

        let risk_level = RiskLevel::from_score(narrative.score);
        log::info!(
            "taxpayer {taxpayer_id}: risk score {} ({:?}), {} comment(s)",
            narrative.score,
            risk_level,
            narrative.comments.len()
        );

        RiskAnalysis {
            taxpayer_id,
            risk_level,
            risk_label: risk_level.label().to_string(),
            risk_score: narrative.score,
            comments: narrative.comments,
            note: NOTE.to_string(),
        }
    }

    fn income_rate_comments(&self, records: &RecordGraph, out: &mut Narrative) {
        let mut years: Vec<&IncomeRateYear> = records.income_rate_history.iter().collect();
        if years.is_empty() {
            return;
        }
        // Latest first; equal years keep source order.
        years.sort_by(|a, b| b.attribution_year.cmp(&a.attribution_year));

        let latest = years[0];
        let year = latest.attribution_year;
        let rate = latest.income_rate.unwrap_or(Decimal::ZERO);
        let average = self.table().industry_avg_income_rate;

        if rate < Decimal::ZERO {
            out.push(
                3,
                Severity::Danger,
                "소득금액 음수",
                format!(
                    "{year}년 신고소득률이 {rate:.2}%로 마이너스입니다. 필요경비가 과다하게 신고되었을 수 있어 세무조사 대상이 될 수 있습니다."
                ),
            );
        } else if rate < average * LOW_RATE_FACTOR {
            out.push(
                2,
                Severity::Warning,
                "소득률 저조",
                format!(
                    "{year}년 신고소득률 {rate:.2}%는 업종평균({average}%)의 80%에 못 미칩니다. 사업과 관련 없는 지출이 필요경비에 포함되지 않았는지 검토가 필요합니다."
                ),
            );
        } else {
            out.push(
                0,
                Severity::Success,
                "소득률 양호",
                format!("{year}년 신고소득률 {rate:.2}%로 업종평균 수준을 유지하고 있습니다."),
            );
        }

        if let Some(previous) = years.get(1) {
            let change = latest
                .revenue
                .unwrap_or(0)
                .saturating_sub(previous.revenue.unwrap_or(0));
            if change > 0 {
                out.push(
                    0,
                    Severity::Info,
                    "매출 증가 추세",
                    format!(
                        "전년 대비 수입금액이 {}천원 증가했습니다. 수입금액 증가에 따른 세부담 변화를 확인하세요.",
                        group_thousands(change)
                    ),
                );
            }
        }
    }
}

#[derive(Debug, Default)]
struct Narrative {
    score: u32,
    comments: Vec<Comment>,
}

impl Narrative {
    fn push(&mut self, points: u32, severity: Severity, title: &str, body: String) {
        log::debug!("risk comment [{severity}] {title} (+{points})");
        self.score += points;
        self.comments.push(Comment {
            severity,
            title: title.to_string(),
            body,
        });
    }
}

fn card_usage_comments(records: &RecordGraph, out: &mut Narrative) {
    let amount = |category| {
        records
            .card_usage(category)
            .and_then(|r| r.amount)
            .unwrap_or(0)
    };

    let total = amount(CardCategory::Total);
    if total <= 0 {
        return;
    }

    let unrelated = amount(CardCategory::UnrelatedVenue);
    let share = Decimal::from(unrelated) * Decimal::ONE_HUNDRED / Decimal::from(total);
    if share > UNRELATED_CARD_LIMIT {
        out.push(
            2,
            Severity::Warning,
            "업무무관 신용카드 사용 과다",
            format!(
                "사업용 신용카드 사용액 중 업무무관 업소 이용 비율이 {share:.1}%입니다. 해당 금액({}원)은 필요경비로 인정받기 어렵습니다.",
                group_thousands(unrelated)
            ),
        );
    }

    let medical = amount(CardCategory::PersonalMedical);
    if medical > 0 {
        out.push(
            0,
            Severity::Info,
            "개인적 치료비 사용",
            format!(
                "개인적 치료비 {}원이 사업용 카드로 결제되었습니다. 필요경비가 아닌 의료비 세액공제 항목으로 분류하여 신고하세요.",
                group_thousands(medical)
            ),
        );
    }
}

fn deduction_comments(records: &RecordGraph, out: &mut Narrative) {
    let pension = first_amount(records, |name| name.contains("국민연금"));
    let mutual_aid = first_amount(records, |name| {
        name.contains("노란우산") || name.contains("소기업")
    });

    if pension > 0 {
        out.push(
            0,
            Severity::Success,
            "국민연금 공제 적용",
            format!(
                "국민연금보험료 {}원 전액이 소득공제로 적용됩니다.",
                group_thousands(pension)
            ),
        );
    }
    if mutual_aid > 0 {
        out.push(
            0,
            Severity::Success,
            "노란우산공제 적용",
            format!(
                "소기업소상공인공제부금(노란우산공제) {}원이 소득공제에 반영됩니다. 사업소득금액 1억원 이하는 연 300만원까지 공제됩니다.",
                group_thousands(mutual_aid)
            ),
        );
    }
}

/// Amount of the first deduction line whose name matches, 0 when none does.
fn first_amount(records: &RecordGraph, matches: impl Fn(&str) -> bool) -> i64 {
    records
        .deductions
        .iter()
        .find(|d| matches(&d.item_name))
        .map_or(0, |d| d.amount)
}

/// `1234567` -> `1,234,567`
pub fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
