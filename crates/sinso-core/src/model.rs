use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Presence marker printed as `O` / `X` on the notice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flag {
    #[serde(rename = "O")]
    Yes,
    #[serde(rename = "X")]
    #[default]
    No,
}

impl Flag {
    /// Reads a single `O`/`X` glyph, case-insensitive.
    pub fn from_glyph(s: &str) -> Option<Flag> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Flag::from_char(c),
            _ => None,
        }
    }

    pub fn from_char(c: char) -> Option<Flag> {
        match c {
            'O' | 'o' => Some(Flag::Yes),
            'X' | 'x' => Some(Flag::No),
            _ => None,
        }
    }

    pub fn is_yes(self) -> bool {
        self == Flag::Yes
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flag::Yes => write!(f, "O"),
            Flag::No => write!(f, "X"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxpayerSummary {
    pub tax_year: Option<i32>,
    /// Name as printed, usually masked (e.g. "홍*동").
    pub name: Option<String>,
    /// `YY.MM.DD`
    pub birth_date: Option<String>,
    pub guide_type: Option<String>,
    pub bookkeeping_obligation: Option<String>,
    pub estimated_expense_rate: Option<String>,
    pub payment_extension: Option<String>,
    pub ars_auth_number: Option<String>,
    #[serde(default)]
    pub religion_income: Flag,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessEntry {
    /// `NNN-NN-NNNNN`
    pub business_reg_no: String,
    pub business_name: Option<String>,
    pub income_type_code: Option<String>,
    pub industry_code: Option<String>,
    pub business_type: Option<String>,
    pub bookkeeping_obligation: Option<String>,
    /// `기준` or `단순` as printed.
    pub expense_rate_type: Option<String>,
    pub revenue: Option<i64>,
    pub std_expense_rate_general: Option<Decimal>,
    pub std_expense_rate_own: Option<Decimal>,
    pub simple_expense_rate_general: Option<Decimal>,
    pub simple_expense_rate_own: Option<Decimal>,
}

impl BusinessEntry {
    /// VAT-registered businesses carry "부가가치세" in their income type code.
    pub fn is_vat_registered(&self) -> bool {
        self.income_type_code
            .as_deref()
            .is_some_and(|code| code.contains("부가가치세"))
    }
}

/// Categories of the "other income" applicability row, in printed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OtherIncomeKind {
    #[serde(rename = "이자")]
    Interest,
    #[serde(rename = "배당")]
    Dividend,
    #[serde(rename = "근로단일")]
    SingleEmployment,
    #[serde(rename = "근로복수")]
    MultiEmployment,
    #[serde(rename = "연금")]
    Pension,
    #[serde(rename = "기타")]
    Other,
}

impl OtherIncomeKind {
    pub const ALL: [OtherIncomeKind; 6] = [
        OtherIncomeKind::Interest,
        OtherIncomeKind::Dividend,
        OtherIncomeKind::SingleEmployment,
        OtherIncomeKind::MultiEmployment,
        OtherIncomeKind::Pension,
        OtherIncomeKind::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            OtherIncomeKind::Interest => "이자",
            OtherIncomeKind::Dividend => "배당",
            OtherIncomeKind::SingleEmployment => "근로단일",
            OtherIncomeKind::MultiEmployment => "근로복수",
            OtherIncomeKind::Pension => "연금",
            OtherIncomeKind::Other => "기타",
        }
    }
}

impl fmt::Display for OtherIncomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherIncomeFlag {
    pub income_type: OtherIncomeKind,
    pub has_data: Flag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeductionCategory {
    /// Tax already paid during the year.
    #[serde(rename = "기납부세액")]
    Prepaid,
    #[serde(rename = "소득공제")]
    IncomeDeduction,
    #[serde(rename = "세액공제")]
    TaxCredit,
}

impl DeductionCategory {
    pub fn label(self) -> &'static str {
        match self {
            DeductionCategory::Prepaid => "기납부세액",
            DeductionCategory::IncomeDeduction => "소득공제",
            DeductionCategory::TaxCredit => "세액공제",
        }
    }
}

impl fmt::Display for DeductionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The seven deduction lines printed on page 1, in printed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeductionKind {
    InterimPrepayment,
    WithheldServiceIncome,
    NationalPension,
    PersonalPensionSavings,
    SmallBusinessMutualAid,
    RetirementPensionCredit,
    PensionAccountCredit,
}

impl DeductionKind {
    pub const ALL: [DeductionKind; 7] = [
        DeductionKind::InterimPrepayment,
        DeductionKind::WithheldServiceIncome,
        DeductionKind::NationalPension,
        DeductionKind::PersonalPensionSavings,
        DeductionKind::SmallBusinessMutualAid,
        DeductionKind::RetirementPensionCredit,
        DeductionKind::PensionAccountCredit,
    ];

    pub fn category(self) -> DeductionCategory {
        match self {
            DeductionKind::InterimPrepayment | DeductionKind::WithheldServiceIncome => {
                DeductionCategory::Prepaid
            }
            DeductionKind::NationalPension
            | DeductionKind::PersonalPensionSavings
            | DeductionKind::SmallBusinessMutualAid => DeductionCategory::IncomeDeduction,
            DeductionKind::RetirementPensionCredit | DeductionKind::PensionAccountCredit => {
                DeductionCategory::TaxCredit
            }
        }
    }

    pub fn item_name(self) -> &'static str {
        match self {
            DeductionKind::InterimPrepayment => "중간예납세액",
            DeductionKind::WithheldServiceIncome => "원천징수세액(인적용역 사업소득)",
            DeductionKind::NationalPension => "국민연금보험료",
            DeductionKind::PersonalPensionSavings => "개인연금저축",
            DeductionKind::SmallBusinessMutualAid => "소기업소상공인공제부금(노란우산공제)",
            DeductionKind::RetirementPensionCredit => "퇴직연금세액공제",
            DeductionKind::PensionAccountCredit => "연금계좌세액공제",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionItem {
    pub category: DeductionCategory,
    pub item_name: String,
    /// Zero when the line is absent from the notice.
    pub amount: i64,
}

impl DeductionItem {
    pub fn zero(kind: DeductionKind) -> Self {
        DeductionItem {
            category: kind.category(),
            item_name: kind.item_name().to_string(),
            amount: 0,
        }
    }
}

/// A penalty line. At most one of `count` and `amount` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyItem {
    pub penalty_type: String,
    pub detail_type: Option<String>,
    pub count: Option<i64>,
    pub amount: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxHistoryYear {
    pub attribution_year: i32,
    pub total_income: Option<i64>,
    pub income_deduction: Option<i64>,
    pub taxable_income: Option<i64>,
    pub tax_rate: Option<Decimal>,
    pub calculated_tax: Option<i64>,
    pub deduction_tax: Option<i64>,
    pub determined_tax: Option<i64>,
    pub effective_tax_rate: Option<Decimal>,
}

/// Reported income rate of the single business page 4 describes.
/// Monetary values are in thousands of won as printed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeRateYear {
    pub business_reg_no: Option<String>,
    pub business_name: Option<String>,
    pub attribution_year: i32,
    pub revenue: Option<i64>,
    pub necessary_expenses: Option<i64>,
    pub income: Option<i64>,
    pub income_rate: Option<Decimal>,
}

/// Selling and administrative expense ratio of one account, against the industry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRatioRow {
    pub analysis_year: Option<i32>,
    pub account_code: String,
    pub account_name: String,
    pub amount: Option<i64>,
    pub company_rate: Option<Decimal>,
    pub industry_avg_rate: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardCategory {
    #[serde(rename = "합계")]
    Total,
    #[serde(rename = "신변잡화구입")]
    PersonalGoods,
    #[serde(rename = "가정용품구입")]
    HouseholdGoods,
    #[serde(rename = "업무무관업소이용")]
    UnrelatedVenue,
    #[serde(rename = "개인적치료")]
    PersonalMedical,
    #[serde(rename = "해외사용액")]
    Overseas,
}

impl CardCategory {
    pub const ALL: [CardCategory; 6] = [
        CardCategory::Total,
        CardCategory::PersonalGoods,
        CardCategory::HouseholdGoods,
        CardCategory::UnrelatedVenue,
        CardCategory::PersonalMedical,
        CardCategory::Overseas,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CardCategory::Total => "합계",
            CardCategory::PersonalGoods => "신변잡화구입",
            CardCategory::HouseholdGoods => "가정용품구입",
            CardCategory::UnrelatedVenue => "업무무관업소이용",
            CardCategory::PersonalMedical => "개인적치료",
            CardCategory::Overseas => "해외사용액",
        }
    }
}

impl fmt::Display for CardCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardUsageRow {
    pub usage_year: Option<i32>,
    pub category: CardCategory,
    pub count: Option<i64>,
    pub amount: Option<i64>,
}

impl CardUsageRow {
    pub fn empty(category: CardCategory) -> Self {
        CardUsageRow {
            usage_year: None,
            category,
            count: None,
            amount: None,
        }
    }
}

/// Everything extracted from one notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordGraph {
    pub taxpayer: TaxpayerSummary,
    pub businesses: Vec<BusinessEntry>,
    pub other_incomes: Vec<OtherIncomeFlag>,
    pub deductions: Vec<DeductionItem>,
    pub penalty_taxes: Vec<PenaltyItem>,
    pub tax_history: Vec<TaxHistoryYear>,
    pub income_rate_history: Vec<IncomeRateYear>,
    pub sg_expenses: Vec<ExpenseRatioRow>,
    pub credit_card_usage: Vec<CardUsageRow>,
}

impl Default for RecordGraph {
    /// An empty graph still carries every fixed catalog, zero- or null-filled.
    fn default() -> Self {
        RecordGraph {
            taxpayer: TaxpayerSummary::default(),
            businesses: Vec::new(),
            other_incomes: OtherIncomeKind::ALL
                .iter()
                .map(|&income_type| OtherIncomeFlag {
                    income_type,
                    has_data: Flag::No,
                })
                .collect(),
            deductions: DeductionKind::ALL
                .iter()
                .map(|&kind| DeductionItem::zero(kind))
                .collect(),
            penalty_taxes: Vec::new(),
            tax_history: Vec::new(),
            income_rate_history: Vec::new(),
            sg_expenses: Vec::new(),
            credit_card_usage: CardCategory::ALL
                .iter()
                .map(|&category| CardUsageRow::empty(category))
                .collect(),
        }
    }
}

impl RecordGraph {
    pub fn deductions_in(
        &self,
        category: DeductionCategory,
    ) -> impl Iterator<Item = &DeductionItem> + '_ {
        self.deductions
            .iter()
            .filter(move |d| d.category == category)
    }

    pub fn card_usage(&self, category: CardCategory) -> Option<&CardUsageRow> {
        self.credit_card_usage
            .iter()
            .find(|r| r.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_graph_has_fixed_catalogs() {
        let g = RecordGraph::default();
        assert_eq!(g.other_incomes.len(), 6);
        assert_eq!(g.deductions.len(), 7);
        assert_eq!(g.credit_card_usage.len(), 6);
        assert!(g.deductions.iter().all(|d| d.amount == 0));
        assert_eq!(g.credit_card_usage[3].category, CardCategory::UnrelatedVenue);
    }

    #[test]
    fn test_flag_glyphs() {
        assert_eq!(Flag::from_glyph("o"), Some(Flag::Yes));
        assert_eq!(Flag::from_glyph("X"), Some(Flag::No));
        assert_eq!(Flag::from_glyph("-"), None);
    }

    #[test]
    fn test_korean_labels_serialize() {
        let json = serde_json::to_string(&DeductionItem::zero(DeductionKind::NationalPension))
            .unwrap();
        assert!(json.contains("\"소득공제\""));
        assert!(json.contains("국민연금보험료"));
    }

    #[test]
    fn test_vat_registered() {
        let b = BusinessEntry {
            business_reg_no: "123-45-67890".into(),
            income_type_code: Some("40 부가가치세".into()),
            ..Default::default()
        };
        assert!(b.is_vat_registered());
        assert!(!BusinessEntry::default().is_vat_registered());
    }
}
