use crate::store::TaxpayerId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One deduction or credit line that went into a total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionDetail {
    pub name: String,
    pub amount: i64,
}

/// How a presentation step combines with the running figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOp {
    #[serde(rename = "")]
    Input,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "=")]
    Equals,
    #[serde(rename = "×")]
    Multiply,
}

impl StepOp {
    pub fn symbol(self) -> &'static str {
        match self {
            StepOp::Input => "",
            StepOp::Subtract => "-",
            StepOp::Equals => "=",
            StepOp::Multiply => "×",
        }
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// A line of the step-by-step breakdown, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub label: String,
    /// `None` for the rate line, which has no amount of its own.
    pub value: Option<i64>,
    pub op: StepOp,
    /// Subtotal lines.
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    /// The amount payable (negative means a refund).
    #[serde(default, rename = "final", skip_serializing_if = "is_false")]
    pub is_final: bool,
}

impl Step {
    pub(crate) fn new(label: impl Into<String>, value: Option<i64>, op: StepOp) -> Self {
        Step {
            label: label.into(),
            value,
            op,
            bold: false,
            is_final: false,
        }
    }

    pub(crate) fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub(crate) fn final_amount(mut self) -> Self {
        self.is_final = true;
        self
    }
}

/// Full progressive tax computation for one taxpayer. Amounts are in won.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub taxpayer_id: TaxpayerId,
    pub revenue: i64,
    /// `기준`, `단순`, or `-` when no business was found.
    pub expense_rate_type: String,
    /// Applied expense rate in percent, one decimal place.
    pub expense_rate: Decimal,
    pub business_income: i64,
    pub income_deduction: i64,
    pub income_deduction_detail: Vec<DeductionDetail>,
    pub taxable_income: i64,
    /// Bracket rate in whole percent.
    pub tax_rate: Decimal,
    pub progressive_deduction: i64,
    pub calculated_tax: i64,
    pub tax_credit: i64,
    pub tax_credit_detail: Vec<DeductionDetail>,
    pub determined_tax: i64,
    pub prepaid_tax: i64,
    /// Positive means payable, negative means a refund.
    pub final_tax: i64,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Danger,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub severity: Severity,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// 0 is low, 1 to 2 medium, 3 and above high.
    pub fn from_score(score: u32) -> Self {
        match score {
            0 => RiskLevel::Low,
            1..=2 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "낮음",
            RiskLevel::Medium => "주의",
            RiskLevel::High => "높음",
        }
    }
}

/// Template-driven risk narrative for one taxpayer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAnalysis {
    pub taxpayer_id: TaxpayerId,
    pub risk_level: RiskLevel,
    pub risk_label: String,
    pub risk_score: u32,
    pub comments: Vec<Comment>,
    pub note: String,
}
