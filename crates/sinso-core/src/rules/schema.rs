use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A progressive tax table for one attribution year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxTable {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub tax_year: i32,
    pub version: String,
    /// Industry-average income rate in percent, the baseline the risk
    /// narrative compares a taxpayer's reported income rate against.
    pub industry_avg_income_rate: Decimal,
    /// Ordered by upper bound, lowest first. Only the last one is unbounded.
    pub brackets: Vec<Bracket>,
}

/// One tier: `tax = taxable × rate − deduction` for taxable income up to
/// and including `upper_bound`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    /// Inclusive upper bound in won; `None` for the top bracket.
    pub upper_bound: Option<Decimal>,
    /// Fraction, e.g. `0.15`.
    pub rate: Decimal,
    /// Cumulative progressive deduction in won.
    pub deduction: Decimal,
}

impl TaxTable {
    /// First bracket whose upper bound is at or above `taxable`.
    pub fn bracket_for(&self, taxable: Decimal) -> Option<&Bracket> {
        self.brackets
            .iter()
            .find(|b| b.upper_bound.map_or(true, |ub| taxable <= ub))
    }
}
