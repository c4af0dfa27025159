use crate::calc::outcome::{CalculationResult, DeductionDetail, Step, StepOp};
use crate::error::SinsoError;
use crate::model::{BusinessEntry, DeductionCategory, RecordGraph};
use crate::rules::schema::TaxTable;
use crate::store::{TaxpayerId, TaxpayerStore};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Expense-rate regime that selects the simplified rate.
const SIMPLE_REGIME: &str = "단순";
const DEFAULT_REGIME: &str = "기준";
const NO_BUSINESS: &str = "-";

/// Progressive income-tax calculator over persisted record graphs.
#[derive(Debug, Clone)]
pub struct Calculator {
    table: TaxTable,
}

/// Bracket outcome for one taxable income.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BracketTax {
    rate: Decimal,
    deduction: i64,
    tax: i64,
}

impl Calculator {
    pub fn new(table: TaxTable) -> Self {
        Calculator { table }
    }

    pub fn table(&self) -> &TaxTable {
        &self.table
    }

    /// Load one taxpayer from `store` and compute their liability.
    pub fn calculate(
        &self,
        store: &dyn TaxpayerStore,
        id: TaxpayerId,
    ) -> Result<CalculationResult, SinsoError> {
        let stored = store.load(id)?.ok_or(SinsoError::TaxpayerNotFound(id))?;
        Ok(self.compute(id, &stored.records))
    }

    /// Compute the liability of an already loaded record graph.
    pub fn compute(&self, taxpayer_id: TaxpayerId, records: &RecordGraph) -> CalculationResult {
        let (revenue, expense_rate_type, rate) = match primary_business(&records.businesses) {
            Some(b) => {
                let regime = b
                    .expense_rate_type
                    .clone()
                    .unwrap_or_else(|| DEFAULT_REGIME.to_string());
                let rate = if regime == SIMPLE_REGIME {
                    b.simple_expense_rate_general
                } else {
                    b.std_expense_rate_general
                };
                (b.revenue.unwrap_or(0), regime, rate.unwrap_or(Decimal::ZERO))
            }
            None => {
                log::debug!("taxpayer {taxpayer_id}: no business entries");
                (0, NO_BUSINESS.to_string(), Decimal::ZERO)
            }
        };

        let business_income = if revenue == 0 {
            0
        } else {
            let share = Decimal::ONE - rate / Decimal::ONE_HUNDRED;
            product_won(Decimal::from(revenue), share).max(0)
        };

        let (income_deduction, income_deduction_detail) =
            sum_category(records, DeductionCategory::IncomeDeduction);
        let taxable_income = business_income.saturating_sub(income_deduction).max(0);

        let bracket = self.apply_brackets(taxable_income);

        let (tax_credit, tax_credit_detail) = sum_category(records, DeductionCategory::TaxCredit);
        let determined_tax = bracket.tax.saturating_sub(tax_credit).max(0);

        let (prepaid_tax, _) = sum_category(records, DeductionCategory::Prepaid);
        let final_tax = determined_tax.saturating_sub(prepaid_tax);

        let expense_rate = rate.round_dp(1);
        let tax_rate = (bracket.rate * Decimal::ONE_HUNDRED).round();

        log::info!(
            "taxpayer {taxpayer_id}: taxable {taxable_income}, rate {tax_rate}%, determined {determined_tax}, final {final_tax}"
        );

        let steps = vec![
            Step::new("수입금액", Some(revenue), StepOp::Input),
            Step::new(
                format!("(-) 필요경비 ({expense_rate_type}경비율 {expense_rate:.1}%)"),
                Some(revenue.saturating_sub(business_income)),
                StepOp::Subtract,
            ),
            Step::new("= 사업소득금액", Some(business_income), StepOp::Equals).bold(),
            Step::new("(-) 소득공제", Some(income_deduction), StepOp::Subtract),
            Step::new("= 과세표준", Some(taxable_income), StepOp::Equals).bold(),
            Step::new(
                format!("× 세율 ({}%)", (bracket.rate * Decimal::ONE_HUNDRED).trunc()),
                None,
                StepOp::Multiply,
            ),
            Step::new("(-) 누진공제", Some(bracket.deduction), StepOp::Subtract),
            Step::new("= 산출세액", Some(bracket.tax), StepOp::Equals).bold(),
            Step::new("(-) 세액공제", Some(tax_credit), StepOp::Subtract),
            Step::new("= 결정세액", Some(determined_tax), StepOp::Equals).bold(),
            Step::new("(-) 기납부세액", Some(prepaid_tax), StepOp::Subtract),
            Step::new("최종 납부할 세액", Some(final_tax), StepOp::Equals).final_amount(),
        ];

        CalculationResult {
            taxpayer_id,
            revenue,
            expense_rate_type,
            expense_rate,
            business_income,
            income_deduction,
            income_deduction_detail,
            taxable_income,
            tax_rate,
            progressive_deduction: bracket.deduction,
            calculated_tax: bracket.tax,
            tax_credit,
            tax_credit_detail,
            determined_tax,
            prepaid_tax,
            final_tax,
            steps,
        }
    }

    fn apply_brackets(&self, taxable: i64) -> BracketTax {
        let none = BracketTax {
            rate: Decimal::ZERO,
            deduction: 0,
            tax: 0,
        };
        if taxable <= 0 {
            return none;
        }

        let taxable = Decimal::from(taxable);
        let Some(bracket) = self
            .table
            .bracket_for(taxable)
            .or_else(|| self.table.brackets.last())
        else {
            return none;
        };

        let deduction = to_won(bracket.deduction);
        BracketTax {
            rate: bracket.rate,
            deduction,
            tax: product_won(taxable, bracket.rate)
                .saturating_sub(deduction)
                .max(0),
        }
    }
}

/// The business a filing is computed on: the highest-revenue VAT-registered
/// entry, or the highest-revenue entry overall when none is VAT-registered.
/// Missing revenue counts as zero; ties keep the first entry.
pub fn primary_business(businesses: &[BusinessEntry]) -> Option<&BusinessEntry> {
    highest_revenue(businesses.iter().filter(|b| b.is_vat_registered()))
        .or_else(|| highest_revenue(businesses.iter()))
}

fn highest_revenue<'a>(
    entries: impl Iterator<Item = &'a BusinessEntry>,
) -> Option<&'a BusinessEntry> {
    entries.fold(None, |best, b| match best {
        Some(cur) if cur.revenue.unwrap_or(0) >= b.revenue.unwrap_or(0) => Some(cur),
        _ => Some(b),
    })
}

fn sum_category(records: &RecordGraph, category: DeductionCategory) -> (i64, Vec<DeductionDetail>) {
    let detail: Vec<DeductionDetail> = records
        .deductions_in(category)
        .map(|d| DeductionDetail {
            name: d.item_name.clone(),
            amount: d.amount,
        })
        .collect();
    let total = detail.iter().map(|d| d.amount).fold(0i64, i64::saturating_add);
    (total, detail)
}

/// `a × b` in whole won, saturating when the product leaves `Decimal` range.
fn product_won(a: Decimal, b: Decimal) -> i64 {
    match a.checked_mul(b) {
        Some(product) => to_won(product),
        None if a.is_sign_negative() != b.is_sign_negative() => i64::MIN,
        None => i64::MAX,
    }
}

/// Truncate toward zero into whole won, saturating on overflow.
fn to_won(value: Decimal) -> i64 {
    value.trunc().to_i64().unwrap_or(if value.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeductionItem, DeductionKind};
    use crate::rules::builtin::load_preset;
    use crate::store::MemoryStore;
    use rust_decimal_macros::dec;

    fn calculator() -> Calculator {
        Calculator::new(load_preset("2024").unwrap())
    }

    fn business(reg_no: &str, income_type: &str, revenue: Option<i64>) -> BusinessEntry {
        BusinessEntry {
            business_reg_no: reg_no.into(),
            income_type_code: Some(income_type.into()),
            expense_rate_type: Some("기준".into()),
            revenue,
            std_expense_rate_general: Some(dec!(70.0)),
            simple_expense_rate_general: Some(dec!(80.0)),
            ..Default::default()
        }
    }

    fn with_deduction(records: &mut RecordGraph, kind: DeductionKind, amount: i64) {
        let item = records
            .deductions
            .iter_mut()
            .find(|d| d.item_name == kind.item_name())
            .unwrap();
        *item = DeductionItem {
            amount,
            ..DeductionItem::zero(kind)
        };
    }

    #[test]
    fn test_standard_rate_worked_example() {
        let mut records = RecordGraph::default();
        records
            .businesses
            .push(business("123-45-67890", "40 부가가치세", Some(100_000_000)));

        let r = calculator().compute(1, &records);
        assert_eq!(r.revenue, 100_000_000);
        assert_eq!(r.expense_rate_type, "기준");
        assert_eq!(r.expense_rate, dec!(70.0));
        assert_eq!(r.business_income, 30_000_000);
        assert_eq!(r.taxable_income, 30_000_000);
        assert_eq!(r.tax_rate, dec!(15));
        assert_eq!(r.progressive_deduction, 1_260_000);
        assert_eq!(r.calculated_tax, 3_240_000);
        assert_eq!(r.determined_tax, 3_240_000);
        assert_eq!(r.final_tax, 3_240_000);
    }

    #[test]
    fn test_steps_labels_and_flags() {
        let mut records = RecordGraph::default();
        records
            .businesses
            .push(business("123-45-67890", "40 부가가치세", Some(100_000_000)));
        let r = calculator().compute(1, &records);

        let labels: Vec<&str> = r.steps.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "수입금액",
                "(-) 필요경비 (기준경비율 70.0%)",
                "= 사업소득금액",
                "(-) 소득공제",
                "= 과세표준",
                "× 세율 (15%)",
                "(-) 누진공제",
                "= 산출세액",
                "(-) 세액공제",
                "= 결정세액",
                "(-) 기납부세액",
                "최종 납부할 세액",
            ]
        );
        assert_eq!(r.steps[1].value, Some(70_000_000));
        assert_eq!(r.steps[5].value, None);
        assert!(r.steps[2].bold && r.steps[9].bold);
        assert!(r.steps[11].is_final);
        assert_eq!(r.steps.iter().filter(|s| s.is_final).count(), 1);
    }

    #[test]
    fn test_simple_regime_uses_simple_rate() {
        let mut records = RecordGraph::default();
        let mut b = business("123-45-67890", "40 부가가치세", Some(10_000_000));
        b.expense_rate_type = Some("단순".into());
        records.businesses.push(b);

        let r = calculator().compute(1, &records);
        assert_eq!(r.expense_rate, dec!(80.0));
        assert_eq!(r.business_income, 2_000_000);
        assert_eq!(r.tax_rate, dec!(6));
        assert_eq!(r.calculated_tax, 120_000);
    }

    #[test]
    fn test_missing_regime_defaults_to_standard() {
        let mut records = RecordGraph::default();
        let mut b = business("123-45-67890", "40 부가가치세", Some(10_000_000));
        b.expense_rate_type = None;
        records.businesses.push(b);

        let r = calculator().compute(1, &records);
        assert_eq!(r.expense_rate_type, "기준");
        assert_eq!(r.business_income, 3_000_000);
    }

    #[test]
    fn test_no_business_zero_revenue() {
        let r = calculator().compute(1, &RecordGraph::default());
        assert_eq!(r.revenue, 0);
        assert_eq!(r.expense_rate_type, "-");
        assert_eq!(r.taxable_income, 0);
        assert_eq!(r.tax_rate, Decimal::ZERO);
        assert_eq!(r.calculated_tax, 0);
        assert_eq!(r.steps[5].label, "× 세율 (0%)");
    }

    #[test]
    fn test_prepayments_can_produce_refund() {
        let mut records = RecordGraph::default();
        records
            .businesses
            .push(business("123-45-67890", "40 부가가치세", Some(10_000_000)));
        with_deduction(&mut records, DeductionKind::NationalPension, 500_000);
        with_deduction(&mut records, DeductionKind::PensionAccountCredit, 30_000);
        with_deduction(&mut records, DeductionKind::InterimPrepayment, 400_000);

        let r = calculator().compute(1, &records);
        assert_eq!(r.business_income, 3_000_000);
        assert_eq!(r.income_deduction, 500_000);
        assert_eq!(r.income_deduction_detail.len(), 3);
        assert_eq!(r.taxable_income, 2_500_000);
        assert_eq!(r.calculated_tax, 150_000);
        assert_eq!(r.tax_credit, 30_000);
        assert_eq!(r.determined_tax, 120_000);
        assert_eq!(r.prepaid_tax, 400_000);
        assert_eq!(r.final_tax, -280_000);
    }

    #[test]
    fn test_deductions_larger_than_income_floor_at_zero() {
        let mut records = RecordGraph::default();
        records
            .businesses
            .push(business("123-45-67890", "40 부가가치세", Some(1_000_000)));
        with_deduction(&mut records, DeductionKind::SmallBusinessMutualAid, 3_000_000);
        with_deduction(&mut records, DeductionKind::RetirementPensionCredit, 10_000);

        let r = calculator().compute(1, &records);
        assert_eq!(r.taxable_income, 0);
        assert_eq!(r.calculated_tax, 0);
        assert_eq!(r.determined_tax, 0);
    }

    #[test]
    fn test_primary_business_prefers_vat_registered() {
        let businesses = vec![
            business("111-11-11111", "30 면세사업자", Some(900_000_000)),
            business("222-22-22222", "40 부가가치세", Some(5_000_000)),
            business("333-33-33333", "40 부가가치세", Some(7_000_000)),
        ];
        assert_eq!(
            primary_business(&businesses).unwrap().business_reg_no,
            "333-33-33333"
        );
    }

    #[test]
    fn test_primary_business_fallback_and_ties() {
        let businesses = vec![
            business("111-11-11111", "30 면세", None),
            business("222-22-22222", "30 면세", Some(5_000_000)),
            business("333-33-33333", "30 면세", Some(5_000_000)),
        ];
        assert_eq!(
            primary_business(&businesses).unwrap().business_reg_no,
            "222-22-22222"
        );
        assert!(primary_business(&[]).is_none());
    }

    #[test]
    fn test_top_bracket() {
        let mut records = RecordGraph::default();
        let mut b = business("123-45-67890", "40 부가가치세", Some(2_000_000_000));
        b.std_expense_rate_general = Some(dec!(0));
        records.businesses.push(b);

        let r = calculator().compute(1, &records);
        assert_eq!(r.tax_rate, dec!(45));
        assert_eq!(r.calculated_tax, 900_000_000 - 65_940_000);
    }

    #[test]
    fn test_oversized_deductions_saturate() {
        let mut records = RecordGraph::default();
        records
            .businesses
            .push(business("123-45-67890", "40 부가가치세", Some(10_000_000)));
        with_deduction(&mut records, DeductionKind::NationalPension, i64::MAX);
        with_deduction(&mut records, DeductionKind::SmallBusinessMutualAid, 10);
        with_deduction(&mut records, DeductionKind::InterimPrepayment, i64::MAX);
        with_deduction(&mut records, DeductionKind::WithheldServiceIncome, 10);

        let r = calculator().compute(1, &records);
        assert_eq!(r.income_deduction, i64::MAX);
        assert_eq!(r.taxable_income, 0);
        assert_eq!(r.prepaid_tax, i64::MAX);
        assert_eq!(r.final_tax, -i64::MAX);
    }

    #[test]
    fn test_extreme_expense_rate_saturates() {
        let mut records = RecordGraph::default();
        let mut b = business("123-45-67890", "40 부가가치세", Some(1_000_000_000));
        b.std_expense_rate_general = Some(dec!(-10000000000000000000000000));
        records.businesses.push(b);

        let r = calculator().compute(1, &records);
        assert_eq!(r.business_income, i64::MAX);
        assert_eq!(r.steps[1].value, Some(1_000_000_000 - i64::MAX));
        assert_eq!(r.tax_rate, dec!(45));
        assert!(r.calculated_tax > 0);
    }

    #[test]
    fn test_unknown_taxpayer() {
        let store = MemoryStore::new();
        assert!(matches!(
            calculator().calculate(&store, 42),
            Err(SinsoError::TaxpayerNotFound(42))
        ));
    }
}
