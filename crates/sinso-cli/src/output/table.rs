use sinso_core::calc::analysis::group_thousands;
use sinso_core::calc::{CalculationResult, RiskAnalysis, StepOp};
use sinso_core::model::{DeductionCategory, Flag};
use sinso_core::rules::schema::TaxTable;
use sinso_core::ParsedDocument;
use std::fmt::Display;

fn or_dash<T: Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}

fn amount(value: Option<i64>) -> String {
    value.map(group_thousands).unwrap_or_else(|| "-".to_string())
}

pub fn print_parsed(parsed: &ParsedDocument) {
    let g = &parsed.records;
    let t = &g.taxpayer;

    println!("=== 납세자 ===\n");
    println!("  귀속연도        {}", or_dash(&t.tax_year));
    println!("  성명            {}", or_dash(&t.name));
    println!("  생년월일        {}", or_dash(&t.birth_date));
    println!("  안내유형        {}", or_dash(&t.guide_type));
    println!("  기장의무        {}", or_dash(&t.bookkeeping_obligation));
    println!("  추계시 경비율   {}", or_dash(&t.estimated_expense_rate));
    println!("  납부기한 연장   {}", or_dash(&t.payment_extension));
    println!("  ARS 인증번호    {}", or_dash(&t.ars_auth_number));
    println!("  종교인 소득     {}", t.religion_income);
    println!();

    println!("=== 사업장 ({}) ===\n", g.businesses.len());
    for b in &g.businesses {
        println!(
            "  {}  {}  [{}]  수입금액 {}  {}경비율 일반 {}% / 자가 {}%",
            b.business_reg_no,
            or_dash(&b.business_name),
            or_dash(&b.income_type_code),
            amount(b.revenue),
            b.expense_rate_type.as_deref().unwrap_or("기준"),
            if b.expense_rate_type.as_deref() == Some("단순") {
                or_dash(&b.simple_expense_rate_general)
            } else {
                or_dash(&b.std_expense_rate_general)
            },
            if b.expense_rate_type.as_deref() == Some("단순") {
                or_dash(&b.simple_expense_rate_own)
            } else {
                or_dash(&b.std_expense_rate_own)
            },
        );
    }
    println!();

    let flags: Vec<String> = g
        .other_incomes
        .iter()
        .map(|f| format!("{} {}", f.income_type, f.has_data))
        .collect();
    println!("=== 타소득 ===\n");
    println!("  {}\n", flags.join("  "));

    println!("=== 공제 ===\n");
    for category in [
        DeductionCategory::Prepaid,
        DeductionCategory::IncomeDeduction,
        DeductionCategory::TaxCredit,
    ] {
        for d in g.deductions_in(category) {
            println!(
                "  {:<8} {:<36} {:>14}",
                category.label(),
                d.item_name,
                group_thousands(d.amount)
            );
        }
    }
    println!();

    println!("=== 가산세 ===\n");
    for p in &g.penalty_taxes {
        let figure = match (p.count, p.amount) {
            (Some(c), _) => format!("{c}건"),
            (_, Some(a)) => format!("{}원", group_thousands(a)),
            _ => "-".to_string(),
        };
        println!(
            "  {}  {}  {}",
            p.penalty_type,
            p.detail_type.as_deref().unwrap_or(""),
            figure
        );
    }
    println!();

    if !g.tax_history.is_empty() {
        println!("=== 신고상황 (천원) ===\n");
        for h in &g.tax_history {
            println!(
                "  {}귀속  종합소득 {}  과세표준 {}  결정세액 {}  실효세율 {}%",
                h.attribution_year,
                amount(h.total_income),
                amount(h.taxable_income),
                amount(h.determined_tax),
                or_dash(&h.effective_tax_rate)
            );
        }
        println!();
    }

    if !g.income_rate_history.is_empty() {
        println!("=== 신고소득률 (천원) ===\n");
        for r in &g.income_rate_history {
            println!(
                "  {}년  수입금액 {}  필요경비 {}  소득금액 {}  소득률 {}%",
                r.attribution_year,
                amount(r.revenue),
                amount(r.necessary_expenses),
                amount(r.income),
                or_dash(&r.income_rate)
            );
        }
        println!();
    }

    if !g.sg_expenses.is_empty() {
        println!("=== 판매비와 관리비 ===\n");
        for e in &g.sg_expenses {
            println!(
                "  {} {:<12} {:>12}  당해 {}%  업종평균 {}%",
                e.account_code,
                e.account_name,
                amount(e.amount),
                or_dash(&e.company_rate),
                or_dash(&e.industry_avg_rate)
            );
        }
        println!();
    }

    println!("=== 사업용 신용카드 ===\n");
    for c in &g.credit_card_usage {
        println!(
            "  {:<10} {:>6}건 {:>14}원",
            c.category.label(),
            amount(c.count),
            amount(c.amount)
        );
    }
    println!();

    if !parsed.warnings.is_empty() {
        println!("Warnings:");
        for w in &parsed.warnings {
            println!("  - page {}: {}", w.page_number, w.reason);
        }
    }

    if g.other_incomes.iter().all(|f| f.has_data == Flag::No) && g.businesses.is_empty() {
        println!("No notice content recognised. Is this a 종합소득세 신고도움서비스 notice?");
    }
}

pub fn print_calculation(result: &CalculationResult, table: &TaxTable) {
    println!("=== {} (v{}) ===\n", table.name, table.version);

    for step in &result.steps {
        let value = match step.value {
            Some(v) => format!("{}원", group_thousands(v)),
            None => String::new(),
        };
        let marker = if step.is_final {
            "  <=="
        } else if step.bold {
            " *"
        } else {
            ""
        };
        let indent = if step.op == StepOp::Equals || step.op == StepOp::Input {
            "  "
        } else {
            "    "
        };
        println!("{indent}{:<36} {:>18}{marker}", step.label, value);
    }
    println!();

    if result.final_tax < 0 {
        println!(
            "  환급 예상액: {}원\n",
            group_thousands(result.final_tax.saturating_neg())
        );
    }

    for (title, detail) in [
        ("소득공제", &result.income_deduction_detail),
        ("세액공제", &result.tax_credit_detail),
    ] {
        let nonzero: Vec<_> = detail.iter().filter(|d| d.amount != 0).collect();
        if nonzero.is_empty() {
            continue;
        }
        println!("  {title}:");
        for d in nonzero {
            println!("    {:<36} {:>14}원", d.name, group_thousands(d.amount));
        }
        println!();
    }
}

pub fn print_analysis(analysis: &RiskAnalysis) {
    println!(
        "=== 위험도: {} (score {}) ===\n",
        analysis.risk_label, analysis.risk_score
    );

    for c in &analysis.comments {
        println!("  [{}] {}", c.severity, c.title);
        println!("    {}", c.body);
        println!();
    }

    println!("  {}", analysis.note);
}
