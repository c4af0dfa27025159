use rust_decimal::Decimal;
use sinso_core::calc::analysis::group_thousands;
use sinso_core::rules::builtin;
use sinso_core::rules::schema::{Bracket, TaxTable};
use std::path::Path;

pub fn list() -> Result<(), sinso_core::error::SinsoError> {
    println!("Available predefined bracket tables:\n");
    for name in builtin::PRESETS {
        let table = builtin::load_preset(name)?;
        let default_marker = if *name == builtin::DEFAULT_PRESET {
            " [default]"
        } else {
            ""
        };
        println!(
            "  {:<8} {} (v{}, {} brackets){}",
            name,
            table.name,
            table.version,
            table.brackets.len(),
            default_marker
        );
        if let Some(ref desc) = table.description {
            println!("           {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn explain(preset: &str) -> Result<(), sinso_core::error::SinsoError> {
    let table = builtin::load_preset(preset)?;

    println!("{} (version {})\n", table.name, table.version);

    if let Some(ref desc) = table.description {
        println!("{}\n", desc);
    }

    println!(
        "Attribution year {}. Tax = taxable income x rate - progressive deduction,",
        table.tax_year
    );
    println!("using the first bracket whose upper bound covers the taxable income.\n");

    println!(
        "  {:<22}  {:>6}  {:>16}  {:>16}",
        "Taxable income up to", "Rate", "Deduction", "Tax at bound"
    );
    println!("  {}", "-".repeat(22 + 6 + 16 + 16 + 6));

    for bracket in &table.brackets {
        let bound = match bracket.upper_bound {
            Some(ub) => group_decimal(ub),
            None => "(no limit)".to_string(),
        };
        let tax_at_bound = bracket
            .upper_bound
            .map(|ub| group_decimal(tax_at(bracket, ub)))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<22}  {:>5}%  {:>16}  {:>16}",
            bound,
            (bracket.rate * Decimal::ONE_HUNDRED).normalize(),
            group_decimal(bracket.deduction),
            tax_at_bound
        );
    }

    println!();
    println!(
        "Industry-average income rate used by `sinso analyze`: {}%",
        table.industry_avg_income_rate
    );
    println!("A reported income rate below 80% of it is flagged.\n");

    Ok(())
}

pub fn validate(file: &Path) -> Result<(), sinso_core::error::SinsoError> {
    let table = sinso_core::rules::load_table(file)?;

    println!(
        "Bracket table '{}' (v{}) is valid.",
        table.name, table.version
    );
    println!("  Attribution year: {}", table.tax_year);
    println!("  Brackets: {}", table.brackets.len());

    // Potential issues (warnings, not errors)
    let warnings = continuity_warnings(&table);
    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}

fn tax_at(bracket: &Bracket, taxable: Decimal) -> Decimal {
    (taxable * bracket.rate).trunc() - bracket.deduction
}

/// Adjacent brackets should agree on the tax at their shared bound; a jump
/// usually means a mistyped deduction.
fn continuity_warnings(table: &TaxTable) -> Vec<String> {
    table
        .brackets
        .windows(2)
        .filter_map(|pair| {
            let bound = pair[0].upper_bound?;
            let below = tax_at(&pair[0], bound);
            let above = tax_at(&pair[1], bound);
            (below != above).then(|| {
                format!(
                    "tax at {} is {} in one bracket but {} in the next",
                    group_decimal(bound),
                    group_decimal(below),
                    group_decimal(above)
                )
            })
        })
        .collect()
}

fn group_decimal(value: Decimal) -> String {
    use rust_decimal::prelude::ToPrimitive;
    match value.trunc().to_i64() {
        Some(n) => group_thousands(n),
        None => value.to_string(),
    }
}
