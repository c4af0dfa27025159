pub mod builtin;
pub mod schema;

use crate::error::SinsoError;
use rust_decimal::Decimal;
use schema::TaxTable;
use std::path::Path;

/// Load a bracket table from a JSON file.
pub fn load_table(path: &Path) -> Result<TaxTable, SinsoError> {
    let content = std::fs::read_to_string(path).map_err(|e| SinsoError::TableLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_table(&content, path)
}

/// Parse a bracket table from a JSON string read from `source`.
pub fn parse_table(json: &str, source: &Path) -> Result<TaxTable, SinsoError> {
    let table: TaxTable = serde_json::from_str(json).map_err(|e| SinsoError::TableLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_table(&table)?;
    Ok(table)
}

/// Parse a bracket table from a JSON string (no file path context).
pub fn parse_table_str(json: &str) -> Result<TaxTable, SinsoError> {
    let table: TaxTable = serde_json::from_str(json).map_err(SinsoError::Json)?;
    validate_table(&table)?;
    Ok(table)
}

/// Validate that a bracket table is well-formed.
pub fn validate_table(table: &TaxTable) -> Result<(), SinsoError> {
    if table.name.trim().is_empty() {
        return Err(SinsoError::TableInvalid("name must not be empty".into()));
    }

    if table.brackets.is_empty() {
        return Err(SinsoError::TableInvalid("brackets must not be empty".into()));
    }

    if table.industry_avg_income_rate < Decimal::ZERO {
        return Err(SinsoError::TableInvalid(format!(
            "industry average income rate {} is negative",
            table.industry_avg_income_rate
        )));
    }

    let last = table.brackets.len() - 1;
    let mut previous: Option<Decimal> = None;

    for (i, bracket) in table.brackets.iter().enumerate() {
        let n = i + 1;

        if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
            return Err(SinsoError::TableInvalid(format!(
                "bracket {n} has rate {} outside [0, 1]",
                bracket.rate
            )));
        }

        if bracket.deduction < Decimal::ZERO {
            return Err(SinsoError::TableInvalid(format!(
                "bracket {n} has negative deduction {}",
                bracket.deduction
            )));
        }

        match bracket.upper_bound {
            None if i != last => {
                return Err(SinsoError::TableInvalid(format!(
                    "bracket {n} is unbounded but is not the last bracket"
                )));
            }
            None => {}
            Some(ub) => {
                if i == last {
                    return Err(SinsoError::TableInvalid(
                        "the last bracket must be unbounded (upper_bound: null)".into(),
                    ));
                }
                if ub <= Decimal::ZERO {
                    return Err(SinsoError::TableInvalid(format!(
                        "bracket {n} has non-positive upper bound {ub}"
                    )));
                }
                if let Some(prev) = previous {
                    if ub <= prev {
                        return Err(SinsoError::TableInvalid(format!(
                            "bracket {n} upper bound {ub} does not exceed the previous bound {prev}"
                        )));
                    }
                }
                previous = Some(ub);
            }
        }
    }

    Ok(())
}
