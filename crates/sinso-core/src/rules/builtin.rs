use crate::error::SinsoError;
use crate::rules::schema::TaxTable;
use crate::rules::validate_table;

const BRACKETS_2024_JSON: &str = include_str!("../../../../rules/brackets-2024.json");

/// Available predefined bracket tables, by attribution year.
pub const PRESETS: &[&str] = &["2024"];

/// Preset used when none is named.
pub const DEFAULT_PRESET: &str = "2024";

/// Load a predefined bracket table by name.
pub fn load_preset(name: &str) -> Result<TaxTable, SinsoError> {
    let json = match name {
        "2024" => BRACKETS_2024_JSON,
        _ => {
            return Err(SinsoError::TableInvalid(format!(
                "unknown preset '{}'. Available: {}",
                name,
                PRESETS.join(", ")
            )))
        }
    };
    let table: TaxTable = serde_json::from_str(json)?;
    validate_table(&table)?;
    Ok(table)
}
