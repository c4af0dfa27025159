use std::path::PathBuf;

use crate::commands::load_notice;
use crate::output;

pub fn run(
    input_file: PathBuf,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<(), sinso_core::error::SinsoError> {
    let parsed = load_notice(&input_file)?;

    match output_file {
        Some(path) => {
            // Always write JSON when saving to file
            let json = serde_json::to_string_pretty(&parsed)?;
            std::fs::write(&path, json)?;
            eprintln!(
                "Parsed {} business(es), {} history year(s), written to {}",
                parsed.records.businesses.len(),
                parsed.records.tax_history.len(),
                path.display()
            );
            for w in &parsed.warnings {
                eprintln!("  warning (page {}): {}", w.page_number, w.reason);
            }
        }
        None => match output_format {
            "json" => output::json::print(&parsed)?,
            _ => output::table::print_parsed(&parsed),
        },
    }

    Ok(())
}
