use sinso_core::Calculator;
use std::path::PathBuf;

use crate::commands::{select_table, store_notice};
use crate::output;

pub fn run(
    input_file: PathBuf,
    preset: Option<String>,
    table: Option<PathBuf>,
    output_format: &str,
) -> Result<(), sinso_core::error::SinsoError> {
    let calculator = Calculator::new(select_table(preset, table)?);
    let (store, id) = store_notice(&input_file)?;
    let analysis = calculator.analyze(&store, id)?;

    match output_format {
        "json" => output::json::print(&analysis)?,
        _ => output::table::print_analysis(&analysis),
    }

    Ok(())
}
