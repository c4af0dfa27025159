use serde::Serialize;
use sinso_core::error::SinsoError;

pub fn print<T: Serialize>(value: &T) -> Result<(), SinsoError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
