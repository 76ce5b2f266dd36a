//! List command implementation.

use flatset_core::{Config, Store};
use std::path::Path;

/// Runs the list command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::new().create_if_missing(false);
    let store = Store::open_with_config(path, config)?;

    let words: Vec<String> = store
        .words()?
        .iter()
        .map(|word| String::from_utf8_lossy(word).into_owned())
        .collect();

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&words)?);
        }
        _ => {
            for word in &words {
                println!("{word}");
            }
        }
    }

    Ok(())
}
