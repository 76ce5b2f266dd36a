//! Contains command implementation.

use flatset_core::{Config, Store};
use serde::Serialize;
use std::path::Path;

/// Lookup result for a single word.
#[derive(Debug, Serialize)]
pub struct ContainsResult {
    /// The word looked up.
    pub word: String,
    /// Whether the store contains it.
    pub found: bool,
}

/// Runs the contains command.
pub fn run(path: &Path, words: &[String], format: &str) -> Result<(), Box<dyn std::error::Error>> {
    // Lookups never create the file; a missing path is an error here.
    let config = Config::new().create_if_missing(false);
    let store = Store::open_with_config(path, config)?;

    let mut results = Vec::with_capacity(words.len());
    for word in words {
        results.push(ContainsResult {
            word: word.clone(),
            found: store.contains(word.as_bytes())?,
        });
    }

    // Read-only; dropping the store releases the lock without
    // rewriting the header.

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        _ => {
            for result in &results {
                println!(
                    "{}: {}",
                    result.word,
                    if result.found { "yes" } else { "no" }
                );
            }
        }
    }

    Ok(())
}
