//! Add command implementation.
//!
//! Goes through the `Store` API rather than writing to the file
//! directly, so insertion order, the header cache, and the file lock
//! all behave exactly as they do for library users.

use flatset_core::Store;
use std::path::Path;
use tracing::info;

/// Runs the add command.
pub fn run(path: &Path, words: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    info!("Adding {} words to {:?}", words.len(), path);

    let mut store = Store::open(path)?;

    let mut inserted = 0usize;
    let mut skipped = 0usize;
    for word in words {
        if store.add(word.as_bytes())? {
            inserted += 1;
        } else {
            skipped += 1;
        }
    }

    store.close()?;

    println!("✓ Added {} words ({} already present)", inserted, skipped);

    Ok(())
}
