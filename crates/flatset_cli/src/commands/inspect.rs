//! Inspect command implementation.
//!
//! Reads the store file directly through a storage backend instead of
//! the `Store` API, so a file with a stale or damaged header can still
//! be examined.

use flatset_core::{FileHeader, FIRST_RECORD_OFFSET, HEADER_SIZE, LENGTH_PREFIX_SIZE};
use flatset_storage::{FileBackend, StorageBackend};
use serde::Serialize;
use std::path::Path;

/// Store inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Store path.
    pub path: String,
    /// File size in bytes.
    pub file_size: u64,
    /// Offset of the last (greatest) word's payload, per the header.
    pub last_offset: u32,
    /// Size of the last word's payload, per the header.
    pub last_size: u32,
    /// Whether the header marks the store empty.
    pub empty: bool,
    /// Number of records found by walking the file.
    pub record_count: usize,
    /// Per-record details (if requested).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<RecordInfo>>,
}

/// Details for a single record.
#[derive(Debug, Serialize)]
pub struct RecordInfo {
    /// Offset of the record's length prefix.
    pub offset: u64,
    /// Payload size in bytes.
    pub size: usize,
    /// The payload, lossily decoded as UTF-8 for display.
    pub word: String,
}

/// Runs the inspect command.
pub fn run(path: &Path, show_records: bool, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("No store found at {:?}", path).into());
    }

    let backend = FileBackend::open(path)?;
    let size = backend.size()?;

    if size < HEADER_SIZE as u64 {
        return Err(format!("File too small to hold a header: {} bytes", size).into());
    }

    let header = FileHeader::decode(&backend.read_at(0, HEADER_SIZE)?)?;
    let records = walk_records(&backend, size)?;

    let mut result = InspectResult {
        path: path.display().to_string(),
        file_size: size,
        last_offset: header.last_offset,
        last_size: header.last_size,
        empty: header.is_empty(),
        record_count: records.len(),
        records: None,
    };
    if show_records {
        result.records = Some(records);
    }

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

fn walk_records(
    backend: &dyn StorageBackend,
    size: u64,
) -> Result<Vec<RecordInfo>, Box<dyn std::error::Error>> {
    let mut records = Vec::new();
    let mut offset = FIRST_RECORD_OFFSET;

    while offset + LENGTH_PREFIX_SIZE as u64 <= size {
        let len_bytes = backend.read_at(offset, LENGTH_PREFIX_SIZE)?;
        let len = u32::from_le_bytes([len_bytes[0], len_bytes[1], len_bytes[2], len_bytes[3]]);

        let payload_offset = offset + LENGTH_PREFIX_SIZE as u64;
        if payload_offset + u64::from(len) > size {
            // Truncated tail; report what was walked
            break;
        }

        let payload = backend.read_at(payload_offset, len as usize)?;
        records.push(RecordInfo {
            offset,
            size: payload.len(),
            word: String::from_utf8_lossy(&payload).into_owned(),
        });

        offset = payload_offset + u64::from(len);
    }

    Ok(records)
}

fn print_text_output(result: &InspectResult) {
    println!("Flatset Store Inspection");
    println!("========================");
    println!();
    println!("Path: {}", result.path);
    println!();
    println!("Header:");
    println!("  Last offset: {}", result.last_offset);
    println!("  Last size:   {}", result.last_size);
    println!(
        "  State:       {}",
        if result.empty { "empty" } else { "populated" }
    );
    println!();
    println!("Storage:");
    println!("  File size: {}", format_size(result.file_size));
    println!("  Records:   {}", result.record_count);

    if let Some(records) = &result.records {
        println!();
        println!("Records:");
        for record in records {
            println!(
                "  [{}] {} bytes: {}",
                record.offset, record.size, record.word
            );
        }
    }
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} bytes", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
