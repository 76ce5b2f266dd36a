//! Verify command implementation.

use flatset_core::{compare_bytes, FileHeader, FIRST_RECORD_OFFSET, HEADER_SIZE, LENGTH_PREFIX_SIZE};
use flatset_storage::{FileBackend, StorageBackend};
use std::cmp::Ordering;
use std::path::Path;

/// Verification result.
#[derive(Debug)]
pub struct VerifyResult {
    /// Number of records checked.
    pub records_checked: usize,
    /// Number of valid records.
    pub valid_records: usize,
    /// Number of corrupt records.
    pub corrupt_records: usize,
    /// List of errors found.
    pub errors: Vec<String>,
}

impl VerifyResult {
    fn new() -> Self {
        Self {
            records_checked: 0,
            valid_records: 0,
            corrupt_records: 0,
            errors: Vec::new(),
        }
    }

    fn is_ok(&self) -> bool {
        self.corrupt_records == 0 && self.errors.is_empty()
    }
}

/// Runs the verify command.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("Verifying store at {:?}", path);
    println!();

    if !path.exists() {
        return Err(format!("No store found at {:?}", path).into());
    }

    let backend = FileBackend::open(path)?;
    let size = backend.size()?;

    println!("Checking header...");
    if size < HEADER_SIZE as u64 {
        println!("✗ File too small to hold a header: {} bytes", size);
        return Err("Verification failed".into());
    }
    let header = FileHeader::decode(&backend.read_at(0, HEADER_SIZE)?)?;

    println!("Checking records...");
    let result = verify_records(&backend, header)?;
    print_result(&result);

    println!();
    if result.is_ok() {
        println!("✓ Store verification passed");
        Ok(())
    } else {
        println!("✗ Store verification failed");
        Err("Verification failed".into())
    }
}

fn verify_records(
    backend: &dyn StorageBackend,
    header: FileHeader,
) -> Result<VerifyResult, Box<dyn std::error::Error>> {
    let mut result = VerifyResult::new();
    let size = backend.size()?;
    let mut offset = FIRST_RECORD_OFFSET;
    let mut previous: Option<Vec<u8>> = None;
    let mut last_payload_offset = 0u64;
    let mut last_payload_size = 0u32;

    while offset < size {
        result.records_checked += 1;

        if offset + LENGTH_PREFIX_SIZE as u64 > size {
            result
                .errors
                .push(format!("Truncated length prefix at offset {}", offset));
            result.corrupt_records += 1;
            break;
        }

        // Read length
        let len_bytes = match backend.read_at(offset, LENGTH_PREFIX_SIZE) {
            Ok(b) => b,
            Err(e) => {
                result
                    .errors
                    .push(format!("Failed to read length at {}: {}", offset, e));
                result.corrupt_records += 1;
                break;
            }
        };
        let len = u32::from_le_bytes([len_bytes[0], len_bytes[1], len_bytes[2], len_bytes[3]]);

        if len == 0 {
            result
                .errors
                .push(format!("Zero-length record at offset {}", offset));
            result.corrupt_records += 1;
            break;
        }

        let payload_offset = offset + LENGTH_PREFIX_SIZE as u64;
        if payload_offset + u64::from(len) > size {
            result.errors.push(format!(
                "Truncated record at offset {}: needs {} bytes, only {} available",
                offset,
                LENGTH_PREFIX_SIZE as u64 + u64::from(len),
                size - offset
            ));
            result.corrupt_records += 1;
            break;
        }

        let payload = backend.read_at(payload_offset, len as usize)?;

        // Words must be strictly ascending; equality is a duplicate
        match previous.as_deref().map(|prev| compare_bytes(prev, &payload)) {
            Some(Ordering::Equal) => {
                result
                    .errors
                    .push(format!("Duplicate word at offset {}", offset));
                result.corrupt_records += 1;
            }
            Some(Ordering::Greater) => {
                result
                    .errors
                    .push(format!("Out-of-order word at offset {}", offset));
                result.corrupt_records += 1;
            }
            _ => {
                result.valid_records += 1;
            }
        }

        previous = Some(payload);
        last_payload_offset = payload_offset;
        last_payload_size = len;
        offset = payload_offset + u64::from(len);
    }

    // The header's cached last word must agree with the walk
    if result.records_checked == 0 {
        if !header.is_empty() {
            result.errors.push(format!(
                "Header names a last word at offset {} but the file has no records",
                header.last_offset
            ));
        }
    } else if header.is_empty() {
        result.errors.push(format!(
            "Header marks the store empty but the file holds {} records",
            result.records_checked
        ));
    } else if u64::from(header.last_offset) != last_payload_offset
        || header.last_size != last_payload_size
    {
        result.errors.push(format!(
            "Header out of sync: cached last word at offset {} size {}, walk ended at offset {} size {}",
            header.last_offset, header.last_size, last_payload_offset, last_payload_size
        ));
    }

    Ok(result)
}

fn print_result(result: &VerifyResult) {
    println!(
        "  Records checked: {}, valid: {}, corrupt: {}",
        result.records_checked, result.valid_records, result.corrupt_records
    );
    for error in &result.errors {
        println!("    ERROR: {}", error);
    }
}
