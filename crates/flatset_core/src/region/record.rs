//! Record codec for length-prefixed payloads.

use crate::error::{CoreError, CoreResult};
use flatset_storage::StorageBackend;

/// Size of the length prefix preceding every payload.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Maximum payload size representable by the length prefix.
pub const MAX_PAYLOAD_SIZE: usize = u32::MAX as usize;

/// Encodes a payload into its on-disk record form: a 4-byte
/// little-endian length prefix followed by the payload bytes.
///
/// # Errors
///
/// Returns [`CoreError::PayloadTooLarge`] if the payload exceeds
/// [`MAX_PAYLOAD_SIZE`].
pub fn encode(payload: &[u8]) -> CoreResult<Vec<u8>> {
    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(CoreError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD_SIZE,
        });
    }

    let mut buf = Vec::with_capacity(LENGTH_PREFIX_SIZE + payload.len());
    buf.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    buf.extend_from_slice(payload);
    Ok(buf)
}

/// Reads the record at `offset` and returns its payload together with
/// the record's total encoded length (length prefix included).
///
/// # Errors
///
/// Returns [`CoreError::RecordCorruption`] if the length prefix or the
/// payload it announces would extend past the end of the backend.
pub fn read_at(backend: &dyn StorageBackend, offset: u64) -> CoreResult<(Vec<u8>, u64)> {
    let size = backend.size()?;

    if offset + LENGTH_PREFIX_SIZE as u64 > size {
        return Err(CoreError::record_corruption(format!(
            "length prefix at offset {offset} extends past end of file (size {size})"
        )));
    }

    let prefix = backend.read_at(offset, LENGTH_PREFIX_SIZE)?;
    let len = u64::from(u32::from_le_bytes([
        prefix[0], prefix[1], prefix[2], prefix[3],
    ]));

    let payload_offset = offset + LENGTH_PREFIX_SIZE as u64;
    if payload_offset + len > size {
        return Err(CoreError::record_corruption(format!(
            "record at offset {offset} announces {len} payload bytes past end of file (size {size})"
        )));
    }

    let payload = backend.read_at(payload_offset, len as usize)?;
    Ok((payload, LENGTH_PREFIX_SIZE as u64 + len))
}
