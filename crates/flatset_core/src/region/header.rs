//! File header codec.

use crate::error::{CoreError, CoreResult};

/// Size of the file header in bytes.
pub const HEADER_SIZE: usize = 8;

/// File offset of the first record, immediately after the header.
pub const FIRST_RECORD_OFFSET: u64 = HEADER_SIZE as u64;

/// The fixed header at the start of every store file.
///
/// Layout, little endian:
///
/// ```text
/// | last_offset: u32 | last_size: u32 |
/// ```
///
/// The header caches the **last word**: `last_offset` is the file offset
/// of that word's payload bytes (not of its length prefix) and
/// `last_size` is the payload length. The insertion rules keep the cache
/// pointing at the greatest payload in the file for as long as the
/// header and the records agree. `last_size == 0` marks an empty store;
/// `last_offset` carries no meaning in that state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileHeader {
    /// Offset of the cached last payload's bytes.
    pub last_offset: u32,
    /// Length in bytes of the cached last payload.
    pub last_size: u32,
}

impl FileHeader {
    /// Creates a header for an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_offset: 0,
            last_size: 0,
        }
    }

    /// Returns true if the header marks the store as empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.last_size == 0
    }

    /// Offset one past the end of the cached last payload.
    ///
    /// While the header agrees with the file this equals the file size,
    /// making it the insertion offset for payloads greater than the last
    /// word.
    #[must_use]
    pub const fn end_offset(&self) -> u64 {
        self.last_offset as u64 + self.last_size as u64
    }

    /// Encodes the header into its 8-byte on-disk form.
    #[must_use]
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(&self.last_offset.to_le_bytes());
        buf[4..8].copy_from_slice(&self.last_size.to_le_bytes());
        buf
    }

    /// Decodes a header from its on-disk form.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidHeader`] if `data` is shorter than
    /// [`HEADER_SIZE`].
    pub fn decode(data: &[u8]) -> CoreResult<Self> {
        if data.len() < HEADER_SIZE {
            return Err(CoreError::invalid_header(format!(
                "expected {} bytes, got {}",
                HEADER_SIZE,
                data.len()
            )));
        }

        Ok(Self {
            last_offset: u32::from_le_bytes([data[0], data[1], data[2], data[3]]),
            last_size: u32::from_le_bytes([data[4], data[5], data[6], data[7]]),
        })
    }
}
