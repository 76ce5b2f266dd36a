//! The records region of a store file.
//!
//! A store file is a fixed 8-byte header followed by the records region:
//!
//! ```text
//! | last_offset (4) | last_size (4) | record | record | ... |
//! ```
//!
//! Each record is a 4-byte little-endian length prefix followed by the
//! payload bytes. Records are laid out contiguously with no padding, no
//! checksums and no end marker; the end of the region is implied by the
//! file length. The region holds payloads in ascending byte order, and
//! the header caches where the greatest payload lives so lookups of
//! large values and in-order appends skip the scan.

mod header;
mod record;
mod sorted;

pub use header::{FileHeader, FIRST_RECORD_OFFSET, HEADER_SIZE};
pub use record::{LENGTH_PREFIX_SIZE, MAX_PAYLOAD_SIZE};
pub use sorted::SortedRegion;

use crate::error::CoreResult;
use std::cmp::Ordering;

/// Byte-wise lexicographic comparison of two payloads.
///
/// This is the only ordering the store knows; payloads are compared as
/// raw bytes with no collation or encoding semantics.
#[must_use]
pub fn compare_bytes(a: &[u8], b: &[u8]) -> Ordering {
    a.cmp(b)
}

/// Where a payload lives, or where it belongs, within the records region.
///
/// Returned by [`RecordRegion::locate`]. Replaces the offset/found pair
/// (and its `-1` empty sentinel) with one variant per outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// The region holds no records.
    Empty,

    /// The payload is present.
    Found {
        /// Offset where the match was found. A match against the cached
        /// last word carries the payload offset; a match found by the
        /// scan carries the record offset (its length prefix). Callers
        /// branch on the variant, not on this value.
        offset: u64,
    },

    /// The payload is absent and belongs at this offset.
    Insert {
        /// File offset at which the record must be inserted to keep the
        /// region sorted.
        offset: u64,
    },
}

/// Read and insert interface over the records region.
///
/// The [`Store`](crate::Store) facade talks to the records region only
/// through this trait, so a different layout (a tree, a hash index)
/// could replace the sorted flat region without changing the public
/// store contract.
pub trait RecordRegion: Send + Sync {
    /// Finds a payload, or the offset where it belongs.
    fn locate(&self, target: &[u8]) -> CoreResult<Location>;

    /// Inserts a payload at the given file offset.
    ///
    /// The offset must come from a previous [`RecordRegion::locate`]
    /// call, or be [`FIRST_RECORD_OFFSET`] for an empty region. The
    /// region performs no duplicate check of its own.
    fn insert(&mut self, offset: u64, payload: &[u8]) -> CoreResult<()>;

    /// Returns all payloads in file order.
    fn scan_all(&self) -> CoreResult<Vec<Vec<u8>>>;

    /// Forces written record bytes to durable storage.
    fn sync(&mut self) -> CoreResult<()>;

    /// Persists the region metadata (the header) and syncs.
    fn persist(&mut self) -> CoreResult<()>;

    /// Returns the region size in bytes, header included.
    fn size(&self) -> CoreResult<u64>;

    /// Returns true if the region holds no records.
    fn is_empty(&self) -> bool;
}
