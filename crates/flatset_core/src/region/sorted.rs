//! The sorted flat region: linear lookup and shift insertion.

use crate::error::{CoreError, CoreResult};
use crate::region::header::{FileHeader, FIRST_RECORD_OFFSET, HEADER_SIZE};
use crate::region::record::{self, LENGTH_PREFIX_SIZE};
use crate::region::{compare_bytes, Location, RecordRegion};
use flatset_storage::StorageBackend;
use std::cmp::Ordering;

/// The sorted flat implementation of [`RecordRegion`].
///
/// Records are kept contiguous and in ascending byte order of their
/// payloads. Lookup is a linear scan from the front, short-circuited by
/// the header's cached last word; insertion shifts every byte after the
/// insertion point toward the end of the file, one byte at a time from
/// the tail. Both are O(n) in the file size.
///
/// The in-memory header is authoritative while the region is open; it
/// reaches disk only through [`RecordRegion::persist`].
pub struct SortedRegion {
    backend: Box<dyn StorageBackend>,
    header: FileHeader,
}

impl SortedRegion {
    /// Opens a region over the given backend.
    ///
    /// A zero-sized backend is initialized by appending a zeroed header
    /// (not synced). A non-empty backend must start with a decodable
    /// 8-byte header.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidHeader`] if the backend is non-empty
    /// but too small to hold a header.
    pub fn open(mut backend: Box<dyn StorageBackend>) -> CoreResult<Self> {
        let size = backend.size()?;

        let header = if size == 0 {
            let header = FileHeader::new();
            backend.append(&header.encode())?;
            header
        } else if size < HEADER_SIZE as u64 {
            return Err(CoreError::invalid_header(format!(
                "file too small to hold a header: {size} bytes"
            )));
        } else {
            let data = backend.read_at(0, HEADER_SIZE)?;
            FileHeader::decode(&data)?
        };

        Ok(Self { backend, header })
    }

    /// Returns a copy of the in-memory header.
    #[must_use]
    pub fn header(&self) -> FileHeader {
        self.header
    }

    /// Scans the region from the first record looking for `target`.
    ///
    /// Stops at the first record whose payload is not less than the
    /// target. The loop runs while the cursor stays below the cached
    /// last word; if record lengths carry the cursor past it without a
    /// decision, the insertion point falls back to one past the cached
    /// last payload.
    fn scan_for(&self, target: &[u8]) -> CoreResult<Location> {
        let last_offset = u64::from(self.header.last_offset);
        let mut offset = FIRST_RECORD_OFFSET;

        while offset < last_offset {
            let (payload, encoded_len) = record::read_at(self.backend.as_ref(), offset)?;
            match compare_bytes(target, &payload) {
                Ordering::Equal => return Ok(Location::Found { offset }),
                Ordering::Less => return Ok(Location::Insert { offset }),
                Ordering::Greater => offset += encoded_len,
            }
        }

        Ok(Location::Insert {
            offset: self.header.end_offset(),
        })
    }
}

impl RecordRegion for SortedRegion {
    fn locate(&self, target: &[u8]) -> CoreResult<Location> {
        if self.header.is_empty() {
            return Ok(Location::Empty);
        }

        let last = self.backend.read_at(
            u64::from(self.header.last_offset),
            self.header.last_size as usize,
        )?;

        match compare_bytes(target, &last) {
            Ordering::Equal => Ok(Location::Found {
                offset: u64::from(self.header.last_offset),
            }),
            Ordering::Greater => Ok(Location::Insert {
                offset: self.header.end_offset(),
            }),
            Ordering::Less => self.scan_for(target),
        }
    }

    fn insert(&mut self, offset: u64, payload: &[u8]) -> CoreResult<()> {
        let encoded = record::encode(payload)?;
        let insert_size = encoded.len() as u64;
        let old_size = self.backend.size()?;

        if offset < FIRST_RECORD_OFFSET || offset > old_size {
            return Err(CoreError::invalid_operation(format!(
                "insert offset {offset} outside the records region (file size {old_size})"
            )));
        }

        // Reserve room at the end, then shift [offset, old_size) right by
        // insert_size, copying byte by byte from the tail down.
        self.backend.append(&vec![0u8; encoded.len()])?;

        let mut cursor = old_size;
        while cursor > offset {
            cursor -= 1;
            let byte = self.backend.read_at(cursor, 1)?;
            self.backend.write_at(cursor + insert_size, &byte)?;
        }

        self.backend.write_at(offset, &encoded)?;

        // The cached last word moves with the shift; a true append
        // replaces it outright.
        let (last_offset, last_size) = if offset == old_size {
            (offset + LENGTH_PREFIX_SIZE as u64, payload.len() as u32)
        } else {
            (
                u64::from(self.header.last_offset) + insert_size,
                self.header.last_size,
            )
        };

        self.header.last_offset = u32::try_from(last_offset).map_err(|_| {
            CoreError::invalid_operation("store file exceeds the header's 4 GiB offset range")
        })?;
        self.header.last_size = last_size;

        Ok(())
    }

    fn scan_all(&self) -> CoreResult<Vec<Vec<u8>>> {
        let size = self.backend.size()?;
        let mut payloads = Vec::new();
        let mut offset = FIRST_RECORD_OFFSET;

        while offset < size {
            let (payload, encoded_len) = record::read_at(self.backend.as_ref(), offset)?;
            payloads.push(payload);
            offset += encoded_len;
        }

        Ok(payloads)
    }

    fn sync(&mut self) -> CoreResult<()> {
        self.backend.sync()?;
        Ok(())
    }

    fn persist(&mut self) -> CoreResult<()> {
        self.backend.write_at(0, &self.header.encode())?;
        self.backend.sync()?;
        Ok(())
    }

    fn size(&self) -> CoreResult<u64> {
        Ok(self.backend.size()?)
    }

    fn is_empty(&self) -> bool {
        self.header.is_empty()
    }
}

impl std::fmt::Debug for SortedRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortedRegion")
            .field("header", &self.header)
            .finish_non_exhaustive()
    }
}
