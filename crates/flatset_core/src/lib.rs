//! # Flatset Core
//!
//! Sorted flat-file set engine for flatset.
//!
//! This crate provides:
//! - A single-file on-disk format: an 8-byte header caching the last
//!   (greatest) word, followed by length-prefixed records in ascending
//!   byte order
//! - Linear lookup and shift-based insertion over a storage backend
//! - The [`Store`] façade: open, add, contains, close
//!
//! ## Design Principles
//!
//! - The file carries no auxiliary index; lookup scans and insertion
//!   shifts, both linear in the file size
//! - The in-memory header is authoritative while a store is open and
//!   reaches disk only on close
//! - Byte-format interpretation lives here; `flatset_storage` backends
//!   stay opaque byte stores
//!
//! ## Example
//!
//! ```rust
//! use flatset_core::Store;
//!
//! let mut store = Store::open_in_memory().unwrap();
//! store.add(b"pear").unwrap();
//! store.add(b"apple").unwrap();
//! assert!(store.contains(b"apple").unwrap());
//! assert_eq!(
//!     store.words().unwrap(),
//!     vec![b"apple".to_vec(), b"pear".to_vec()]
//! );
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod region;
mod store;

pub use config::Config;
pub use error::{CoreError, CoreResult};
pub use region::{
    compare_bytes, FileHeader, Location, RecordRegion, SortedRegion, FIRST_RECORD_OFFSET,
    HEADER_SIZE, LENGTH_PREFIX_SIZE, MAX_PAYLOAD_SIZE,
};
pub use store::Store;

/// The flatset_core crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
