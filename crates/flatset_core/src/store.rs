//! The store façade: open, add, contains, close.

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::region::{Location, RecordRegion, SortedRegion, FIRST_RECORD_OFFSET};
use flatset_storage::{FileBackend, InMemoryBackend, StorageBackend, StorageError};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A persistent sorted set of words.
///
/// A store owns its backing file for as long as it is open: the file is
/// locked exclusively on open and the lock is released by [`close`] or
/// by dropping the store. Words are arbitrary non-empty byte strings,
/// kept on disk in ascending byte order.
///
/// [`close`] persists the header and releases the file; a store that is
/// dropped without closing leaves the on-disk header stale, and a later
/// open sees whatever header was last persisted.
///
/// # Examples
///
/// ```
/// use flatset_core::Store;
///
/// let mut store = Store::open_in_memory()?;
/// assert!(store.add(b"cherry")?);
/// assert!(store.contains(b"cherry")?);
/// assert!(!store.add(b"cherry")?);
/// # Ok::<(), flatset_core::CoreError>(())
/// ```
///
/// [`close`]: Store::close
pub struct Store {
    region: Option<Box<dyn RecordRegion>>,
    config: Config,
    path: Option<PathBuf>,
}

impl Store {
    /// Opens the store at `path` with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::StoreLocked`] if another handle has the
    /// file open, or [`CoreError::InvalidHeader`] if the file exists
    /// but does not start with a decodable header.
    pub fn open(path: impl AsRef<Path>) -> CoreResult<Self> {
        Self::open_with_config(path, Config::default())
    }

    /// Opens the store at `path` with the given configuration.
    pub fn open_with_config(path: impl AsRef<Path>, config: Config) -> CoreResult<Self> {
        let path = path.as_ref();

        if !config.create_if_missing && !path.exists() {
            return Err(CoreError::invalid_operation(format!(
                "store file does not exist: {}",
                path.display()
            )));
        }

        let backend = match FileBackend::open(path) {
            Ok(backend) => backend,
            Err(StorageError::Locked { .. }) => return Err(CoreError::StoreLocked),
            Err(err) => return Err(err.into()),
        };

        let region = SortedRegion::open(Box::new(backend))?;
        debug!("opened store at {:?}", path);

        Ok(Self {
            region: Some(Box::new(region)),
            config,
            path: Some(path.to_path_buf()),
        })
    }

    /// Opens a store over an arbitrary storage backend.
    pub fn open_with_backend(
        backend: Box<dyn StorageBackend>,
        config: Config,
    ) -> CoreResult<Self> {
        let region = SortedRegion::open(backend)?;
        Ok(Self {
            region: Some(Box::new(region)),
            config,
            path: None,
        })
    }

    /// Opens an in-memory store, useful for tests and exploration.
    pub fn open_in_memory() -> CoreResult<Self> {
        Self::open_with_backend(Box::new(InMemoryBackend::new()), Config::default())
    }

    /// Adds a word to the store, keeping the file sorted.
    ///
    /// Returns `true` if the word was inserted and `false` if it was
    /// already present. Insertion shifts every record after the
    /// insertion point, so the cost grows with the bytes stored beyond
    /// that point.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidOperation`] for the empty word: a
    /// zero last-word size in the header is the marker for an empty
    /// store, so an empty word would wedge the store in that state.
    pub fn add(&mut self, word: &[u8]) -> CoreResult<bool> {
        if word.is_empty() {
            return Err(CoreError::invalid_operation(
                "empty words are not supported: a zero last-word size marks an empty store",
            ));
        }

        let sync_on_add = self.config.sync_on_add;
        let region = self.region_mut()?;

        let offset = match region.locate(word)? {
            Location::Found { .. } => return Ok(false),
            Location::Empty => FIRST_RECORD_OFFSET,
            Location::Insert { offset } => offset,
        };

        region.insert(offset, word)?;
        if sync_on_add {
            region.sync()?;
        }

        debug!("added {} byte word at offset {}", word.len(), offset);
        Ok(true)
    }

    /// Returns whether the store contains `word`.
    ///
    /// The empty word is never stored, so it is never contained.
    pub fn contains(&self, word: &[u8]) -> CoreResult<bool> {
        let region = self.region()?;
        Ok(matches!(region.locate(word)?, Location::Found { .. }))
    }

    /// Returns every word in the store, in ascending byte order.
    pub fn words(&self) -> CoreResult<Vec<Vec<u8>>> {
        self.region()?.scan_all()
    }

    /// Returns whether the store holds no words.
    pub fn is_empty(&self) -> CoreResult<bool> {
        Ok(self.region()?.is_empty())
    }

    /// Returns the size of the backing file in bytes.
    pub fn file_size(&self) -> CoreResult<u64> {
        self.region()?.size()
    }

    /// Persists the header and releases the backing file.
    ///
    /// Closing twice is fine; the second call does nothing. Operations
    /// other than `close` fail with [`CoreError::StoreClosed`] after
    /// this.
    pub fn close(&mut self) -> CoreResult<()> {
        if let Some(mut region) = self.region.take() {
            region.persist()?;
            debug!("closed store at {:?}", self.path);
        }
        Ok(())
    }

    /// Returns whether the store is still open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.region.is_some()
    }

    /// Returns the path of the backing file, if the store is file-backed.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the store configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn region(&self) -> CoreResult<&dyn RecordRegion> {
        self.region.as_deref().ok_or(CoreError::StoreClosed)
    }

    fn region_mut(&mut self) -> CoreResult<&mut (dyn RecordRegion + 'static)> {
        self.region.as_deref_mut().ok_or(CoreError::StoreClosed)
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("path", &self.path)
            .field("config", &self.config)
            .field("open", &self.region.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::tempdir;

    fn memory_store() -> Store {
        Store::open_in_memory().unwrap()
    }

    #[test]
    fn empty_store_contains_nothing() {
        let store = memory_store();

        assert!(store.is_empty().unwrap());
        assert!(!store.contains(b"anything").unwrap());
        assert!(store.words().unwrap().is_empty());
        assert_eq!(store.file_size().unwrap(), 8);
    }

    #[test]
    fn add_and_contains() {
        let mut store = memory_store();

        assert!(store.add(b"bbbb").unwrap());
        assert!(store.contains(b"bbbb").unwrap());
        assert!(!store.contains(b"aaaa").unwrap());
        assert!(!store.is_empty().unwrap());
    }

    #[test]
    fn add_duplicate_changes_nothing() {
        let mut store = memory_store();

        assert!(store.add(b"bbbb").unwrap());
        let size_before = store.file_size().unwrap();

        assert!(!store.add(b"bbbb").unwrap());
        assert_eq!(store.file_size().unwrap(), size_before);
        assert_eq!(store.words().unwrap(), vec![b"bbbb".to_vec()]);
    }

    #[test]
    fn add_rejects_empty_word() {
        let mut store = memory_store();

        assert!(matches!(
            store.add(b""),
            Err(CoreError::InvalidOperation { .. })
        ));
        assert!(!store.contains(b"").unwrap());

        // The store stays usable
        assert!(store.add(b"a").unwrap());
        assert!(store.contains(b"a").unwrap());
    }

    #[test]
    fn words_come_back_sorted() {
        let mut store = memory_store();

        for word in [b"pear".as_slice(), b"apple", b"plum", b"banana"] {
            store.add(word).unwrap();
        }

        assert_eq!(
            store.words().unwrap(),
            vec![
                b"apple".to_vec(),
                b"banana".to_vec(),
                b"pear".to_vec(),
                b"plum".to_vec(),
            ]
        );
    }

    #[test]
    fn file_layout_after_single_add() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.db");

        let mut store = Store::open(&path).unwrap();
        store.add(b"bbbb").unwrap();
        store.close().unwrap();

        let data = std::fs::read(&path).unwrap();
        assert_eq!(
            data,
            vec![12, 0, 0, 0, 4, 0, 0, 0, 4, 0, 0, 0, 98, 98, 98, 98]
        );
    }

    #[test]
    fn file_layout_after_out_of_order_adds() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.db");

        let mut store = Store::open(&path).unwrap();
        store.add(b"bbbb").unwrap();
        store.add(b"aaaa").unwrap();
        store.close().unwrap();

        let data = std::fs::read(&path).unwrap();
        let mut expected = vec![20, 0, 0, 0, 4, 0, 0, 0];
        expected.extend_from_slice(&[4, 0, 0, 0]);
        expected.extend_from_slice(b"aaaa");
        expected.extend_from_slice(&[4, 0, 0, 0]);
        expected.extend_from_slice(b"bbbb");
        assert_eq!(data, expected);
    }

    #[test]
    fn close_then_reopen_preserves_words() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.db");

        {
            let mut store = Store::open(&path).unwrap();
            store.add(b"mango").unwrap();
            store.add(b"fig").unwrap();
            store.add(b"quince").unwrap();
            store.close().unwrap();
        }

        let store = Store::open(&path).unwrap();
        assert!(store.contains(b"fig").unwrap());
        assert!(store.contains(b"mango").unwrap());
        assert!(store.contains(b"quince").unwrap());
        assert_eq!(
            store.words().unwrap(),
            vec![b"fig".to_vec(), b"mango".to_vec(), b"quince".to_vec()]
        );
    }

    #[test]
    fn reopen_preserves_many_out_of_order_words() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.db");

        let words: [&[u8]; 12] = [
            b"kiwi", b"apple", b"plum", b"fig", b"banana", b"mango", b"pear", b"cherry",
            b"quince", b"date", b"lime", b"grape",
        ];

        {
            let mut store = Store::open(&path).unwrap();
            for word in words {
                assert!(store.add(word).unwrap());
            }
            store.close().unwrap();
        }

        let store = Store::open(&path).unwrap();
        let mut expected: Vec<Vec<u8>> = words.iter().map(|word| word.to_vec()).collect();
        expected.sort();
        assert_eq!(store.words().unwrap(), expected);

        for word in words {
            assert!(store.contains(word).unwrap());
        }
    }

    #[test]
    fn close_is_idempotent() {
        let mut store = memory_store();
        store.add(b"once").unwrap();

        assert!(store.is_open());
        store.close().unwrap();
        assert!(!store.is_open());
        store.close().unwrap();
    }

    #[test]
    fn operations_after_close_fail() {
        let mut store = memory_store();
        store.close().unwrap();

        assert!(matches!(store.add(b"a"), Err(CoreError::StoreClosed)));
        assert!(matches!(store.contains(b"a"), Err(CoreError::StoreClosed)));
        assert!(matches!(store.words(), Err(CoreError::StoreClosed)));
        assert!(matches!(store.file_size(), Err(CoreError::StoreClosed)));
    }

    #[test]
    fn lock_prevents_second_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.db");

        let _store = Store::open(&path).unwrap();
        assert!(matches!(Store::open(&path), Err(CoreError::StoreLocked)));
    }

    #[test]
    fn lock_released_on_close() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.db");

        let mut store = Store::open(&path).unwrap();
        store.add(b"held").unwrap();
        store.close().unwrap();

        let reopened = Store::open(&path).unwrap();
        assert!(reopened.contains(b"held").unwrap());
    }

    #[test]
    fn open_missing_without_create_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.db");
        let config = Config::new().create_if_missing(false);

        assert!(matches!(
            Store::open_with_config(&path, config),
            Err(CoreError::InvalidOperation { .. })
        ));
    }

    #[test]
    fn open_rejects_corrupt_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.db");
        std::fs::write(&path, [1, 2, 3]).unwrap();

        assert!(matches!(
            Store::open(&path),
            Err(CoreError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn unclosed_store_leaves_stale_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.db");

        {
            let mut store = Store::open(&path).unwrap();
            store.add(b"bbbb").unwrap();
            // Dropped without close: the record is on disk but the
            // header update never was.
        }

        let store = Store::open(&path).unwrap();
        assert_eq!(store.file_size().unwrap(), 16);
        assert!(store.is_empty().unwrap());
        assert!(!store.contains(b"bbbb").unwrap());
    }

    proptest! {
        #[test]
        fn added_words_stay_sorted_and_found(
            words in proptest::collection::vec(
                proptest::collection::vec(any::<u8>(), 1..12),
                1..24,
            )
        ) {
            let mut store = Store::open_in_memory().unwrap();

            for word in &words {
                store.add(word).unwrap();
                let listed = store.words().unwrap();
                let mut sorted = listed.clone();
                sorted.sort();
                prop_assert_eq!(&listed, &sorted);
            }

            let mut expected = words.clone();
            expected.sort();
            expected.dedup();
            prop_assert_eq!(store.words().unwrap(), expected);

            for word in &words {
                prop_assert!(store.contains(word).unwrap());
            }
        }
    }
}
