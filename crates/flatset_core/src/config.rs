//! Store configuration.

/// Configuration for opening a store.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether to create the store file if it doesn't exist.
    pub create_if_missing: bool,

    /// Whether to sync the file after every add (safer but slower).
    pub sync_on_add: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            sync_on_add: true,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to create the store file if missing.
    #[must_use]
    pub const fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Sets whether to sync the file after every add.
    #[must_use]
    pub const fn sync_on_add(mut self, value: bool) -> Self {
        self.sync_on_add = value;
        self
    }
}
