//! Store configuration.
//!
//! Configuration is deserialised from JSON or built in code; locating and
//! reading the configuration source is left to the embedding process.

use serde::Deserialize;

/// Database location used for in-memory stores.
pub const IN_MEMORY_DATABASE_URL: &str = ":memory:";

const DEFAULT_MAX_CONNECTIONS: u32 = 4;
const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;

/// Settings for opening the shared SQLite store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    database_url: String,
    #[serde(default = "default_max_connections")]
    max_connections: u32,
    #[serde(default = "default_busy_timeout_ms")]
    busy_timeout_ms: u32,
}

const fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

const fn default_busy_timeout_ms() -> u32 {
    DEFAULT_BUSY_TIMEOUT_MS
}

impl StoreConfig {
    /// Creates a configuration for the database at `database_url` with
    /// default pool settings.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }

    /// Creates a configuration for a private in-memory database.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(IN_MEMORY_DATABASE_URL)
    }

    /// Parses a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when the document is malformed, has
    /// unknown fields, or lacks `database_url`.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Sets the maximum number of pooled connections.
    ///
    /// Zero is raised to one. In-memory databases always use a single
    /// connection regardless of this setting.
    #[must_use]
    pub const fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Sets how long a connection waits on a locked database.
    #[must_use]
    pub const fn with_busy_timeout_ms(mut self, busy_timeout_ms: u32) -> Self {
        self.busy_timeout_ms = busy_timeout_ms;
        self
    }

    /// Returns the database location.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Returns the effective pool size.
    #[must_use]
    pub fn max_connections(&self) -> u32 {
        if self.is_in_memory() {
            1
        } else {
            self.max_connections.max(1)
        }
    }

    /// Returns the busy timeout in milliseconds.
    #[must_use]
    pub const fn busy_timeout_ms(&self) -> u32 {
        self.busy_timeout_ms
    }

    /// Returns `true` when the database lives only in memory.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        let url = self.database_url.trim();
        url == IN_MEMORY_DATABASE_URL || url.starts_with("file::memory:")
    }
}
