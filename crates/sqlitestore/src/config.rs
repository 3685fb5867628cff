//! Configuration for the session store.

use std::time::Duration;

/// Default interval between cleanup sweeps.
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Default name of the sessions table.
pub const DEFAULT_TABLE_NAME: &str = "sessions";

/// Configuration for a [`SqliteStore`](crate::SqliteStore).
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Interval between background sweeps of expired rows.
    /// `Duration::ZERO` disables the background task entirely.
    pub cleanup_interval: Duration,

    /// Name of the table holding session rows.
    pub table_name: String,

    /// Create the table and expiry index if they don't exist yet.
    /// Off by default: the schema is normally owned by the application.
    pub create_schema: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
            table_name: DEFAULT_TABLE_NAME.to_string(),
            create_schema: false,
        }
    }
}

impl StoreConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cleanup interval.
    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }

    /// Disable the background cleanup task.
    ///
    /// Expired rows stay invisible to lookups but are only removed by an
    /// explicit [`delete_expired`](crate::SqliteStore::delete_expired).
    pub fn without_cleanup(mut self) -> Self {
        self.cleanup_interval = Duration::ZERO;
        self
    }

    /// Set the sessions table name.
    pub fn with_table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = name.into();
        self
    }

    /// Enable or disable schema creation on construction.
    pub fn with_schema_setup(mut self, enabled: bool) -> Self {
        self.create_schema = enabled;
        self
    }

    /// Whether a background cleanup task should be started.
    pub fn cleanup_enabled(&self) -> bool {
        !self.cleanup_interval.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.cleanup_interval, Duration::from_secs(300));
        assert_eq!(config.table_name, "sessions");
        assert!(!config.create_schema);
        assert!(config.cleanup_enabled());
    }

    #[test]
    fn test_without_cleanup() {
        let config = StoreConfig::new()
            .with_cleanup_interval(Duration::from_secs(10))
            .without_cleanup();
        assert!(!config.cleanup_enabled());
    }
}
