//! Storage configuration types.

use std::path::PathBuf;

use fundtrack_shared::config::StorageSettings;

/// Where attachment bytes live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageProvider {
    /// Directory on the local filesystem.
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
    /// Process memory. Contents vanish with the operator.
    Memory,
}

impl StorageProvider {
    /// Local filesystem provider.
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Provider name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LocalFs { .. } => "fs",
            Self::Memory => "memory",
        }
    }
}

/// Storage service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Backend.
    pub provider: StorageProvider,
    /// Maximum file size in bytes.
    pub max_file_size: u64,
}

impl StorageConfig {
    /// Default max file size: 20 MiB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 20 * 1024 * 1024;

    /// Configuration with the default size limit.
    #[must_use]
    pub const fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// In-memory storage, for tests and demos.
    #[must_use]
    pub const fn memory() -> Self {
        Self::new(StorageProvider::Memory)
    }

    /// Overrides the size limit.
    #[must_use]
    pub const fn with_max_file_size(mut self, max: u64) -> Self {
        self.max_file_size = max;
        self
    }
}

impl From<&StorageSettings> for StorageConfig {
    fn from(settings: &StorageSettings) -> Self {
        Self::new(StorageProvider::local_fs(&settings.root))
            .with_max_file_size(settings.max_file_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_settings() {
        let settings = StorageSettings {
            root: "/var/lib/fundtrack".to_string(),
            max_file_size: 1024,
        };
        let config = StorageConfig::from(&settings);
        assert_eq!(config.provider, StorageProvider::local_fs("/var/lib/fundtrack"));
        assert_eq!(config.max_file_size, 1024);
        assert_eq!(config.provider.name(), "fs");
    }
}
