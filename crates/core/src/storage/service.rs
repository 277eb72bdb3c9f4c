//! Storage service implementation using Apache OpenDAL.

use bytes::Bytes;
use opendal::{ErrorKind, Operator, services};

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;

/// Object storage for attachment files.
#[derive(Debug, Clone)]
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        tracing::debug!(provider = config.provider.name(), "storage operator ready");
        Ok(Self { operator, config })
    }

    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        let operator = match provider {
            StorageProvider::LocalFs { root } => {
                let root = root
                    .to_str()
                    .ok_or_else(|| StorageError::configuration("invalid path"))?;
                Operator::new(services::Fs::default().root(root))
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
            StorageProvider::Memory => Operator::new(services::Memory::default())
                .map_err(|e| StorageError::configuration(e.to_string()))?
                .finish(),
        };
        Ok(operator)
    }

    /// Checks an upload size against the configured limit.
    ///
    /// # Errors
    ///
    /// `EmptyFile` or `FileTooLarge`.
    pub fn validate_upload(&self, size: u64) -> Result<(), StorageError> {
        if size == 0 {
            return Err(StorageError::EmptyFile);
        }
        if size > self.config.max_file_size {
            return Err(StorageError::FileTooLarge {
                size,
                max: self.config.max_file_size,
            });
        }
        Ok(())
    }

    /// Writes `data` under `key`, replacing any existing object.
    ///
    /// # Errors
    ///
    /// Size violations or backend failures.
    pub async fn put(&self, key: &str, data: Bytes) -> Result<(), StorageError> {
        self.validate_upload(data.len() as u64)?;
        self.operator.write(key, data).await?;
        tracing::debug!(key, "stored object");
        Ok(())
    }

    /// Reads the whole object at `key`.
    ///
    /// # Errors
    ///
    /// `NotFound` if nothing is stored there.
    pub async fn read(&self, key: &str) -> Result<Bytes, StorageError> {
        let buffer = self.operator.read(key).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::NotFound {
                    key: key.to_string(),
                }
            } else {
                StorageError::from(e)
            }
        })?;
        Ok(buffer.to_bytes())
    }

    /// Delete a file from storage. Deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion fails.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.operator.delete(key).await.map_err(StorageError::from)
    }

    /// Check if a file exists in storage.
    pub async fn exists(&self, key: &str) -> bool {
        match self.operator.stat(key).await {
            Ok(_) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => {
                tracing::warn!(key, error = %e, "stat failed");
                false
            }
        }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &StorageConfig {
        &self.config
    }
}

/// Reduces a file stem to ASCII alphanumerics, `-` and `_`.
///
/// Other characters are dropped; an empty result becomes `file`.
#[must_use]
pub fn sanitize_stem(stem: &str) -> String {
    let cleaned: String = stem
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}
