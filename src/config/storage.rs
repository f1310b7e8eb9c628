//! Session store configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Which session store backs the engine
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// No persistence between sessions
    None,
    #[default]
    Memory,
    File,
}

/// Session store configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory for the file backend
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.backend == StorageBackend::File && self.path.is_none() {
            return Err(ValidationError::MissingStoragePath);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_memory() {
        let config = StorageConfig::default();
        assert_eq!(config.backend, StorageBackend::Memory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_backend_requires_path() {
        let mut config = StorageConfig {
            backend: StorageBackend::File,
            path: None,
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingStoragePath)
        ));

        config.path = Some(PathBuf::from("/tmp/parley"));
        assert!(config.validate().is_ok());
    }
}
