//! Request verification configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::foundation::Platform;

use super::error::ValidationError;

/// Shared-secret verification for self-hosted channels
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerificationConfig {
    /// HMAC key requests are signed with
    #[serde(default)]
    pub secret: Option<SecretString>,

    /// Platforms whose requests must be verified (comma-separated)
    #[serde(default)]
    pub platforms: Option<String>,
}

impl VerificationConfig {
    /// Platforms listed for verification; unknown names are skipped here and
    /// rejected by [`VerificationConfig::validate`].
    pub fn platforms(&self) -> Vec<Platform> {
        self.platform_names()
            .filter_map(|name| name.parse().ok())
            .collect()
    }

    /// Whether any platform requires verification
    pub fn is_enabled(&self) -> bool {
        !self.platforms().is_empty()
    }

    fn platform_names(&self) -> impl Iterator<Item = &str> {
        self.platforms
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Validate verification configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        for name in self.platform_names() {
            if name.parse::<Platform>().is_err() {
                return Err(ValidationError::UnknownPlatform(name.to_string()));
            }
        }
        let has_secret = self
            .secret
            .as_ref()
            .is_some_and(|secret| !secret.expose_secret().is_empty());
        if self.is_enabled() && !has_secret {
            return Err(ValidationError::MissingRequired("VERIFICATION__SECRET"));
        }
        Ok(())
    }
}
