//! Turn engine configuration

use serde::Deserialize;

use crate::domain::foundation::AttributeMap;

use super::error::ValidationError;

/// Settings the engine applies to every turn.
///
/// The same value is handed to each action, so `settings` is the place for
/// application-level options (API endpoints, feature toggles, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Locale used when a payload carries none
    #[serde(default)]
    pub default_locale: Option<String>,

    /// Upper bound on action executions per turn; 0 disables the bound
    #[serde(default = "default_max_transitions")]
    pub max_transitions: usize,

    /// Free-form application settings
    #[serde(default)]
    pub settings: AttributeMap,
}

impl EngineConfig {
    /// Reads a string application setting.
    pub fn setting(&self, key: &str) -> Option<&str> {
        self.settings.get(key).and_then(|v| v.as_str())
    }

    /// Validate engine configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(locale) = &self.default_locale {
            let well_formed = !locale.is_empty()
                && locale
                    .split('-')
                    .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric()));
            if !well_formed {
                return Err(ValidationError::InvalidLocale(locale.clone()));
            }
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_locale: None,
            max_transitions: default_max_transitions(),
            settings: AttributeMap::new(),
        }
    }
}

fn default_max_transitions() -> usize {
    100
}
