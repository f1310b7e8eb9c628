//! The closed set of voice-assistant platforms.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// A voice-assistant platform.
///
/// Declaration order matters: when the classifier scores two platforms
/// equally, the one declared first wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Alexa,
    Google,
    Cortana,
}

impl Platform {
    /// All platforms, in declaration order.
    pub const ALL: [Platform; 3] = [Platform::Alexa, Platform::Google, Platform::Cortana];

    /// Lowercase platform tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Alexa => "alexa",
            Platform::Google => "google",
            Platform::Cortana => "cortana",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "alexa" => Ok(Platform::Alexa),
            "google" => Ok(Platform::Google),
            "cortana" => Ok(Platform::Cortana),
            other => Err(ValidationError::invalid_format(
                "platform",
                format!("unknown platform '{}'", other),
            )),
        }
    }
}
