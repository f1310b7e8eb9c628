//! Non-speech response instructions: cards and audio playback control.

use serde::{Deserialize, Serialize};

/// A structured, non-speech instruction attached to a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "options", rename_all = "lowercase")]
pub enum Directive {
    Card(Card),
    Audio(AudioOptions),
}

/// A visual card shown on devices with a screen or companion app.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Card {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large_image_url: Option<String>,
}

impl Card {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn with_image(mut self, small: impl Into<String>, large: impl Into<String>) -> Self {
        self.small_image_url = Some(small.into());
        self.large_image_url = Some(large.into());
        self
    }

    pub fn has_image(&self) -> bool {
        self.small_image_url.is_some() || self.large_image_url.is_some()
    }
}

/// What the audio player should do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioCommand {
    #[default]
    Play,
    Stop,
    Clear,
}

/// How a play or clear command treats the existing queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioBehavior {
    #[serde(rename = "replace all")]
    ReplaceAll,
    #[serde(rename = "enqueue")]
    Enqueue,
    #[serde(rename = "replace enqueued")]
    ReplaceEnqueued,
    #[serde(rename = "clear enqueued")]
    ClearEnqueued,
    #[serde(rename = "clear all")]
    ClearAll,
}

/// Options for an audio directive.
///
/// `Default` is a play command that replaces the queue from offset zero, so
/// callers override only what they need:
///
/// ```
/// use parley::domain::response::AudioOptions;
///
/// let options = AudioOptions {
///     url: Some("https://example.net/a.mp3".into()),
///     offset_ms: 1500,
///     ..Default::default()
/// };
/// assert_eq!(options.token, None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioOptions {
    #[serde(rename = "type")]
    pub command: AudioCommand,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior: Option<AudioBehavior>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(rename = "offset", default)]
    pub offset_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_previous_token: Option<String>,
}

impl Default for AudioOptions {
    fn default() -> Self {
        Self {
            command: AudioCommand::Play,
            behavior: Some(AudioBehavior::ReplaceAll),
            url: None,
            token: None,
            offset_ms: 0,
            expected_previous_token: None,
        }
    }
}

impl AudioOptions {
    /// Plays `url` immediately, using the URL as the stream token.
    pub fn play(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            token: Some(url.clone()),
            url: Some(url),
            ..Default::default()
        }
    }

    pub fn stop() -> Self {
        Self {
            command: AudioCommand::Stop,
            behavior: None,
            ..Default::default()
        }
    }

    pub fn clear(behavior: AudioBehavior) -> Self {
        Self {
            command: AudioCommand::Clear,
            behavior: Some(behavior),
            ..Default::default()
        }
    }

    /// Interprets a string: control words map to control commands, anything
    /// else is a URL to play.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "stop" => Self::stop(),
            "clear enqueued" => Self::clear(AudioBehavior::ClearEnqueued),
            "clear all" | "clear" => Self::clear(AudioBehavior::ClearAll),
            url => Self::play(url),
        }
    }
}

/// Argument accepted by `SessionContext::audio`.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioSpec {
    Text(String),
    Options(AudioOptions),
}

impl AudioSpec {
    pub fn into_options(self) -> AudioOptions {
        match self {
            AudioSpec::Text(text) => AudioOptions::parse(&text),
            AudioSpec::Options(options) => options,
        }
    }
}

impl From<&str> for AudioSpec {
    fn from(value: &str) -> Self {
        AudioSpec::Text(value.to_string())
    }
}

impl From<String> for AudioSpec {
    fn from(value: String) -> Self {
        AudioSpec::Text(value)
    }
}

impl From<AudioOptions> for AudioSpec {
    fn from(options: AudioOptions) -> Self {
        AudioSpec::Options(options)
    }
}
