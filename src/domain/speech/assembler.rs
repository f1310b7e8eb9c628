//! Resolves speech trees into ordered markup fragments.

use rand::seq::SliceRandom;
use std::sync::Arc;

use super::markup::{escape_attr, repair};
use super::node::{SpeechNode, AUDIO, BREAK, PAUSE, RANDOM};

/// Hook applied to every literal before markup repair.
///
/// Receives the text and the request locale; typical uses are template
/// substitution or translation lookups.
pub trait SpeechTransform: Send + Sync {
    fn transform(&self, text: &str, locale: &str) -> String;
}

impl<F> SpeechTransform for F
where
    F: Fn(&str, &str) -> String + Send + Sync,
{
    fn transform(&self, text: &str, locale: &str) -> String {
        self(text, locale)
    }
}

/// Shared handle to a transform hook.
pub type SharedSpeechTransform = Arc<dyn SpeechTransform>;

/// Turns a [`SpeechNode`] into markup fragments for one locale.
pub struct SpeechAssembler<'a> {
    locale: &'a str,
    transform: Option<&'a dyn SpeechTransform>,
}

impl<'a> SpeechAssembler<'a> {
    pub fn new(locale: &'a str) -> Self {
        Self {
            locale,
            transform: None,
        }
    }

    pub fn with_transform(mut self, transform: Option<&'a dyn SpeechTransform>) -> Self {
        self.transform = transform;
        self
    }

    /// Resolves `node` into fragments, in order, without empty entries.
    pub fn assemble(&self, node: &SpeechNode) -> Vec<String> {
        if node.is_falsy() {
            return Vec::new();
        }
        let mut fragments = Vec::new();
        self.resolve(node, &mut fragments);
        fragments.retain(|f| !f.is_empty());
        fragments
    }

    fn resolve(&self, node: &SpeechNode, out: &mut Vec<String>) {
        match node {
            SpeechNode::Text(text) => out.push(self.say(text)),
            SpeechNode::Number(n) => out.push(self.say(&n.to_string())),
            SpeechNode::Sequence(items) => {
                for item in items {
                    self.resolve(item, out);
                }
            }
            SpeechNode::Keyed(entries) => {
                for (key, value) in entries {
                    self.resolve_key(key.trim(), value, out);
                }
            }
        }
    }

    fn resolve_key(&self, key: &str, value: &SpeechNode, out: &mut Vec<String>) {
        if key == self.locale {
            self.resolve(value, out);
            return;
        }
        match key {
            RANDOM => match value {
                SpeechNode::Sequence(choices) => {
                    if let Some(choice) = choices.choose(&mut rand::thread_rng()) {
                        self.resolve(choice, out);
                    }
                }
                single => self.resolve(single, out),
            },
            PAUSE => {
                if let Some(duration) = value.literal() {
                    out.push(format!("<break time=\"{}\"/>", escape_attr(&duration)));
                }
            }
            BREAK => {
                if let Some(strength) = value.literal() {
                    out.push(format!("<break strength=\"{}\"/>", escape_attr(&strength)));
                }
            }
            AUDIO => {
                if let Some(url) = value.literal() {
                    out.push(format!("<audio src=\"{}\"/>", escape_attr(&url)));
                }
            }
            other => tracing::trace!(key = other, "ignoring speech key"),
        }
    }

    fn say(&self, text: &str) -> String {
        match self.transform {
            Some(hook) => repair(&hook.transform(text, self.locale)),
            None => repair(text),
        }
    }
}
