//! The platform-neutral, read-only view of an inbound request.

use serde::Serialize;
use serde_json::Value;

use crate::domain::foundation::{AttributeMap, Platform, WaypointStack};

use super::Slot;

/// Names the platform reports for the user, when it shares them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub display_name: Option<String>,
}

/// Normalized request, derived once from the raw payload.
///
/// Every field has a documented default, so a malformed payload still yields
/// a usable request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRequest {
    pub(crate) platform: Platform,
    pub(crate) request_id: Option<String>,
    pub(crate) user_id: Option<String>,
    pub(crate) user_profile: UserProfile,
    pub(crate) session_id: Option<String>,
    pub(crate) is_new_session: bool,
    pub(crate) locale: String,
    pub(crate) action: Option<String>,
    pub(crate) state: Option<String>,
    pub(crate) attributes: AttributeMap,
    pub(crate) waypoints: WaypointStack,
    pub(crate) slots: Vec<Slot>,
    pub(crate) query_text: Option<String>,
    #[serde(skip)]
    pub(crate) raw: Value,
}

impl NormalizedRequest {
    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn user_profile(&self) -> &UserProfile {
        &self.user_profile
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn is_new_session(&self) -> bool {
        self.is_new_session
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Request type or intent name the turn starts with.
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    /// State carried over from the previous turn.
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// Session attributes carried over from the previous turn.
    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    pub fn waypoints(&self) -> &WaypointStack {
        &self.waypoints
    }

    /// Slots in the order the platform sent them (Alexa only).
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.name == name)
    }

    /// Raw utterance text, when the platform sends it.
    pub fn query_text(&self) -> Option<&str> {
        self.query_text.as_deref()
    }

    /// The payload exactly as received.
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}
