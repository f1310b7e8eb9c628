//! Documents that carry conversation state between turns.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{AttributeMap, Waypoint, WaypointStack};

/// Session state round-tripped through a platform's session-carrying field
/// and, when a conversation is interrupted, through the session store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionDocument {
    #[serde(rename = "STATE", default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(rename = "ATTRIBUTES", default)]
    pub attributes: AttributeMap,

    #[serde(rename = "WAYPOINTS", default)]
    pub waypoints: WaypointStack,
}

impl SessionDocument {
    /// Reads a session document leniently.
    ///
    /// Inbound payloads are untrusted, so each field falls back to its
    /// default on its own instead of failing the whole document.
    pub fn from_value(value: &Value) -> Self {
        let state = value
            .get("STATE")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);

        let attributes = value
            .get("ATTRIBUTES")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        let waypoints = value
            .get("WAYPOINTS")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| serde_json::from_value::<Waypoint>(item.clone()).ok())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        Self {
            state,
            attributes,
            waypoints: WaypointStack::from(waypoints),
        }
    }

    /// True when the document carries nothing worth restoring.
    pub fn is_empty(&self) -> bool {
        self.state.is_none() && self.attributes.is_empty() && self.waypoints.is_empty()
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Everything persisted for one user between sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserDocument {
    /// The unfinished session, present only when the last turn errored or
    /// left the conversation open.
    #[serde(rename = "SESSION", default, skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionDocument>,

    /// Long-lived storage that outlives sessions.
    #[serde(rename = "STORAGE", default)]
    pub storage: AttributeMap,
}
