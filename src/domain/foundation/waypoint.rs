//! Saved (state, action) pairs for returning to an earlier point in a flow.

use serde::{Deserialize, Serialize};

/// A saved (state, action) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Waypoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl Waypoint {
    pub fn new(state: Option<String>, action: Option<String>) -> Self {
        Self { state, action }
    }

    /// Waypoint in a named state.
    pub fn at(state: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            state: Some(state.into()),
            action: Some(action.into()),
        }
    }
}

/// Strictly LIFO stack of waypoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaypointStack(Vec<Waypoint>);

impl WaypointStack {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, waypoint: Waypoint) {
        self.0.push(waypoint);
    }

    /// Removes and returns the most recently pushed waypoint.
    pub fn pop(&mut self) -> Option<Waypoint> {
        self.0.pop()
    }

    pub fn peek(&self) -> Option<&Waypoint> {
        self.0.last()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Waypoint>> for WaypointStack {
    fn from(waypoints: Vec<Waypoint>) -> Self {
        Self(waypoints)
    }
}
