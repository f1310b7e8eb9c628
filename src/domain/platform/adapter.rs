//! Capability traits every platform codec implements.

use serde_json::Value;

use crate::domain::foundation::{Platform, SessionDocument};
use crate::domain::request::{NormalizedRequest, Slot, UserProfile};
use crate::domain::response::NormalizedResponse;

/// Locale used when neither the payload nor configuration provides one.
pub const FALLBACK_LOCALE: &str = "en-US";

/// Extracts the platform-neutral view of an inbound payload.
///
/// Every accessor reads leniently and degrades to its default, so
/// [`RequestAdapter::normalize`] never fails.
pub trait RequestAdapter: Send + Sync {
    fn platform(&self) -> Platform;

    fn user_id(&self, payload: &Value) -> Option<String>;

    fn session_id(&self, payload: &Value) -> Option<String>;

    fn is_new_session(&self, payload: &Value) -> bool;

    fn locale(&self, payload: &Value) -> Option<String>;

    fn action(&self, payload: &Value) -> Option<String>;

    /// The session document carried in the payload, if there is one.
    fn session_document(&self, payload: &Value) -> Option<SessionDocument>;

    fn request_id(&self, _payload: &Value) -> Option<String> {
        None
    }

    fn query_text(&self, _payload: &Value) -> Option<String> {
        None
    }

    fn user_profile(&self, _payload: &Value) -> UserProfile {
        UserProfile::default()
    }

    fn slots(&self, _payload: &Value) -> Vec<Slot> {
        Vec::new()
    }

    /// Builds the normalized request, taking ownership of the payload.
    fn normalize(&self, payload: Value, default_locale: Option<&str>) -> NormalizedRequest {
        let session = self.session_document(&payload).unwrap_or_default();
        let locale = self
            .locale(&payload)
            .or_else(|| {
                default_locale
                    .filter(|locale| !locale.is_empty())
                    .map(str::to_owned)
            })
            .unwrap_or_else(|| FALLBACK_LOCALE.to_string());

        NormalizedRequest {
            platform: self.platform(),
            request_id: self.request_id(&payload),
            user_id: self.user_id(&payload),
            user_profile: self.user_profile(&payload),
            session_id: self.session_id(&payload),
            is_new_session: self.is_new_session(&payload),
            locale,
            action: self.action(&payload),
            state: session.state,
            attributes: session.attributes,
            waypoints: session.waypoints,
            slots: self.slots(&payload),
            query_text: self.query_text(&payload),
            raw: payload,
        }
    }
}

/// Renders a normalized response into the platform's wire shape.
pub trait ResponseAdapter: Send + Sync {
    fn platform(&self) -> Platform;

    fn render(&self, response: &NormalizedResponse) -> Value;
}
