//! Platform detection and the per-platform request/response codecs.
//!
//! Each platform is a unit codec implementing both [`RequestAdapter`] and
//! [`ResponseAdapter`]; callers select one through [`request_adapter`] or
//! [`response_adapter`] and never match on platform themselves.

mod adapter;
mod alexa;
mod classifier;
mod cortana;
mod google;

pub use adapter::{RequestAdapter, ResponseAdapter, FALLBACK_LOCALE};
pub use alexa::AlexaCodec;
pub use classifier::{classify, score};
pub use cortana::CortanaCodec;
pub use google::GoogleCodec;

use serde_json::Value;

use crate::domain::foundation::Platform;
use crate::domain::request::NormalizedRequest;

static ALEXA: AlexaCodec = AlexaCodec;
static GOOGLE: GoogleCodec = GoogleCodec;
static CORTANA: CortanaCodec = CortanaCodec;

pub fn request_adapter(platform: Platform) -> &'static dyn RequestAdapter {
    match platform {
        Platform::Alexa => &ALEXA,
        Platform::Google => &GOOGLE,
        Platform::Cortana => &CORTANA,
    }
}

pub fn response_adapter(platform: Platform) -> &'static dyn ResponseAdapter {
    match platform {
        Platform::Alexa => &ALEXA,
        Platform::Google => &GOOGLE,
        Platform::Cortana => &CORTANA,
    }
}

/// Classifies `payload` and normalizes it with the matching codec.
pub fn normalize(payload: Value, default_locale: Option<&str>) -> NormalizedRequest {
    let platform = classify(&payload);
    request_adapter(platform).normalize(payload, default_locale)
}
