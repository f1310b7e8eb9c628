//! Ready-made middleware.

mod built_in_actions;

pub use built_in_actions::{canonical_action, BuiltInActions, EXIT, LAUNCH, SESSION_ENDED};
