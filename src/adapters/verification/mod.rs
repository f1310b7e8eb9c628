//! Request verification adapters.
//!
//! - **HmacSha256Verifier** - Shared-secret signatures for self-hosted channels
//! - **VerificationMiddleware** - Applies a verifier per platform before dispatch

mod hmac_verifier;
mod verification_middleware;

pub use hmac_verifier::HmacSha256Verifier;
pub use verification_middleware::VerificationMiddleware;
