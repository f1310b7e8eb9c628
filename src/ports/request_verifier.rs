//! Request Verifier Port - Interface for authenticating inbound payloads.

use async_trait::async_trait;

use crate::domain::foundation::TurnMetadata;

/// Header carrying the request signature
pub const SIGNATURE_HEADER: &str = "signature";

/// Header carrying the signing certificate chain URL (Alexa)
pub const CERT_CHAIN_HEADER: &str = "signaturecertchainurl";

/// Errors that can occur while verifying a request
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("Request carries no signature")]
    MissingSignature,

    #[error("Request signature does not match")]
    InvalidSignature,

    #[error("Malformed signature material: {0}")]
    Malformed(String),
}

/// What a platform sends to prove a request's origin
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureMaterial {
    pub signature: Option<String>,
    pub cert_chain_url: Option<String>,
}

impl SignatureMaterial {
    /// Reads the signature headers from transport metadata
    pub fn from_metadata(metadata: &TurnMetadata) -> Self {
        Self {
            signature: metadata.header(SIGNATURE_HEADER).map(str::to_owned),
            cert_chain_url: metadata.header(CERT_CHAIN_HEADER).map(str::to_owned),
        }
    }
}

/// Port for checking that a payload really came from its platform
#[async_trait]
pub trait RequestVerifier: Send + Sync {
    /// Accepts or rejects `body`, the raw bytes the signature was made over
    async fn verify(
        &self,
        material: &SignatureMaterial,
        body: &[u8],
    ) -> Result<(), VerificationError>;
}
