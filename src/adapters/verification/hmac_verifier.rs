//! Shared-secret request verification.
//!
//! Self-hosted channels sign the raw request body with HMAC-SHA256 and send
//! the hex digest in the `signature` header.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::ports::{RequestVerifier, SignatureMaterial, VerificationError};

/// Verifies HMAC-SHA256 signatures made with a shared secret.
pub struct HmacSha256Verifier {
    secret: SecretString,
}

impl HmacSha256Verifier {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Computes the signature for `body`.
    pub fn sign(&self, body: &[u8]) -> Result<Vec<u8>, VerificationError> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| VerificationError::Malformed(e.to_string()))?;
        mac.update(body);
        Ok(mac.finalize().into_bytes().to_vec())
    }

    /// Hex form of [`HmacSha256Verifier::sign`], as sent in the header.
    pub fn sign_hex(&self, body: &[u8]) -> Result<String, VerificationError> {
        self.sign(body).map(hex::encode)
    }
}

#[async_trait]
impl RequestVerifier for HmacSha256Verifier {
    async fn verify(
        &self,
        material: &SignatureMaterial,
        body: &[u8],
    ) -> Result<(), VerificationError> {
        let header = material
            .signature
            .as_deref()
            .ok_or(VerificationError::MissingSignature)?;
        let provided = hex::decode(header.trim())
            .map_err(|_| VerificationError::Malformed("signature is not hex".to_string()))?;

        let expected = self.sign(body)?;
        if !constant_time_compare(&expected, &provided) {
            return Err(VerificationError::InvalidSignature);
        }
        Ok(())
    }
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
