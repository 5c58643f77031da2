use crate::error::SlmError;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha1::{Digest, Sha1};
use sha2::Sha256;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the sender's hex digest.
pub const SIGNATURE_HEADER: &str = "X-ANS-Verify-Hash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureScheme {
    /// `hex(SHA-1(body || salt))`, what the marketplace sends today.
    LegacySha1,
    /// `hex(HMAC-SHA256(key = salt, body))`.
    HmacSha256,
}

impl FromStr for SignatureScheme {
    type Err = SlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sha1" | "legacy-sha1" => Ok(SignatureScheme::LegacySha1),
            "hmac-sha256" | "hmac_sha256" => Ok(SignatureScheme::HmacSha256),
            other => Err(SlmError::Configuration(format!(
                "Unknown signature scheme: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for SignatureScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureScheme::LegacySha1 => write!(f, "sha1"),
            SignatureScheme::HmacSha256 => write!(f, "hmac-sha256"),
        }
    }
}

/// Per-request verification inputs and the digest computed from them.
/// Lives only for the duration of one check.
pub struct VerificationContext<'a> {
    pub salt: &'a SecretString,
    pub body: &'a [u8],
    pub provided: &'a str,
    pub computed: Vec<u8>,
}

impl VerificationContext<'_> {
    /// Constant-time comparison of the computed digest against the
    /// hex value supplied by the sender.
    pub fn is_valid(&self) -> bool {
        let Ok(provided) = hex::decode(self.provided.trim()) else {
            tracing::debug!("Signature header is not valid hex");
            return false;
        };

        if provided.len() != self.computed.len() {
            return false;
        }

        provided.ct_eq(&self.computed).into()
    }
}

impl fmt::Debug for VerificationContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerificationContext")
            .field("salt", &"[REDACTED]")
            .field("body_len", &self.body.len())
            .field("provided", &self.provided)
            .field("computed", &hex::encode(&self.computed))
            .finish()
    }
}

/// Checks that a notification body was produced by a holder of the salt.
pub trait SignatureVerifier: Send + Sync {
    fn scheme(&self) -> SignatureScheme;

    fn salt(&self) -> &SecretString;

    fn compute_digest(&self, body: &[u8]) -> Result<Vec<u8>, SlmError>;

    /// Hex digest a legitimate sender would attach to `body`.
    fn sign(&self, body: &[u8]) -> Result<String, SlmError> {
        Ok(hex::encode(self.compute_digest(body)?))
    }

    fn verify(&self, body: &[u8], provided: &str) -> Result<(), SlmError> {
        let context = VerificationContext {
            salt: self.salt(),
            body,
            provided,
            computed: self.compute_digest(body)?,
        };

        if context.is_valid() {
            Ok(())
        } else {
            tracing::debug!(scheme = %self.scheme(), "Notification signature mismatch");
            Err(SlmError::Verification("invalid signature".to_string()))
        }
    }
}

pub struct LegacySha1Verifier {
    salt: SecretString,
}

impl LegacySha1Verifier {
    pub fn new(salt: SecretString) -> Self {
        Self { salt }
    }
}

impl SignatureVerifier for LegacySha1Verifier {
    fn scheme(&self) -> SignatureScheme {
        SignatureScheme::LegacySha1
    }

    fn salt(&self) -> &SecretString {
        &self.salt
    }

    fn compute_digest(&self, body: &[u8]) -> Result<Vec<u8>, SlmError> {
        let mut hasher = Sha1::new();
        hasher.update(body);
        hasher.update(self.salt.expose_secret().as_bytes());
        Ok(hasher.finalize().to_vec())
    }
}

pub struct HmacSha256Verifier {
    salt: SecretString,
}

impl HmacSha256Verifier {
    pub fn new(salt: SecretString) -> Self {
        Self { salt }
    }
}

impl SignatureVerifier for HmacSha256Verifier {
    fn scheme(&self) -> SignatureScheme {
        SignatureScheme::HmacSha256
    }

    fn salt(&self) -> &SecretString {
        &self.salt
    }

    fn compute_digest(&self, body: &[u8]) -> Result<Vec<u8>, SlmError> {
        let mut mac = HmacSha256::new_from_slice(self.salt.expose_secret().as_bytes())
            .map_err(|e| SlmError::Configuration(format!("Invalid HMAC key: {}", e)))?;
        mac.update(body);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

pub fn verifier_for(scheme: SignatureScheme, salt: SecretString) -> Arc<dyn SignatureVerifier> {
    match scheme {
        SignatureScheme::LegacySha1 => Arc::new(LegacySha1Verifier::new(salt)),
        SignatureScheme::HmacSha256 => Arc::new(HmacSha256Verifier::new(salt)),
    }
}
