pub mod processor;
pub mod signature;
pub mod store;

pub use processor::NotificationProcessor;
pub use signature::{
    verifier_for, HmacSha256Verifier, LegacySha1Verifier, SignatureScheme, SignatureVerifier,
    VerificationContext, SIGNATURE_HEADER,
};
pub use store::{item_key, log_label, RedisStore, TransactionStore};
