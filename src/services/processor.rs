use crate::error::SlmError;
use crate::models::TransactionRecord;
use crate::services::{SignatureVerifier, TransactionStore, SIGNATURE_HEADER};
use std::sync::Arc;

/// Verifies a marketplace notification and stores the transaction it
/// describes. Holds no per-request state.
pub struct NotificationProcessor {
    verifier: Arc<dyn SignatureVerifier>,
    store: Arc<dyn TransactionStore>,
}

impl NotificationProcessor {
    pub fn new(verifier: Arc<dyn SignatureVerifier>, store: Arc<dyn TransactionStore>) -> Self {
        Self { verifier, store }
    }

    pub fn store(&self) -> &Arc<dyn TransactionStore> {
        &self.store
    }

    /// Runs one notification through input checks, signature verification,
    /// field extraction and a single store write, in that order. The first
    /// failure aborts the rest.
    pub async fn process(
        &self,
        signature: Option<&str>,
        body: &[u8],
        query: Option<&str>,
    ) -> Result<TransactionRecord, SlmError> {
        let signature = signature
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| SlmError::Input(format!("missing {} header", SIGNATURE_HEADER)))?;

        if body.is_empty() {
            return Err(SlmError::Input("empty request body".to_string()));
        }

        let query = query
            .filter(|q| !q.is_empty())
            .ok_or_else(|| SlmError::Input("missing query string".to_string()))?;

        self.verifier.verify(body, signature)?;

        let record = TransactionRecord::from_query_string(query)?;
        self.store.put_transaction(&record).await?;

        tracing::info!(
            transaction_id = ?record.transaction_id,
            kind = ?record.kind,
            "Marketplace notification stored"
        );

        Ok(record)
    }
}
