use crate::services::{SignatureVerifier, SIGNATURE_HEADER};
use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::sync::Arc;

/// Sends signed notifications the way the marketplace does. Used for
/// end-to-end checks against a running receiver.
pub struct NotificationClient {
    client: Client,
    base_url: String,
    verifier: Arc<dyn SignatureVerifier>,
}

impl NotificationClient {
    pub fn new(base_url: impl Into<String>, verifier: Arc<dyn SignatureVerifier>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            verifier,
        }
    }

    pub async fn send(&self, params: &[(&str, &str)], body: &str) -> Result<(StatusCode, Value)> {
        let url = format!("{}/?{}", self.base_url, encode_query(params));
        let signature = self.verifier.sign(body.as_bytes())?;

        tracing::info!("Posting notification to {}", self.base_url);

        let response = self
            .client
            .post(&url)
            .header(SIGNATURE_HEADER, signature)
            .body(body.to_string())
            .send()
            .await
            .context("Failed to reach receiver")?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .context("Receiver returned a non-JSON body")?;

        Ok((status, body))
    }
}

pub fn encode_query(params: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish()
}

/// A representative purchase notification.
pub fn sample_params(transaction_id: u64) -> Vec<(&'static str, String)> {
    vec![
        ("Currency", "L$".to_string()),
        ("Type", "Purchase".to_string()),
        ("PaymentGross", "250".to_string()),
        ("PaymentFee", "12".to_string()),
        ("PayerName", "Test Resident".to_string()),
        ("PayerKey", "00000000-0000-0000-0000-000000000001".to_string()),
        ("ReceiverName", "Test Resident".to_string()),
        ("ReceiverKey", "00000000-0000-0000-0000-000000000001".to_string()),
        ("MerchantName", "Test Merchant".to_string()),
        ("MerchantKey", "00000000-0000-0000-0000-000000000002".to_string()),
        ("TransactionID", transaction_id.to_string()),
        ("ItemID", "1".to_string()),
        ("ItemName", "Test Item".to_string()),
        ("InventoryName", "Test Item (boxed)".to_string()),
        ("Location", "Marketplace".to_string()),
    ]
}
