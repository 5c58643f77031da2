use crate::error::SlmError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One marketplace sale, as reported by a verified notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_gross: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_fee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl TransactionRecord {
    /// Decodes a raw (still url-encoded) query string into a record.
    pub fn from_query_string(query: &str) -> Result<Self, SlmError> {
        // Last occurrence of a repeated key wins.
        let params: HashMap<String, String> = url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        Self::from_params(&params)
    }

    /// Maps each marketplace key 1:1 onto its attribute. Missing keys stay
    /// `None`; string values are taken verbatim. A query carrying none of
    /// the known keys is rejected.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, SlmError> {
        let text = |key: &str| params.get(key).cloned();

        let record = Self {
            currency: text("Currency"),
            kind: text("Type"),
            payment_gross: text("PaymentGross"),
            payment_fee: text("PaymentFee"),
            payer_name: text("PayerName"),
            payer_key: text("PayerKey"),
            receiver_name: text("ReceiverName"),
            receiver_key: text("ReceiverKey"),
            merchant_name: text("MerchantName"),
            merchant_key: text("MerchantKey"),
            transaction_id: parse_numeric(params, "TransactionID")?,
            item_id: parse_numeric(params, "ItemID")?,
            item_name: text("ItemName"),
            inventory_name: text("InventoryName"),
            location: text("Location"),
        };

        if record.is_empty() {
            return Err(SlmError::Input(
                "notification carries no transaction fields".to_string(),
            ));
        }

        Ok(record)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Present attributes as `(name, value)` pairs in stored order.
    /// Numeric attributes are rendered in decimal.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let fields = [
            ("currency", self.currency.clone()),
            ("type", self.kind.clone()),
            ("paymentGross", self.payment_gross.clone()),
            ("paymentFee", self.payment_fee.clone()),
            ("payerName", self.payer_name.clone()),
            ("payerKey", self.payer_key.clone()),
            ("receiverName", self.receiver_name.clone()),
            ("receiverKey", self.receiver_key.clone()),
            ("merchantName", self.merchant_name.clone()),
            ("merchantKey", self.merchant_key.clone()),
            ("transactionId", self.transaction_id.map(|id| id.to_string())),
            ("itemId", self.item_id.map(|id| id.to_string())),
            ("itemName", self.item_name.clone()),
            ("inventoryName", self.inventory_name.clone()),
            ("location", self.location.clone()),
        ];

        fields
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name, v)))
            .collect()
    }
}

fn parse_numeric(params: &HashMap<String, String>, key: &str) -> Result<Option<u64>, SlmError> {
    params
        .get(key)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map_err(|_| SlmError::Input(format!("{} is not numeric: {:?}", key, raw)))
        })
        .transpose()
}
