use crate::error::SlmError;
use crate::models::TransactionRecord;
use async_trait::async_trait;
use redis::AsyncCommands;
use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

/// Destination for verified transaction records.
///
/// Writes are unconditional: storing the same notification twice issues
/// two writes and whatever the backend does with a repeated key wins.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn put_transaction(&self, record: &TransactionRecord) -> Result<(), SlmError>;

    async fn ping(&self) -> bool;
}

/// Builds the item key `{table}:{seller}:{transactionId}`. Records without a
/// transaction id get a random suffix so every write creates a new item.
pub fn item_key(table: &str, seller_key: &str, record: &TransactionRecord) -> String {
    let id = record
        .transaction_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    format!("{}:{}:{}", table, seller_key, id)
}

/// Item location safe to log: the seller segment is masked.
pub fn log_label(table: &str, record: &TransactionRecord) -> String {
    match record.transaction_id {
        Some(id) => format!("{}:*:{}", table, id),
        None => format!("{}:*:<new>", table),
    }
}

/// Redis-backed table: one hash per record.
pub struct RedisStore {
    redis: redis::aio::ConnectionManager,
    table: String,
    seller_key: SecretString,
}

impl RedisStore {
    pub async fn connect(
        redis_url: &str,
        table: impl Into<String>,
        seller_key: SecretString,
    ) -> Result<Self, SlmError> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| SlmError::Configuration(format!("Invalid REDIS_URL: {}", e)))?;
        let redis = client.get_connection_manager().await?;

        let table = table.into();
        tracing::info!("Redis connected successfully (table: {})", table);

        Ok(Self {
            redis,
            table,
            seller_key,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

#[async_trait]
impl TransactionStore for RedisStore {
    async fn put_transaction(&self, record: &TransactionRecord) -> Result<(), SlmError> {
        let key = item_key(&self.table, self.seller_key.expose_secret(), record);
        let label = log_label(&self.table, record);
        let attributes = record.attributes();

        let mut redis = self.redis.clone();
        redis
            .hset_multiple::<_, _, _, ()>(&key, attributes.as_slice())
            .await
            .map_err(|e| {
                tracing::warn!("Redis write error for {}: {}", label, e);
                SlmError::from(e)
            })?;

        tracing::debug!("Stored {} attributes under {}", attributes.len(), label);
        Ok(())
    }

    async fn ping(&self) -> bool {
        let mut redis = self.redis.clone();
        match redis::cmd("PING").query_async::<_, String>(&mut redis).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Redis ping failed: {}", e);
                false
            }
        }
    }
}
