use anyhow::Result;
use secrecy::SecretString;
use slm_processor::{
    client::notification::{sample_params, NotificationClient},
    services::{verifier_for, SignatureScheme},
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    // Load configuration
    dotenvy::dotenv().ok();

    let base_url = std::env::var("SLM_RECEIVER_URL")
        .unwrap_or_else(|_| "http://localhost:8080".to_string());
    let salt = std::env::var("SECONDLIFE_MARKETPLACE_HASH")?;
    let scheme: SignatureScheme = std::env::var("SIGNATURE_SCHEME")
        .unwrap_or_else(|_| "sha1".to_string())
        .parse()?;
    let transaction_id = chrono::Utc::now().timestamp() as u64;

    println!("SLM Test Sender");
    println!("===============");
    println!("Receiver: {}", base_url);
    println!("Scheme: {}", scheme);
    println!();

    let client = NotificationClient::new(base_url, verifier_for(scheme, SecretString::new(salt)));

    let params = sample_params(transaction_id);
    let params: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();
    let body = format!("TransactionID={}", transaction_id);

    match client.send(&params, &body).await {
        Ok((status, response)) if status.is_success() => {
            println!("[SUCCESS] {} accepted transaction {}", status, transaction_id);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Ok((status, response)) => {
            println!("[FAILED] Receiver answered {}", status);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Err(e) => {
            println!("[FAILED] {}", e);
        }
    }

    Ok(())
}
