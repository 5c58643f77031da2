use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use secrecy::SecretString;
use serde_json::Value;
use slm_processor::{
    error::SlmError,
    handlers::{router, AppState},
    models::TransactionRecord,
    services::{verifier_for, NotificationProcessor, SignatureScheme, TransactionStore},
};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

const SALT: &str = "saltvalue";
const BODY: &str = "abc123";

#[derive(Default)]
struct MemoryStore {
    writes: Mutex<Vec<TransactionRecord>>,
    fail: bool,
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn put_transaction(&self, record: &TransactionRecord) -> Result<(), SlmError> {
        if self.fail {
            return Err(SlmError::Storage("connection refused".to_string()));
        }
        self.writes.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn ping(&self) -> bool {
        !self.fail
    }
}

fn app(store: Arc<MemoryStore>) -> Router {
    let verifier = verifier_for(SignatureScheme::LegacySha1, SecretString::new(SALT.to_string()));
    router(AppState::new(NotificationProcessor::new(verifier, store)))
}

fn sign(body: &str) -> String {
    verifier_for(SignatureScheme::LegacySha1, SecretString::new(SALT.to_string()))
        .sign(body.as_bytes())
        .unwrap()
}

fn notification(uri: &str, signature: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(signature) = signature {
        builder = builder.header("X-ANS-Verify-Hash", signature);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_valid_notification_acknowledged_and_stored() {
    let store = Arc::new(MemoryStore::default());
    let signature = sign(BODY);

    let (status, body) = send(
        app(store.clone()),
        notification(
            "/?Currency=USD&TransactionID=42&PayerName=Resident%20One",
            Some(signature.as_str()),
            BODY,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "message": "ok" }));

    let writes = store.writes.lock().unwrap();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].currency.as_deref(), Some("USD"));
    assert_eq!(writes[0].transaction_id, Some(42));
    assert_eq!(writes[0].payer_name.as_deref(), Some("Resident One"));
}

#[tokio::test]
async fn test_ans_alias_route() {
    let store = Arc::new(MemoryStore::default());
    let signature = sign(BODY);

    let (status, _) = send(
        app(store.clone()),
        notification("/ans?Currency=USD", Some(signature.as_str()), BODY),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.writes.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_lowercase_header_name_accepted() {
    let store = Arc::new(MemoryStore::default());
    let request = Request::builder()
        .method("POST")
        .uri("/?Currency=USD")
        .header("x-ans-verify-hash", sign(BODY))
        .body(Body::from(BODY))
        .unwrap();

    let (status, _) = send(app(store), request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_bad_signature_rejected_without_write() {
    let store = Arc::new(MemoryStore::default());
    let signature = sign("something else");

    let (status, body) = send(
        app(store.clone()),
        notification("/?Currency=USD&TransactionID=42", Some(signature.as_str()), BODY),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], "INVALID_SIGNATURE");
    assert_eq!(body["success"], false);
    assert!(store.writes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_inputs_are_bad_requests() {
    let signature = sign(BODY);
    let cases = [
        notification("/?Currency=USD", None, BODY),
        notification("/?Currency=USD", Some(signature.as_str()), ""),
        notification("/", Some(signature.as_str()), BODY),
    ];

    for request in cases {
        let store = Arc::new(MemoryStore::default());
        let (status, body) = send(app(store.clone()), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "INVALID_INPUT");
        assert!(store.writes.lock().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_verified_query_without_known_keys_is_bad_request() {
    let store = Arc::new(MemoryStore::default());
    let signature = sign(BODY);

    let (status, body) = send(
        app(store.clone()),
        notification("/?Foo=bar", Some(signature.as_str()), BODY),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "INVALID_INPUT");
    assert!(store.writes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_storage_failure_is_bad_gateway() {
    let store = Arc::new(MemoryStore {
        fail: true,
        ..Default::default()
    });
    let signature = sign(BODY);

    let (status, body) = send(
        app(store),
        notification("/?Currency=USD&TransactionID=42", Some(signature.as_str()), BODY),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error_code"], "STORAGE_ERROR");
}

#[tokio::test]
async fn test_replayed_notification_written_twice() {
    let store = Arc::new(MemoryStore::default());
    let signature = sign(BODY);

    for _ in 0..2 {
        let (status, _) = send(
            app(store.clone()),
            notification("/?Currency=USD&TransactionID=42", Some(signature.as_str()), BODY),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    assert_eq!(store.writes.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_health_reports_store_state() {
    let request = || {
        Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap()
    };

    let (status, body) = send(app(Arc::new(MemoryStore::default())), request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], true);

    let failing = Arc::new(MemoryStore {
        fail: true,
        ..Default::default()
    });
    let (_, body) = send(app(failing), request()).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["store"], false);
}
