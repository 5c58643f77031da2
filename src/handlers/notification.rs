use crate::{
    error::SlmError,
    models::AckResponse,
    services::{NotificationProcessor, SIGNATURE_HEADER},
};
use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::HeaderMap,
    Json,
};
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<NotificationProcessor>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(processor: NotificationProcessor) -> Self {
        Self {
            processor: Arc::new(processor),
            started_at: Instant::now(),
        }
    }
}

pub async fn receive_notification(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<Json<AckResponse>, SlmError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .map(|value| {
            value
                .to_str()
                .map_err(|_| SlmError::Input(format!("{} is not valid ASCII", SIGNATURE_HEADER)))
        })
        .transpose()?;

    state
        .processor
        .process(signature, &body, query.as_deref())
        .await?;

    Ok(Json(AckResponse::ok()))
}
