pub mod health;
pub mod notification;

pub use health::*;
pub use notification::*;

use axum::{
    routing::{get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(receive_notification))
        .route("/ans", post(receive_notification))
        .route("/health", get(health_check))
        .with_state(state)
}
