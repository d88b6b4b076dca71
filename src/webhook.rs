//! Alertmanager webhook receiver.
//!
//! One route, `POST /webhook/am`. Every request is answered `200 OK` with an
//! empty body, including undecodable ones: Alertmanager retries non-2xx
//! replies aggressively and a malformed batch will not get better.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::alerts::{AlertBatch, AlertCounter};

/// Path Alertmanager posts to
pub const WEBHOOK_PATH: &str = "/webhook/am";

/// Build the HTTP router
pub fn router(counter: Arc<AlertCounter>) -> Router {
    Router::new()
        .route(WEBHOOK_PATH, post(receive))
        .layer(TraceLayer::new_for_http())
        .with_state(counter)
}

async fn receive(
    State(counter): State<Arc<AlertCounter>>,
    body: Result<Bytes, BytesRejection>,
) -> StatusCode {
    let body = match body {
        Ok(body) => body,
        Err(e) => {
            warn!("Failed to read webhook body: {}", e);
            return StatusCode::OK;
        }
    };

    let batch: AlertBatch = match serde_json::from_slice(&body) {
        Ok(batch) => batch,
        Err(e) => {
            warn!("Failed to decode webhook payload: {}", e);
            return StatusCode::OK;
        }
    };

    let outcome = counter.apply(&batch);
    debug!(
        "Batch from {:?}: +{} -{} ignored {}, {} firing",
        batch.receiver, outcome.fired, outcome.resolved, outcome.ignored, outcome.count
    );
    StatusCode::OK
}
