use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use crate::{config::Config, AppState};

pub mod csv;

pub fn routes(config: &Config) -> Router<Arc<AppState>> {
    Router::new()
        .route("/health/", get(health_check))
        .merge(csv::routes(config))
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
