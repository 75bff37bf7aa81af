use axum::{
    Json, Router,
    extract::State,
    routing::get,
};

use crate::error::FleetError;
use crate::model::FleetConfig;

use super::{AppState, ok_json};

pub fn routes() -> Router<AppState> {
    Router::new().route("/config", get(get_config).put(set_config).patch(patch_config))
}

async fn get_config(State(svc): State<AppState>) -> Result<Json<FleetConfig>, FleetError> {
    ok_json(svc.get_config())
}

async fn set_config(
    State(svc): State<AppState>,
    Json(config): Json<FleetConfig>,
) -> Result<Json<FleetConfig>, FleetError> {
    ok_json(svc.set_config(config))
}

async fn patch_config(
    State(svc): State<AppState>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<FleetConfig>, FleetError> {
    ok_json(svc.patch_config(&patch))
}
