use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::error::FleetError;

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/serials/next-pack", get(next_pack_serial))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NextPackSerial {
    pack_serial: String,
}

async fn next_pack_serial(
    State(svc): State<AppState>,
) -> Result<Json<NextPackSerial>, FleetError> {
    let pack_serial = svc.preview_next_pack_serial()?;
    Ok(Json(NextPackSerial { pack_serial }))
}
