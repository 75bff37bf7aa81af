use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;

use crate::error::FleetError;
use crate::service::SearchHit;

use super::{AppState, ok_json};

pub fn routes() -> Router<AppState> {
    Router::new().route("/search", get(search))
}

#[derive(Deserialize)]
struct SearchQuery {
    q: String,
}

async fn search(
    State(svc): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchHit>, FleetError> {
    ok_json(svc.search(&query.q))
}
