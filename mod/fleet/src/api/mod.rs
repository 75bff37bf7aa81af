pub mod config;
pub mod packs;
pub mod search;
pub mod serials;

use std::sync::Arc;

use axum::{Json, Router};
use serde::Serialize;

use crate::error::FleetError;
use crate::service::FleetService;

/// Shared application state.
pub type AppState = Arc<FleetService>;

/// Build the fleet API router.
pub fn router(state: AppState) -> Router {
    Router::new().nest("/v1", api_routes()).with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(packs::routes())
        .merge(serials::routes())
        .merge(search::routes())
        .merge(config::routes())
}

/// Wrap a service result into a JSON response.
pub(crate) fn ok_json<T: Serialize>(result: Result<T, FleetError>) -> Result<Json<T>, FleetError> {
    result.map(Json)
}
