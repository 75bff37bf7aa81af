use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};
use serde::Deserialize;

use packtrace_core::{ListParams, ListResult};

use crate::error::FleetError;
use crate::model::Pack;
use crate::service::AllocateInput;
use crate::validate::CellsInput;

use super::{AppState, ok_json};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/packs", post(create_pack).get(list_packs))
        .route("/packs/{serial}", get(get_pack).delete(delete_pack))
        .route("/packs/{serial}/cells", put(update_cells))
        .route("/packs/{serial}/labels", post(regenerate_labels))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatePackBody {
    /// Explicit pack serial; omitted or blank means derive one.
    pack_serial: Option<String>,

    module1: Option<CellsInput>,
    module2: Option<CellsInput>,
    module3: Option<CellsInput>,

    #[serde(default)]
    overwrite: bool,

    /// Skip label generation and only persist the record when false.
    #[serde(default = "default_with_labels")]
    with_labels: bool,

    created_by: Option<String>,
}

fn default_with_labels() -> bool {
    true
}

impl CreatePackBody {
    fn into_input(self) -> AllocateInput {
        AllocateInput {
            pack_serial: self.pack_serial,
            cells: [
                self.module1.as_ref().map(CellsInput::normalize),
                self.module2.as_ref().map(CellsInput::normalize),
                self.module3.as_ref().map(CellsInput::normalize),
            ],
            overwrite: self.overwrite,
            created_by: self.created_by,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateCellsBody {
    /// One cell list per existing module, in slot order.
    modules: Vec<CellsInput>,
}

async fn create_pack(
    State(svc): State<AppState>,
    Json(body): Json<CreatePackBody>,
) -> Result<Json<Pack>, FleetError> {
    let with_labels = body.with_labels;
    let input = body.into_input();
    ok_json(if with_labels {
        svc.allocate_with_labels(input)
    } else {
        svc.allocate(input)
    })
}

async fn list_packs(
    State(svc): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResult<Pack>>, FleetError> {
    ok_json(svc.list_packs(&params))
}

async fn get_pack(
    State(svc): State<AppState>,
    Path(serial): Path<String>,
) -> Result<Json<Pack>, FleetError> {
    ok_json(svc.get_pack(&serial))
}

async fn delete_pack(
    State(svc): State<AppState>,
    Path(serial): Path<String>,
) -> Result<Json<serde_json::Value>, FleetError> {
    svc.delete(&serial)?;
    Ok(Json(serde_json::json!({"ok": true})))
}

async fn update_cells(
    State(svc): State<AppState>,
    Path(serial): Path<String>,
    Json(body): Json<UpdateCellsBody>,
) -> Result<Json<Pack>, FleetError> {
    let payloads = body.modules.iter().map(CellsInput::normalize).collect();
    ok_json(svc.update_cells(&serial, payloads))
}

async fn regenerate_labels(
    State(svc): State<AppState>,
    Path(serial): Path<String>,
) -> Result<Json<Pack>, FleetError> {
    ok_json(svc.regenerate_labels(&serial))
}
