pub mod config;
pub mod engine;
pub mod search;

use std::sync::Arc;

use packtrace_core::{ListParams, ListResult};

use crate::error::FleetError;
use crate::labels::LabelRenderer;
use crate::model::Pack;
use crate::store::FleetStore;

pub use engine::AllocateInput;
pub use search::{MatchKind, SearchHit};

/// Fleet service — owns the document store and the label collaborator.
///
/// All business logic goes through here; handlers stay thin.
pub struct FleetService {
    pub(crate) store: FleetStore,
    pub(crate) labels: Arc<dyn LabelRenderer>,
}

impl FleetService {
    pub fn new(store: FleetStore, labels: Arc<dyn LabelRenderer>) -> Self {
        Self { store, labels }
    }

    pub fn get_pack(&self, serial: &str) -> Result<Pack, FleetError> {
        let doc = self.store.snapshot()?;
        doc.packs
            .get(serial)
            .cloned()
            .ok_or_else(|| FleetError::NotFound(format!("pack '{serial}' not found")))
    }

    pub fn list_packs(&self, params: &ListParams) -> Result<ListResult<Pack>, FleetError> {
        let doc = self.store.snapshot()?;
        let total = doc.packs.len();
        let items = doc
            .packs
            .values()
            .skip(params.offset)
            .take(params.limit.min(500))
            .cloned()
            .collect();
        Ok(ListResult { items, total })
    }
}
