//! Serial lookup across all identifier classes.

use serde::Serialize;

use crate::error::FleetError;
use crate::service::FleetService;
use crate::model::Pack;
use crate::validate::cell_index;

/// Which class of identifier a query matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Pack,
    Module,
    Cell,
}

/// A successful lookup: what matched, and the pack it belongs to.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub kind: MatchKind,
    /// The identifier that matched the query verbatim.
    pub matched: String,
    pub pack: Pack,
}

impl FleetService {
    /// Resolve a scanned or typed serial to its pack.
    ///
    /// Exact match only, checked in priority order: pack serial, then
    /// module serial, then cell serial. A cell recorded in two places
    /// cannot happen, so the first owner found is the only owner.
    pub fn search(&self, query: &str) -> Result<SearchHit, FleetError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(FleetError::Validation("query must not be empty".into()));
        }

        let doc = self.store.snapshot()?;

        if let Some(pack) = doc.packs.get(query) {
            return Ok(SearchHit {
                kind: MatchKind::Pack,
                matched: query.to_string(),
                pack: pack.clone(),
            });
        }

        for pack in doc.packs.values() {
            if pack.modules.iter().any(|m| m.module_serial == query) {
                return Ok(SearchHit {
                    kind: MatchKind::Module,
                    matched: query.to_string(),
                    pack: pack.clone(),
                });
            }
        }

        let index = cell_index(&doc);
        if let Some(owner) = index.get(query) {
            let pack_serial = owner.pack_serial.to_string();
            if let Some(pack) = doc.packs.get(&pack_serial) {
                return Ok(SearchHit {
                    kind: MatchKind::Cell,
                    matched: query.to_string(),
                    pack: pack.clone(),
                });
            }
        }

        Err(FleetError::NotFound(format!("no pack, module or cell matches '{query}'")))
    }
}
