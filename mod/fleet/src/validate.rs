//! Submission normalization and cell-uniqueness checks.
//!
//! All pure functions over one document snapshot. The allocation engine
//! runs them in a fixed order: normalize, intra-module duplicates,
//! pack existence, cross-fleet collisions; the first failure
//! short-circuits.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::model::FleetDocument;

/// Cells as submitted: either a multi-line text block (scanner gun
/// input) or an already-split array. Both normalize to the same shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CellsInput {
    Text(String),
    List(Vec<String>),
}

impl CellsInput {
    /// Normalize to a clean list: split text on line breaks, trim each
    /// entry, drop empties. Order of surviving entries is preserved.
    pub fn normalize(&self) -> Vec<String> {
        match self {
            CellsInput::Text(text) => normalize_lines(text),
            CellsInput::List(items) => normalize_list(items),
        }
    }
}

/// Split raw multi-line text into trimmed, non-empty cell serials.
pub fn normalize_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Trim and drop empty entries from an already-split list.
pub fn normalize_list(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

/// Cell serials appearing more than once within a single list.
/// First-occurrence order; each duplicate reported once.
pub fn intra_duplicates(cells: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut dups = Vec::new();
    for cell in cells {
        if !seen.insert(cell.as_str()) && !dups.contains(cell) {
            dups.push(cell.clone());
        }
    }
    dups
}

/// Where a stored cell serial lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellOwner<'a> {
    pub pack_serial: &'a str,
    pub module_serial: &'a str,
}

/// Index every cell serial currently stored in the document to its
/// owning pack and module. Shared by collision checking and search.
pub fn cell_index(doc: &FleetDocument) -> HashMap<&str, CellOwner<'_>> {
    let mut index = HashMap::new();
    for (pack_serial, pack) in &doc.packs {
        for module in &pack.modules {
            for cell in &module.cells {
                index.entry(cell.as_str()).or_insert(CellOwner {
                    pack_serial,
                    module_serial: &module.module_serial,
                });
            }
        }
    }
    index
}

/// A submitted cell that is already recorded elsewhere in the fleet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellCollision {
    pub cell: String,
    pub pack_serial: String,
    pub module_serial: String,
}

/// Check incoming cells against every cell already recorded in the
/// document. `exclude_pack` skips one pack's cells — used when a pack
/// is being overwritten or edited in place, so it never collides with
/// itself.
pub fn find_collisions<'a>(
    doc: &FleetDocument,
    incoming: impl IntoIterator<Item = &'a str>,
    exclude_pack: Option<&str>,
) -> Vec<CellCollision> {
    let index = cell_index(doc);
    let mut collisions = Vec::new();
    for cell in incoming {
        if let Some(owner) = index.get(cell) {
            if exclude_pack == Some(owner.pack_serial) {
                continue;
            }
            collisions.push(CellCollision {
                cell: cell.to_string(),
                pack_serial: owner.pack_serial.to_string(),
                module_serial: owner.module_serial.to_string(),
            });
        }
    }
    collisions
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::model::{ModuleSlot, Pack, PackModule};

    fn one_pack_doc(pack_serial: &str, module_serial: &str, cells: &[&str]) -> FleetDocument {
        let mut doc = FleetDocument::default();
        doc.packs.insert(
            pack_serial.to_string(),
            Pack {
                pack_serial: pack_serial.to_string(),
                created_at: None,
                created_by: None,
                modules: vec![PackModule {
                    module_serial: module_serial.to_string(),
                    slot: ModuleSlot::Module1,
                    cells: cells.iter().map(|c| c.to_string()).collect(),
                }],
                labels: BTreeMap::new(),
            },
        );
        doc
    }

    #[test]
    fn normalize_text_input() {
        let input = CellsInput::Text("  C1 \n\nC2\r\n C3\n   \n".into());
        assert_eq!(input.normalize(), vec!["C1", "C2", "C3"]);
    }

    #[test]
    fn normalize_list_input() {
        let input = CellsInput::List(vec![" C1".into(), "".into(), "C2 ".into(), "  ".into()]);
        assert_eq!(input.normalize(), vec!["C1", "C2"]);
    }

    #[test]
    fn normalize_preserves_order() {
        let input = CellsInput::Text("B\nA\nC".into());
        assert_eq!(input.normalize(), vec!["B", "A", "C"]);
    }

    #[test]
    fn intra_duplicates_detected() {
        let cells: Vec<String> = ["A", "B", "A"].iter().map(|s| s.to_string()).collect();
        assert_eq!(intra_duplicates(&cells), vec!["A"]);
    }

    #[test]
    fn intra_duplicates_clean_list() {
        let cells: Vec<String> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
        assert!(intra_duplicates(&cells).is_empty());
    }

    #[test]
    fn intra_duplicates_reported_once_in_order() {
        let cells: Vec<String> = ["B", "A", "B", "A", "B"].iter().map(|s| s.to_string()).collect();
        assert_eq!(intra_duplicates(&cells), vec!["B", "A"]);
    }

    #[test]
    fn cell_index_maps_to_owner() {
        let doc = one_pack_doc("P1", "M1", &["X", "Y"]);
        let index = cell_index(&doc);
        let owner = index.get("X").unwrap();
        assert_eq!(owner.pack_serial, "P1");
        assert_eq!(owner.module_serial, "M1");
        assert!(index.get("Z").is_none());
    }

    #[test]
    fn collision_reports_owner() {
        let doc = one_pack_doc("P1", "M1", &["X"]);
        let collisions = find_collisions(&doc, ["X", "C5"], None);
        assert_eq!(
            collisions,
            vec![CellCollision {
                cell: "X".into(),
                pack_serial: "P1".into(),
                module_serial: "M1".into(),
            }]
        );
    }

    #[test]
    fn no_collision_on_fresh_cells() {
        let doc = one_pack_doc("P1", "M1", &["X"]);
        assert!(find_collisions(&doc, ["A", "B"], None).is_empty());
    }

    #[test]
    fn excluded_pack_does_not_collide() {
        let doc = one_pack_doc("P1", "M1", &["X"]);
        assert!(find_collisions(&doc, ["X"], Some("P1")).is_empty());
        assert_eq!(find_collisions(&doc, ["X"], Some("P2")).len(), 1);
    }
}
