mod config;
mod pack;

pub use config::{ConfigError, EnabledModules, FleetConfig};
pub use pack::{MASTER_ROLE, ModuleSlot, Pack, PackModule};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The aggregate root: every pack plus the fleet configuration.
///
/// This is the unit of persistence. Every mutation reads the whole
/// document, computes a new value, and writes the whole document back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetDocument {
    /// All packs, keyed by pack serial.
    #[serde(default)]
    pub packs: BTreeMap<String, Pack>,

    /// The global fleet configuration.
    #[serde(default)]
    pub config: FleetConfig,
}

impl FleetDocument {
    /// Every module serial recorded anywhere in the document.
    pub fn module_serials(&self) -> impl Iterator<Item = &str> {
        self.packs
            .values()
            .flat_map(|p| p.modules.iter())
            .map(|m| m.module_serial.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_json_roundtrip() {
        let mut doc = FleetDocument::default();
        doc.packs.insert(
            "RIV2603LFP90010001".into(),
            Pack {
                pack_serial: "RIV2603LFP90010001".into(),
                created_at: Some("2026-03-15T08:00:00Z".into()),
                created_by: Some("operator".into()),
                modules: vec![PackModule {
                    module_serial: "RVM152600001".into(),
                    slot: ModuleSlot::Module1,
                    cells: vec!["C1".into(), "C2".into()],
                }],
                labels: BTreeMap::new(),
            },
        );
        let json = serde_json::to_string(&doc).unwrap();
        let back: FleetDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(doc, back);
    }

    #[test]
    fn empty_document_deserializes() {
        let doc: FleetDocument = serde_json::from_str("{}").unwrap();
        assert!(doc.packs.is_empty());
        assert_eq!(doc.config, FleetConfig::default());
    }

    #[test]
    fn module_serials_spans_packs() {
        let mut doc = FleetDocument::default();
        for (pack, module) in [("P1", "M1"), ("P2", "M2")] {
            doc.packs.insert(
                pack.into(),
                Pack {
                    pack_serial: pack.into(),
                    created_at: None,
                    created_by: None,
                    modules: vec![PackModule {
                        module_serial: module.into(),
                        slot: ModuleSlot::Module1,
                        cells: vec![],
                    }],
                    labels: BTreeMap::new(),
                },
            );
        }
        let serials: Vec<&str> = doc.module_serials().collect();
        assert_eq!(serials, vec!["M1", "M2"]);
    }
}
