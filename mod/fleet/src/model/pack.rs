use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Logical position of a module within a pack.
///
/// Slot names double as label roles; the pack-level QR label uses the
/// extra role `"master"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleSlot {
    Module1,
    Module2,
    Module3,
}

impl ModuleSlot {
    pub const ALL: [ModuleSlot; 3] = [ModuleSlot::Module1, ModuleSlot::Module2, ModuleSlot::Module3];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleSlot::Module1 => "module1",
            ModuleSlot::Module2 => "module2",
            ModuleSlot::Module3 => "module3",
        }
    }
}

/// Label role for the pack-level QR label.
pub const MASTER_ROLE: &str = "master";

/// One module of a pack: a scheme-generated serial plus the ordered
/// list of cell serials it owns. A module belongs to exactly one pack
/// for its lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackModule {
    /// Module serial — unique across the fleet.
    pub module_serial: String,

    /// Which slot this module occupies.
    pub slot: ModuleSlot,

    /// Cell serials in submission order. No duplicates.
    pub cells: Vec<String>,
}

/// A finished battery pack. PK = pack_serial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pack {
    /// Pack serial number — primary key.
    pub pack_serial: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,

    /// Modules in slot order.
    pub modules: Vec<PackModule>,

    /// Label references (URL/path) keyed by role: slot names + "master".
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

impl Pack {
    /// Iterate every cell serial in this pack.
    pub fn cells(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().flat_map(|m| m.cells.iter()).map(String::as_str)
    }

    /// Find the module occupying a given slot.
    pub fn module(&self, slot: ModuleSlot) -> Option<&PackModule> {
        self.modules.iter().find(|m| m.slot == slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_wire_names() {
        assert_eq!(serde_json::to_string(&ModuleSlot::Module1).unwrap(), "\"module1\"");
        assert_eq!(serde_json::to_string(&ModuleSlot::Module3).unwrap(), "\"module3\"");
    }

    #[test]
    fn pack_json_roundtrip() {
        let mut labels = BTreeMap::new();
        labels.insert("module1".to_string(), "labels/P1/module1.svg".to_string());
        labels.insert("master".to_string(), "labels/P1/master.svg".to_string());
        let pack = Pack {
            pack_serial: "RIV2603LFP90010001".into(),
            created_at: Some("2026-03-15T08:00:00Z".into()),
            created_by: None,
            modules: vec![PackModule {
                module_serial: "RVM152600001".into(),
                slot: ModuleSlot::Module1,
                cells: vec!["C1".into(), "C2".into()],
            }],
            labels,
        };
        let json = serde_json::to_string(&pack).unwrap();
        let back: Pack = serde_json::from_str(&json).unwrap();
        assert_eq!(pack, back);
    }

    #[test]
    fn cells_preserve_order() {
        let pack = Pack {
            pack_serial: "P".into(),
            created_at: None,
            created_by: None,
            modules: vec![
                PackModule {
                    module_serial: "M1".into(),
                    slot: ModuleSlot::Module1,
                    cells: vec!["B".into(), "A".into()],
                },
                PackModule {
                    module_serial: "M2".into(),
                    slot: ModuleSlot::Module2,
                    cells: vec!["C".into()],
                },
            ],
            labels: BTreeMap::new(),
        };
        let cells: Vec<&str> = pack.cells().collect();
        assert_eq!(cells, vec!["B", "A", "C"]);
        assert_eq!(pack.module(ModuleSlot::Module2).unwrap().module_serial, "M2");
        assert!(pack.module(ModuleSlot::Module3).is_none());
    }
}
