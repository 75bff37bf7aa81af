//! Pack allocation engine.
//!
//! Orchestrates one allocation/update transaction against the fleet
//! document: resolve the pack serial, validate the cell lists in fixed
//! order, allocate module serials, persist. Every read-validate-write
//! cycle runs inside [`FleetStore::update`], so concurrent submissions
//! are serialized against the same document.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use tracing::{error, info, warn};

use packtrace_core::now_rfc3339;

use crate::error::FleetError;
use crate::labels::{LabelError, LabelKind, LabelRequest, label_payload};
use crate::model::{FleetDocument, MASTER_ROLE, ModuleSlot, Pack, PackModule};
use crate::scheme;
use crate::store::FleetStore;
use crate::validate;

use super::FleetService;

/// One allocation submission.
#[derive(Debug, Default, Clone)]
pub struct AllocateInput {
    /// Caller-supplied pack serial; None or blank means derive one.
    pub pack_serial: Option<String>,

    /// Raw per-slot cell payloads. None means the slot was not
    /// submitted at all.
    pub cells: [Option<Vec<String>>; 3],

    /// Replace an existing pack record instead of rejecting it.
    pub overwrite: bool,

    /// Operator identity, recorded on the pack.
    pub created_by: Option<String>,
}

impl FleetService {
    /// Preview the next pack serial without allocating it.
    ///
    /// Pure read; repeated calls with no intervening write return the
    /// same value.
    pub fn preview_next_pack_serial(&self) -> Result<String, FleetError> {
        let doc = self.store.snapshot()?;
        Ok(scheme::next_pack_serial(&doc, Utc::now().date_naive()))
    }

    /// Save-only allocation: validate, allocate, and persist the pack
    /// with empty label references. Labels can be generated later via
    /// [`FleetService::regenerate_labels`].
    pub fn allocate(&self, input: AllocateInput) -> Result<Pack, FleetError> {
        let today = Utc::now().date_naive();
        let pack = self
            .store
            .update(|doc| allocate_into(doc, &input, today).map(|(pack, _)| pack))?;
        info!(pack = %pack.pack_serial, modules = pack.modules.len(), "pack allocated");
        Ok(pack)
    }

    /// Combined allocation: reserve the pack, render labels outside the
    /// store lock, then confirm the references in a second transaction.
    ///
    /// A render failure rolls the reservation back (restoring the prior
    /// record when overwriting), so the caller never observes a partial
    /// pack from this flow. The lock is never held across rendering.
    pub fn allocate_with_labels(&self, input: AllocateInput) -> Result<Pack, FleetError> {
        let today = Utc::now().date_naive();
        let (pack, previous) = self.store.update(|doc| allocate_into(doc, &input, today))?;
        let serial = pack.pack_serial.clone();

        match self.render_labels(&pack) {
            Ok(labels) => {
                let pack = self.set_labels(&serial, labels)?;
                info!(pack = %serial, modules = pack.modules.len(), "pack allocated with labels");
                Ok(pack)
            }
            Err(err) => {
                warn!(pack = %serial, error = %err, "label render failed, rolling back allocation");
                let rollback = self.store.update(|doc| {
                    match previous {
                        Some(prev) => doc.packs.insert(serial.clone(), prev),
                        None => doc.packs.remove(&serial),
                    };
                    Ok(())
                });
                if let Err(rollback_err) = rollback {
                    error!(
                        pack = %serial,
                        error = %rollback_err,
                        "rollback after label failure also failed; pack left without labels"
                    );
                    return Err(FleetError::Label(format!(
                        "{err}; rollback also failed: {rollback_err}"
                    )));
                }
                Err(FleetError::Label(err.to_string()))
            }
        }
    }

    /// Re-render labels for an existing pack, keeping its module set.
    pub fn regenerate_labels(&self, serial: &str) -> Result<Pack, FleetError> {
        let pack = self.get_pack(serial)?;
        let labels = self
            .render_labels(&pack)
            .map_err(|e| FleetError::Label(e.to_string()))?;
        let pack = self.set_labels(serial, labels)?;
        info!(pack = %serial, "labels regenerated");
        Ok(pack)
    }

    /// Replace a pack's module cell lists in place.
    ///
    /// One payload per existing module, in slot order. The cross-fleet
    /// collision scan runs against every other pack, so an edit can
    /// never take over a cell that another pack owns.
    pub fn update_cells(
        &self,
        serial: &str,
        payloads: Vec<Vec<String>>,
    ) -> Result<Pack, FleetError> {
        let serial = serial.to_string();
        let pack = self.store.update(move |doc| {
            let module_slots: Vec<ModuleSlot> = {
                let pack = doc
                    .packs
                    .get(&serial)
                    .ok_or_else(|| FleetError::NotFound(format!("pack '{serial}' not found")))?;
                if payloads.len() != pack.modules.len() {
                    return Err(FleetError::Validation(format!(
                        "pack '{}' has {} modules, got {} cell lists",
                        serial,
                        pack.modules.len(),
                        payloads.len()
                    )));
                }
                pack.modules.iter().map(|m| m.slot).collect()
            };

            let slots: Vec<(ModuleSlot, Vec<String>)> = module_slots
                .into_iter()
                .zip(&payloads)
                .map(|(slot, payload)| (slot, validate::normalize_list(payload)))
                .collect();
            // A module never holds zero cells; same rule as allocation.
            for (slot, cells) in &slots {
                if cells.is_empty() {
                    return Err(FleetError::Validation(format!(
                        "cell list for {} is empty",
                        slot.as_str()
                    )));
                }
            }
            check_intra_duplicates(&slots)?;
            check_cross_slot_duplicates(&slots)?;

            let incoming = slots.iter().flat_map(|(_, cells)| cells.iter().map(String::as_str));
            let collisions = validate::find_collisions(doc, incoming, Some(&serial));
            if !collisions.is_empty() {
                return Err(FleetError::CellCollisions(collisions));
            }

            let pack = doc
                .packs
                .get_mut(&serial)
                .ok_or_else(|| FleetError::NotFound(format!("pack '{serial}' not found")))?;
            for (module, (_, cells)) in pack.modules.iter_mut().zip(slots) {
                module.cells = cells;
            }
            Ok(pack.clone())
        })?;
        info!(pack = %pack.pack_serial, "cell lists updated");
        Ok(pack)
    }

    /// Delete a pack, immediately freeing its cells and module serials
    /// for future allocations.
    pub fn delete(&self, serial: &str) -> Result<(), FleetError> {
        let key = serial.to_string();
        self.store.update(move |doc| {
            doc.packs
                .remove(&key)
                .map(|_| ())
                .ok_or_else(|| FleetError::NotFound(format!("pack '{key}' not found")))
        })?;
        info!(pack = %serial, "pack deleted");
        Ok(())
    }

    fn set_labels(
        &self,
        serial: &str,
        labels: BTreeMap<String, String>,
    ) -> Result<Pack, FleetError> {
        let serial = serial.to_string();
        self.store.update(move |doc| {
            let pack = doc
                .packs
                .get_mut(&serial)
                .ok_or_else(|| FleetError::NotFound(format!("pack '{serial}' not found")))?;
            pack.labels = labels;
            Ok(pack.clone())
        })
    }

    fn render_labels(&self, pack: &Pack) -> Result<BTreeMap<String, String>, LabelError> {
        let created_at = pack.created_at.clone().unwrap_or_default();
        let mut labels = BTreeMap::new();

        for module in &pack.modules {
            let req = LabelRequest {
                kind: LabelKind::Barcode,
                pack_serial: pack.pack_serial.clone(),
                role: module.slot.as_str().to_string(),
                payload: label_payload(&module.module_serial, &created_at),
                human_text: module.module_serial.clone(),
            };
            labels.insert(module.slot.as_str().to_string(), self.labels.render(&req)?);
        }

        let req = LabelRequest {
            kind: LabelKind::Qr,
            pack_serial: pack.pack_serial.clone(),
            role: MASTER_ROLE.to_string(),
            payload: label_payload(&pack.pack_serial, &created_at),
            human_text: pack.pack_serial.clone(),
        };
        labels.insert(MASTER_ROLE.to_string(), self.labels.render(&req)?);

        Ok(labels)
    }
}

/// Steps of one allocation against one document snapshot, in the fixed
/// order: resolve serial, determine modules, normalize + duplicate
/// checks, pack-existence check, collision scan, module serial
/// allocation, insert. Returns the new pack and, when overwriting, the
/// record it replaced.
fn allocate_into(
    doc: &mut FleetDocument,
    input: &AllocateInput,
    today: NaiveDate,
) -> Result<(Pack, Option<Pack>), FleetError> {
    // 1. Resolve the pack serial.
    let supplied = input
        .pack_serial
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let pack_serial = match supplied {
        Some(s) => s.to_string(),
        None => scheme::next_pack_serial(doc, today),
    };

    // 2-3. Determine the submitted modules and normalize their cells.
    let slots = submitted_slots(doc, input)?;
    check_intra_duplicates(&slots)?;
    check_cross_slot_duplicates(&slots)?;

    // 4. Existence check, before the collision scan, so the caller gets
    // exists-conflict feedback even when collisions would also occur.
    let previous = doc.packs.get(&pack_serial).cloned();
    if previous.is_some() && !input.overwrite {
        return Err(FleetError::PackExists(pack_serial));
    }

    // 5. Cross-fleet collisions, excluding the pack being replaced.
    let incoming = slots.iter().flat_map(|(_, cells)| cells.iter().map(String::as_str));
    let exclude = previous.is_some().then_some(pack_serial.as_str());
    let collisions = validate::find_collisions(doc, incoming, exclude);
    if !collisions.is_empty() {
        return Err(FleetError::CellCollisions(collisions));
    }

    // 6. Allocate module serials and persist the record.
    let module_serials = scheme::allocate_module_serials(doc, slots.len(), today);
    let modules = module_serials
        .into_iter()
        .zip(slots)
        .map(|(module_serial, (slot, cells))| PackModule { module_serial, slot, cells })
        .collect();

    let pack = Pack {
        pack_serial: pack_serial.clone(),
        created_at: Some(now_rfc3339()),
        created_by: input.created_by.clone(),
        modules,
        labels: BTreeMap::new(),
    };
    doc.packs.insert(pack_serial, pack.clone());
    Ok((pack, previous))
}

/// Which modules this submission creates.
///
/// Non-empty explicit payloads override the configured default: their
/// count determines the module count. With nothing usable submitted the
/// configured slots are required, and the submission is rejected.
fn submitted_slots(
    doc: &FleetDocument,
    input: &AllocateInput,
) -> Result<Vec<(ModuleSlot, Vec<String>)>, FleetError> {
    let slots: Vec<(ModuleSlot, Vec<String>)> = ModuleSlot::ALL
        .iter()
        .zip(&input.cells)
        .filter_map(|(slot, payload)| {
            payload.as_ref().map(|p| (*slot, validate::normalize_list(p)))
        })
        .filter(|(_, cells)| !cells.is_empty())
        .collect();

    if slots.is_empty() {
        let required: Vec<&str> = doc
            .config
            .enabled_modules
            .slots()
            .into_iter()
            .map(|slot| slot.as_str())
            .collect();
        return Err(FleetError::Validation(format!(
            "no cell serials submitted; cell lists required for {}",
            required.join(", ")
        )));
    }

    Ok(slots)
}

fn check_intra_duplicates(slots: &[(ModuleSlot, Vec<String>)]) -> Result<(), FleetError> {
    let mut duplicates = BTreeMap::new();
    for (slot, cells) in slots {
        let dups = validate::intra_duplicates(cells);
        if !dups.is_empty() {
            duplicates.insert(slot.as_str().to_string(), dups);
        }
    }
    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(FleetError::IntraDuplicates { duplicates })
    }
}

/// A cell may not appear in two modules of the same submission; that
/// would violate global uniqueness the moment the pack is written.
fn check_cross_slot_duplicates(slots: &[(ModuleSlot, Vec<String>)]) -> Result<(), FleetError> {
    let mut seen: BTreeMap<&str, ModuleSlot> = BTreeMap::new();
    for (slot, cells) in slots {
        for cell in cells {
            if let Some(first) = seen.get(cell.as_str()) {
                return Err(FleetError::Validation(format!(
                    "cell '{}' submitted for both {} and {}",
                    cell,
                    first.as_str(),
                    slot.as_str()
                )));
            }
            seen.insert(cell, *slot);
        }
    }
    Ok(())
}
