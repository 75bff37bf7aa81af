//! Module serial scheme: `RVM` + DD + YY + 5-digit counter.
//!
//! The counter conceptually resets per calendar day (the prefix changes
//! each day) and is recomputed on every call from the serials actually
//! present in the document, so it self-heals after deletions or manual
//! edits.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};

use crate::model::FleetDocument;

/// Fixed scheme tag every module serial starts with.
pub const MODULE_SERIAL_TAG: &str = "RVM";

/// Width of the running counter suffix.
const COUNTER_WIDTH: usize = 5;

/// The fixed per-day part of a module serial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModulePrefix {
    /// Day of month 1-31.
    pub day: u32,
    /// Two-digit year.
    pub year: u32,
}

impl ModulePrefix {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            day: date.day(),
            year: date.year() as u32 % 100,
        }
    }
}

impl std::fmt::Display for ModulePrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{MODULE_SERIAL_TAG}{:02}{:02}", self.day, self.year)
    }
}

/// Extract the counter from `serial` if it belongs to `prefix`.
fn counter(serial: &str, prefix: &str) -> Option<u32> {
    let rest = serial.strip_prefix(prefix)?;
    if rest.len() != COUNTER_WIDTH || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    rest.parse().ok()
}

/// Allocate `count` fresh module serials under the given date's prefix.
///
/// Scans every module serial across all packs for the highest counter
/// under the prefix, then yields `count` consecutive serials from
/// there, skipping any value that somehow already exists (races and
/// manual data edits). Results from two calls are only disjoint if the
/// caller persists the document in between.
pub fn allocate_module_serials(doc: &FleetDocument, count: usize, date: NaiveDate) -> Vec<String> {
    debug_assert!((1..=3).contains(&count), "count must be 1-3, got {count}");

    let prefix = ModulePrefix::from_date(date).to_string();
    let existing: HashSet<&str> = doc.module_serials().collect();
    let mut next = existing
        .iter()
        .filter_map(|serial| counter(serial, &prefix))
        .max()
        .unwrap_or(0)
        + 1;

    let mut out = Vec::with_capacity(count);
    while out.len() < count {
        let candidate = format!("{prefix}{next:0width$}", width = COUNTER_WIDTH);
        next += 1;
        if existing.contains(candidate.as_str()) {
            continue;
        }
        out.push(candidate);
    }
    out
}
