//! Pack serial scheme: `RIV` + YY + MM + model code + batch + unit counter.
//!
//! Example: `RIV2603LFP90010001` — scheme tag, year 26, month 03, model
//! LFP9, batch 001, unit 0001.

use chrono::{Datelike, NaiveDate};

use crate::model::{FleetConfig, FleetDocument};

/// Fixed scheme tag every pack serial starts with.
pub const PACK_SERIAL_TAG: &str = "RIV";

/// Width of the running unit counter suffix.
const UNIT_WIDTH: usize = 4;

/// The fixed part of a pack serial: everything except the unit counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackPrefix {
    /// Two-digit year.
    pub year: u32,
    /// Month 1-12.
    pub month: u32,
    /// Model code from configuration.
    pub model_code: String,
    /// Batch code, left-padded to 3 digits.
    pub batch_code: String,
}

impl PackPrefix {
    pub fn from_config(config: &FleetConfig, date: NaiveDate) -> Self {
        Self {
            year: date.year() as u32 % 100,
            month: date.month(),
            model_code: config.model_code.clone(),
            batch_code: config.batch_code_padded(),
        }
    }
}

impl std::fmt::Display for PackPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{PACK_SERIAL_TAG}{:02}{:02}{}{}",
            self.year, self.month, self.model_code, self.batch_code
        )
    }
}

/// Extract the unit counter from `serial` if it belongs to `prefix`.
///
/// Serials with the right prefix but a malformed counter (wrong width,
/// non-digits) are ignored rather than treated as zero, so they can
/// never regress the running maximum.
pub fn unit_counter(serial: &str, prefix: &str) -> Option<u32> {
    let rest = serial.strip_prefix(prefix)?;
    if rest.len() != UNIT_WIDTH || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    rest.parse().ok()
}

/// Compute the next unused pack serial for the configured scheme.
///
/// One plus the highest unit counter among packs sharing the given
/// date's prefix, starting at 1 when none exist. Pure function of the
/// document: repeated calls without an intervening write return the
/// same value, which makes it safe for previews.
pub fn next_pack_serial(doc: &FleetDocument, date: NaiveDate) -> String {
    let prefix = PackPrefix::from_config(&doc.config, date).to_string();
    let max = doc
        .packs
        .keys()
        .filter_map(|serial| unit_counter(serial, &prefix))
        .max()
        .unwrap_or(0);
    format!("{prefix}{:0width$}", max + 1, width = UNIT_WIDTH)
}
