use serde::{Deserialize, Serialize};

use super::ModuleSlot;

/// Which module slots a newly generated pack must fill.
///
/// Slots enable contiguously from module1: a two-module fleet runs
/// m1+m2, never m1+m3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnabledModules {
    pub m1: bool,
    pub m2: bool,
    pub m3: bool,
}

impl Default for EnabledModules {
    fn default() -> Self {
        Self { m1: true, m2: true, m3: false }
    }
}

impl EnabledModules {
    /// Number of modules a generated pack gets by default.
    pub fn count(&self) -> usize {
        [self.m1, self.m2, self.m3].iter().filter(|&&e| e).count()
    }

    /// The enabled slots in order.
    pub fn slots(&self) -> Vec<ModuleSlot> {
        ModuleSlot::ALL
            .into_iter()
            .zip([self.m1, self.m2, self.m3])
            .filter_map(|(slot, enabled)| enabled.then_some(slot))
            .collect()
    }
}

/// Global fleet configuration, read by every serial-scheme computation.
/// Mutated only through an explicit configuration update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetConfig {
    /// Active pack-numbering model code (e.g. "LFP9").
    pub model_code: String,

    /// Active batch code, left-padded to 3 digits in serials.
    pub batch_code: String,

    /// Which module slots are enabled.
    #[serde(default)]
    pub enabled_modules: EnabledModules,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            model_code: "LFP9".into(),
            batch_code: "001".into(),
            enabled_modules: EnabledModules::default(),
        }
    }
}

impl FleetConfig {
    /// Validate the configuration before it is committed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model_code.is_empty() || !self.model_code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::BadModelCode(self.model_code.clone()));
        }

        match self.batch_code.parse::<u32>() {
            Ok(n) if n <= 999 => {}
            _ => return Err(ConfigError::BadBatchCode(self.batch_code.clone())),
        }

        let e = &self.enabled_modules;
        if !e.m1 {
            return Err(ConfigError::NoSlotsEnabled);
        }
        if e.m3 && !e.m2 {
            return Err(ConfigError::NonContiguousSlots);
        }

        Ok(())
    }

    /// Batch code as it appears in pack serials.
    pub fn batch_code_padded(&self) -> String {
        format!("{:0>3}", self.batch_code)
    }
}

/// Fleet configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("model code must be non-empty alphanumeric, got '{0}'")]
    BadModelCode(String),

    #[error("batch code must be a number between 0 and 999, got '{0}'")]
    BadBatchCode(String),

    #[error("module1 must be enabled")]
    NoSlotsEnabled,

    #[error("module slots must be enabled contiguously starting at module1")]
    NonContiguousSlots,
}
