//! Fleet configuration reads and writes.
//!
//! Config mutations go through the same serialized transaction as pack
//! mutations, so a serial allocation never reads a half-applied config.

use packtrace_core::merge_patch;

use crate::error::FleetError;
use crate::model::FleetConfig;
use crate::service::FleetService;

impl FleetService {
    pub fn get_config(&self) -> Result<FleetConfig, FleetError> {
        Ok(self.store.snapshot()?.config)
    }

    /// Replace the fleet configuration wholesale.
    pub fn set_config(&self, config: FleetConfig) -> Result<FleetConfig, FleetError> {
        config
            .validate()
            .map_err(|e| FleetError::Validation(e.to_string()))?;
        self.store.update(|doc| {
            doc.config = config;
            Ok(doc.config.clone())
        })
    }

    /// Apply an RFC 7386 merge patch to the fleet configuration.
    ///
    /// The patched result must still be a complete, valid config;
    /// otherwise nothing is written.
    pub fn patch_config(&self, patch: &serde_json::Value) -> Result<FleetConfig, FleetError> {
        self.store.update(|doc| {
            let mut value = serde_json::to_value(&doc.config)
                .map_err(|e| FleetError::Internal(e.to_string()))?;
            merge_patch(&mut value, patch);
            let patched: FleetConfig = serde_json::from_value(value)
                .map_err(|e| FleetError::Validation(format!("invalid config patch: {e}")))?;
            patched
                .validate()
                .map_err(|e| FleetError::Validation(e.to_string()))?;
            doc.config = patched;
            Ok(doc.config.clone())
        })
    }
}
