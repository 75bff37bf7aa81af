//! Bootstrap — first-start checks and fleet document seeding.

use fleet::store::FleetStore;
use tracing::info;

use crate::config::ServerConfig;

/// Verify server configuration before anything touches disk.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.storage.data_dir.is_empty() {
        anyhow::bail!("Storage data_dir is empty in configuration.");
    }
    if config.listen.is_empty() {
        anyhow::bail!("Listen address is empty in configuration.");
    }
    Ok(())
}

/// Ensure the fleet document exists with a valid default configuration.
///
/// Writing the default document on first start means every later read
/// path deals with a well-formed document, never an absent one.
pub fn ensure_fleet_document(store: &FleetStore) -> anyhow::Result<()> {
    let doc = store
        .update(|doc| Ok(doc.clone()))
        .map_err(|e| anyhow::anyhow!("failed to initialize fleet document: {e}"))?;
    info!(
        packs = doc.packs.len(),
        model_code = %doc.config.model_code,
        batch_code = %doc.config.batch_code,
        "fleet document ready"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use packtrace_store::MemDocStore;

    use super::*;

    #[test]
    fn verify_config_rejects_empty_data_dir() {
        let config = ServerConfig {
            storage: crate::config::StorageConfig {
                data_dir: String::new(),
            },
            ..Default::default()
        };
        assert!(verify_config(&config).is_err());
    }

    #[test]
    fn verify_config_accepts_defaults() {
        assert!(verify_config(&ServerConfig::default()).is_ok());
    }

    #[test]
    fn bootstrap_seeds_default_document() {
        let store = FleetStore::new(Box::new(MemDocStore::default()));
        ensure_fleet_document(&store).unwrap();
        let doc = store.snapshot().unwrap();
        assert!(doc.packs.is_empty());
        assert_eq!(doc.config.model_code, "LFP9");
    }
}
