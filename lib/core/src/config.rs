use std::path::PathBuf;

/// Common runtime configuration shared by service binaries.
///
/// The binary parses its own CLI/TOML configuration, then fills this in
/// and hands it to storage layer initialization.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Base data directory for all persisted state.
    pub data_dir: Option<PathBuf>,

    /// Path to the redb document database file.
    /// Defaults to `{data_dir}/fleet.redb` if not specified.
    pub db_path: Option<PathBuf>,

    /// Directory where generated label files are written.
    /// Defaults to `{data_dir}/labels/` if not specified.
    pub labels_dir: Option<PathBuf>,

    /// Listen address for the HTTP server.
    pub listen: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            db_path: None,
            labels_dir: None,
            listen: "0.0.0.0:8080".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Resolve the document database path, falling back to `{data_dir}/fleet.redb`.
    pub fn resolve_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| self.resolve_data_subpath("fleet.redb"))
    }

    /// Resolve the label output directory, falling back to `{data_dir}/labels`.
    pub fn resolve_labels_dir(&self) -> PathBuf {
        self.labels_dir
            .clone()
            .unwrap_or_else(|| self.resolve_data_subpath("labels"))
    }

    fn resolve_data_subpath(&self, name: &str) -> PathBuf {
        self.data_dir
            .as_ref()
            .map(|d| d.join(name))
            .unwrap_or_else(|| PathBuf::from(name))
    }
}
