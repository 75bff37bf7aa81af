pub mod config;
pub mod module;
pub mod types;

pub use config::ServiceConfig;
pub use module::Module;
pub use types::{ListParams, ListResult, merge_patch, now_rfc3339};
