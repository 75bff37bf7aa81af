pub mod api;
pub mod error;
pub mod labels;
pub mod model;
pub mod scheme;
pub mod service;
pub mod store;
pub mod validate;

use std::sync::Arc;

use axum::Router;
use packtrace_core::Module;

use service::FleetService;

/// Fleet module — battery pack serial tracking.
pub struct FleetModule {
    service: Arc<FleetService>,
}

impl FleetModule {
    pub fn new(service: FleetService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

impl Module for FleetModule {
    fn name(&self) -> &str {
        "fleet"
    }

    fn routes(&self) -> Router {
        api::router(self.service.clone())
    }
}
