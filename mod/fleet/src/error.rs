use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::validate::CellCollision;

// ── Error codes ─────────────────────────────────────────────────────
//
// Stable, machine-readable identifiers. Clients match on these —
// never on the human-readable message string.

/// Stable error code constants.
///
/// Clients should match on `code` from
/// `{"code": "CELL_COLLISION", "message": "...", "details": {...}}`.
/// Codes never change; messages may be reworded.
pub mod error_code {
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const DUPLICATE_CELLS: &str = "DUPLICATE_CELLS";
    pub const ALREADY_EXISTS: &str = "ALREADY_EXISTS";
    pub const CELL_COLLISION: &str = "CELL_COLLISION";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const LABEL_FAILED: &str = "LABEL_FAILED";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const INTERNAL: &str = "INTERNAL";
}

// ── FleetError ──────────────────────────────────────────────────────

/// Unified error type for the fleet module.
///
/// Each variant maps to a stable error code (see [`error_code`]) and an
/// HTTP status code. Conflict variants carry their full detail — the
/// complete per-module duplicate listing, the complete collision list —
/// which lands in the `details` field of the JSON response, never
/// summarized away.
#[derive(Error, Debug)]
pub enum FleetError {
    /// Input data is invalid (missing required cell payloads, bad
    /// config values). HTTP 400.
    #[error("{0}")]
    Validation(String),

    /// A submitted module cell list contains duplicates. HTTP 400.
    #[error("duplicate cell serials within a module")]
    IntraDuplicates {
        /// Slot role -> the serials duplicated within that slot's list.
        duplicates: BTreeMap<String, Vec<String>>,
    },

    /// The resolved pack serial already has a record and overwrite was
    /// not requested. HTTP 409.
    #[error("pack '{0}' already exists")]
    PackExists(String),

    /// Submitted cells are already recorded elsewhere in the fleet.
    /// HTTP 409.
    #[error("{} cell serial(s) already recorded elsewhere in the fleet", .0.len())]
    CellCollisions(Vec<CellCollision>),

    /// Resource does not exist. HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// The downstream label renderer failed. HTTP 502.
    #[error("label generation failed: {0}")]
    Label(String),

    /// Storage backend failure. HTTP 500.
    #[error("{0}")]
    Storage(String),

    /// Unexpected internal error. HTTP 500.
    #[error("{0}")]
    Internal(String),
}

impl FleetError {
    /// Stable, machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            FleetError::Validation(_) => error_code::VALIDATION_FAILED,
            FleetError::IntraDuplicates { .. } => error_code::DUPLICATE_CELLS,
            FleetError::PackExists(_) => error_code::ALREADY_EXISTS,
            FleetError::CellCollisions(_) => error_code::CELL_COLLISION,
            FleetError::NotFound(_) => error_code::NOT_FOUND,
            FleetError::Label(_) => error_code::LABEL_FAILED,
            FleetError::Storage(_) => error_code::STORAGE_ERROR,
            FleetError::Internal(_) => error_code::INTERNAL,
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            FleetError::Validation(_) => StatusCode::BAD_REQUEST,
            FleetError::IntraDuplicates { .. } => StatusCode::BAD_REQUEST,
            FleetError::PackExists(_) => StatusCode::CONFLICT,
            FleetError::CellCollisions(_) => StatusCode::CONFLICT,
            FleetError::NotFound(_) => StatusCode::NOT_FOUND,
            FleetError::Label(_) => StatusCode::BAD_GATEWAY,
            FleetError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            FleetError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Structured detail for the JSON response, Null when there is none.
    pub fn details(&self) -> serde_json::Value {
        match self {
            FleetError::IntraDuplicates { duplicates } => {
                serde_json::json!({ "duplicates": duplicates })
            }
            FleetError::CellCollisions(collisions) => {
                serde_json::json!({ "collisions": collisions })
            }
            FleetError::PackExists(serial) => {
                serde_json::json!({ "packSerial": serial })
            }
            _ => serde_json::Value::Null,
        }
    }
}

impl From<packtrace_store::StoreError> for FleetError {
    fn from(err: packtrace_store::StoreError) -> Self {
        FleetError::Storage(err.to_string())
    }
}

impl IntoResponse for FleetError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut body = serde_json::json!({
            "code": self.error_code(),
            "message": self.to_string(),
        });
        let details = self.details();
        if !details.is_null() {
            body["details"] = details;
        }
        (status, axum::Json(body)).into_response()
    }
}
