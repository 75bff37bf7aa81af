//! Typed, serialized access to the persisted fleet document.

use std::sync::Mutex;

use packtrace_store::DocStore;

use crate::error::FleetError;
use crate::model::FleetDocument;

/// Wraps the document store with the locking the engine requires.
///
/// The backing store only offers read-whole / write-whole, so two
/// submissions that each read before either writes could both validate
/// against the same stale snapshot and both write. Every
/// read-modify-write cycle therefore runs under one mutex: a
/// transaction sees the previous transaction's write, always.
pub struct FleetStore {
    backend: Box<dyn DocStore>,
    txn: Mutex<()>,
}

impl FleetStore {
    pub fn new(backend: Box<dyn DocStore>) -> Self {
        Self {
            backend,
            txn: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<FleetDocument, FleetError> {
        match self.backend.read()? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| FleetError::Internal(format!("corrupt fleet document: {e}"))),
            None => Ok(FleetDocument::default()),
        }
    }

    /// Read-only snapshot of the current document.
    pub fn snapshot(&self) -> Result<FleetDocument, FleetError> {
        let _guard = self
            .txn
            .lock()
            .map_err(|_| FleetError::Internal("store lock poisoned".into()))?;
        self.load()
    }

    /// Serialized read-modify-write transaction.
    ///
    /// The closure's error aborts the transaction with nothing written
    /// (validate-then-commit, never commit-then-rollback).
    pub fn update<T>(
        &self,
        f: impl FnOnce(&mut FleetDocument) -> Result<T, FleetError>,
    ) -> Result<T, FleetError> {
        let _guard = self
            .txn
            .lock()
            .map_err(|_| FleetError::Internal("store lock poisoned".into()))?;
        let mut doc = self.load()?;
        let out = f(&mut doc)?;
        let bytes = serde_json::to_vec(&doc)
            .map_err(|e| FleetError::Internal(format!("serialize fleet document: {e}")))?;
        self.backend.write(&bytes)?;
        Ok(out)
    }
}
