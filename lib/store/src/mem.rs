use std::sync::Mutex;

use crate::error::StoreError;
use crate::traits::DocStore;

/// In-memory DocStore, used by tests and throwaway deployments.
#[derive(Default)]
pub struct MemDocStore {
    doc: Mutex<Option<Vec<u8>>>,
}

impl DocStore for MemDocStore {
    fn read(&self) -> Result<Option<Vec<u8>>, StoreError> {
        let doc = self
            .doc
            .lock()
            .map_err(|_| StoreError::Storage("poisoned lock".into()))?;
        Ok(doc.clone())
    }

    fn write(&self, bytes: &[u8]) -> Result<(), StoreError> {
        let mut doc = self
            .doc
            .lock()
            .map_err(|_| StoreError::Storage("poisoned lock".into()))?;
        *doc = Some(bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_reads_none() {
        let store = MemDocStore::default();
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn write_read_roundtrip() {
        let store = MemDocStore::default();
        store.write(b"abc").unwrap();
        assert_eq!(store.read().unwrap().unwrap(), b"abc");
    }
}
