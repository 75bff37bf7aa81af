use crate::error::StoreError;

/// DocStore persists one versioned document as an opaque byte blob.
///
/// The contract is read-whole-document / write-whole-document: there is
/// no partial update primitive. A write must either apply completely or
/// not at all — implementations back each write with a single storage
/// transaction. Sequencing of read-modify-write cycles is the caller's
/// responsibility.
pub trait DocStore: Send + Sync {
    /// Read the current document. Returns None if none has been written yet.
    fn read(&self) -> Result<Option<Vec<u8>>, StoreError>;

    /// Replace the document atomically.
    fn write(&self, doc: &[u8]) -> Result<(), StoreError>;
}
