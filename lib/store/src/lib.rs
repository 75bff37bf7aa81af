pub mod error;
pub mod mem;
pub mod redb;
pub mod traits;

pub use error::StoreError;
pub use mem::MemDocStore;
pub use redb::RedbDocStore;
pub use traits::DocStore;
