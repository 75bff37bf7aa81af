//! Serial number schemes.
//!
//! Each scheme is a small parser/formatter pair with explicit named
//! fields plus a pure computation over the fleet document. Neither
//! scheme keeps a stored counter: the next value is always recomputed
//! from what the document actually contains.

pub mod module;
pub mod pack;

pub use module::{MODULE_SERIAL_TAG, ModulePrefix, allocate_module_serials};
pub use pack::{PACK_SERIAL_TAG, PackPrefix, next_pack_serial};
