//! In-memory record store and its flat-file persistence.

mod codec;
mod file;
mod records;

pub use codec::{decode, encode};
pub use file::{load_into, read_store, read_store_or_default, save_store};
pub use records::{Removal, Store};
