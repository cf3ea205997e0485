//! Client-local persisted state.

mod file_store;
mod memory_store;
mod store_traits;
pub mod versioned;

pub use file_store::FileLocalStore;
pub use memory_store::MemoryLocalStore;
pub use store_traits::LocalStore;
pub use versioned::{load_versioned, save_versioned, MigrationFn, VersionedRecord};
