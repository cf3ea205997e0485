//! Query model and the data collaborator seam.

mod memory_client;
mod query_model;
mod query_traits;

pub use memory_client::MemoryDataClient;
pub use query_model::*;
pub use query_traits::*;
