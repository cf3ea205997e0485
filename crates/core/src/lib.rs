//! StudyShare Core - Domain models, services, and traits.
//!
//! This crate contains the client logic for the StudyShare study-materials
//! site. It is backend-agnostic: remote tables are reached through the
//! [`query::DataClient`] trait, which the `studyshare-backend` crate
//! implements for the hosted REST API, and realtime notifications arrive as
//! [`realtime::ChangeEvent`]s.

pub mod browse;
pub mod constants;
pub mod errors;
pub mod listing;
pub mod materials;
pub mod planner;
pub mod query;
pub mod realtime;
pub mod requests;
pub mod revision;
pub mod stats;
pub mod storage;
pub mod thanks;
pub mod utils;

// Re-export the types most callers need
pub use materials::{MaterialService, MaterialServiceTrait, StudyMaterial};
pub use query::{DataClient, MemoryDataClient, SelectQuery};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
