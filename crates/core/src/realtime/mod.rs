//! Realtime invalidation.
//!
//! The backend delivers raw change notifications; this module decides what the
//! listing has to refetch and coalesces bursts so that a flurry of uploads
//! results in one refresh cycle.

mod change_event;
mod invalidation_worker;
mod refresh_planner;

pub use change_event::*;
pub use invalidation_worker::*;
pub use refresh_planner::*;
