//! Study planner: exam countdown, generated schedule and progress.

pub mod planner_export;
pub mod planner_model;
pub mod planner_service;
mod study_plan;

pub use planner_export::{export_schedule, share_summary};
pub use planner_model::*;
pub use planner_service::PlannerService;
