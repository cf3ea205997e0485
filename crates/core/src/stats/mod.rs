//! Impact dashboard statistics.

pub mod stats_calculator;
pub mod stats_model;
pub mod stats_service;

pub use stats_calculator::{analyze_gaps, build_report};
pub use stats_model::*;
pub use stats_service::{StatsService, StatsServiceTrait};
