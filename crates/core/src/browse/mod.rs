//! Browse drill-down: grade, then subject, then material type, then materials.

pub mod browse_model;
pub mod browse_navigator;
pub mod browse_service;
pub mod browse_traits;

pub use browse_model::*;
pub use browse_navigator::{BrowseNavigator, BrowseRequest};
pub use browse_service::BrowseService;
pub use browse_traits::BrowseServiceTrait;
