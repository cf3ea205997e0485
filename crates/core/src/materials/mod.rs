//! Study materials: models, traits and the service over the `notes` table.

pub mod materials_model;
pub mod materials_service;
pub mod materials_traits;

pub use materials_model::*;
pub use materials_service::MaterialService;
pub use materials_traits::MaterialServiceTrait;
