//! Thank-you wall.

pub mod thanks_model;
pub mod thanks_service;
pub mod thanks_traits;

pub use thanks_model::*;
pub use thanks_service::ThanksService;
pub use thanks_traits::ThanksServiceTrait;
