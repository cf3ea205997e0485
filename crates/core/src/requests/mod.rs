//! Community request board.

pub mod requests_model;
pub mod requests_service;
pub mod requests_traits;

pub use requests_model::*;
pub use requests_service::RequestService;
pub use requests_traits::RequestServiceTrait;
