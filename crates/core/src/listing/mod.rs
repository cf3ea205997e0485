//! Landing page listing: filters, query building and the debounced view.

mod listing_controller;
mod listing_model;
mod listing_query;
mod listing_state;

pub use listing_controller::*;
pub use listing_model::*;
pub use listing_query::*;
pub use listing_state::*;
