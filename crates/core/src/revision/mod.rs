//! Quick revision cards.

pub mod revision_catalog;
pub mod revision_deck;
pub mod revision_model;
pub mod revision_service;

pub use revision_catalog::{card_by_id, cards_for, subjects, CATALOG};
pub use revision_deck::{saved_cards_text, Deck};
pub use revision_model::*;
pub use revision_service::RevisionService;
