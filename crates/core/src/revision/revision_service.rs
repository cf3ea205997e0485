use std::sync::Arc;

use log::warn;

use super::revision_catalog::card_by_id;
use super::revision_model::{RevisionCard, SavedCards};
use crate::errors::{Error, Result, StorageError};
use crate::storage::{load_versioned, save_versioned, LocalStore};

/// Bookmarks over the built-in catalog, persisted in a [`LocalStore`].
pub struct RevisionService {
    store: Arc<dyn LocalStore>,
}

impl RevisionService {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    pub fn saved(&self) -> Result<SavedCards> {
        match load_versioned::<SavedCards>(self.store.as_ref()) {
            Ok(saved) => Ok(saved.unwrap_or_default()),
            Err(Error::Storage(StorageError::Corrupt { key, message })) => {
                warn!("Discarding unreadable '{}': {}", key, message);
                Ok(SavedCards::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Saves or unsaves a card. Returns whether it is saved afterwards.
    pub fn toggle_saved(&self, card_id: u32) -> Result<bool> {
        let mut saved = self.saved()?;
        let now_saved = saved.toggle(card_id);
        save_versioned(self.store.as_ref(), &saved)?;
        Ok(now_saved)
    }

    /// Saved cards that still exist in the catalog, in save order.
    pub fn saved_cards(&self) -> Result<Vec<&'static RevisionCard>> {
        Ok(self
            .saved()?
            .card_ids
            .into_iter()
            .filter_map(card_by_id)
            .collect())
    }
}
