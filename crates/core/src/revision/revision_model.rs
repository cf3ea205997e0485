use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::{Error, Result, StorageError, ValidationError};
use crate::storage::{MigrationFn, VersionedRecord};

/// Storage key of the saved card list.
pub const SAVED_CARDS_KEY: &str = "savedRevisionCards";

/// Exam level a card targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "O/L")]
    Ordinary,
    #[serde(rename = "A/L")]
    Advanced,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Ordinary => "O/L",
            Level::Advanced => "A/L",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().replace(['/', '-', '_'], "").as_str() {
            "OL" | "O" => Ok(Level::Ordinary),
            "AL" | "A" => Ok(Level::Advanced),
            _ => Err(ValidationError::InvalidInput(format!("Unknown level '{}'", s)).into()),
        }
    }
}

/// A built-in flash card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RevisionCard {
    pub id: u32,
    pub subject: &'static str,
    pub level: Level,
    pub title: &'static str,
    pub content: &'static str,
    pub category: &'static str,
}

impl RevisionCard {
    /// Text placed on the clipboard.
    pub fn copy_text(&self) -> String {
        format!(
            "{}\n\n{}\n\n- {} ({})",
            self.title, self.content, self.subject, self.level
        )
    }
}

/// Ids of the cards the student bookmarked, in the order they were saved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCards {
    pub card_ids: Vec<u32>,
}

impl SavedCards {
    pub fn contains(&self, id: u32) -> bool {
        self.card_ids.contains(&id)
    }

    /// Saves or unsaves `id`. Returns whether it is saved afterwards.
    pub fn toggle(&mut self, id: u32) -> bool {
        if self.contains(id) {
            self.card_ids.retain(|c| *c != id);
            false
        } else {
            self.card_ids.push(id);
            true
        }
    }
}

const SAVED_CARDS_MIGRATIONS: &[(u32, MigrationFn)] = &[(0, migrate_saved_cards_v0)];

impl VersionedRecord for SavedCards {
    const STORAGE_KEY: &'static str = SAVED_CARDS_KEY;
    const CURRENT_VERSION: u32 = 1;

    fn migrations() -> &'static [(u32, MigrationFn)] {
        SAVED_CARDS_MIGRATIONS
    }
}

/// Legacy blobs held whole card objects; keep only their ids.
fn migrate_saved_cards_v0(legacy: Value) -> Result<Value> {
    let cards = legacy.as_array().ok_or_else(|| StorageError::Corrupt {
        key: SAVED_CARDS_KEY.to_string(),
        message: "legacy saved cards are not a list".to_string(),
    })?;
    let mut ids: Vec<u64> = Vec::new();
    for id in cards.iter().filter_map(|c| c.get("id").and_then(Value::as_u64)) {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(json!({ "card_ids": ids }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{load_versioned, save_versioned, LocalStore, MemoryLocalStore};

    #[test]
    fn test_level_parsing() {
        assert_eq!("O/L".parse::<Level>().unwrap(), Level::Ordinary);
        assert_eq!("al".parse::<Level>().unwrap(), Level::Advanced);
        assert!("B/L".parse::<Level>().is_err());
    }

    #[test]
    fn test_toggle() {
        let mut saved = SavedCards::default();
        assert!(saved.toggle(3));
        assert!(saved.toggle(1));
        assert!(!saved.toggle(3));
        assert_eq!(saved.card_ids, vec![1]);
    }

    #[test]
    fn test_legacy_card_objects_become_ids() {
        let store = MemoryLocalStore::new();
        store
            .set(
                SAVED_CARDS_KEY,
                r#"[{"id":12,"title":"Ohm's Law","content":"V = IR","category":"Electricity"},{"id":4,"title":"Trig"}]"#,
            )
            .unwrap();

        let saved: SavedCards = load_versioned(&store).unwrap().unwrap();
        assert_eq!(saved.card_ids, vec![12, 4]);

        save_versioned(&store, &saved).unwrap();
        let raw = store.get(SAVED_CARDS_KEY).unwrap().unwrap();
        assert_eq!(raw, r#"{"version":1,"data":{"card_ids":[12,4]}}"#);
    }

    #[test]
    fn test_copy_text() {
        let card = RevisionCard {
            id: 12,
            subject: "Physics",
            level: Level::Ordinary,
            title: "Ohm's Law",
            content: "V = IR",
            category: "Electricity",
        };
        assert_eq!(card.copy_text(), "Ohm's Law\n\nV = IR\n\n- Physics (O/L)");
    }
}
