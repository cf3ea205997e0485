//! Change notifications delivered by the realtime channel.

use serde::{Deserialize, Serialize};

use crate::query::Row;

/// Kind of row change reported by the hosted table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// One change notification. `record` holds the new row when the channel
/// delivers it; consumers must not rely on it being present.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: String,
    pub kind: ChangeKind,
    pub record: Option<Row>,
}

impl ChangeEvent {
    pub fn insert(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            kind: ChangeKind::Insert,
            record: None,
        }
    }

    pub fn update(table: impl Into<String>, record: Option<Row>) -> Self {
        Self {
            table: table.into(),
            kind: ChangeKind::Update,
            record,
        }
    }
}
