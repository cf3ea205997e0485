//! In-process data collaborator.
//!
//! Evaluates the same filters and orderings as the hosted table over rows kept
//! in memory. Used for offline mode and as the collaborator double in tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};

use super::query_model::{Filter, Row, SelectQuery};
use super::query_traits::DataClient;
use crate::errors::{Error, RemoteError, Result};

#[derive(Default)]
struct MemoryState {
    tables: HashMap<String, Vec<Row>>,
    selects: Vec<SelectQuery>,
    updates: usize,
    next_id: i64,
    failure: Option<RemoteError>,
}

/// Shared, cloneable in-memory table store.
#[derive(Clone, Default)]
pub struct MemoryDataClient {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryDataClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the contents of `table`.
    pub fn seed(&self, table: &str, rows: Vec<Row>) -> Result<()> {
        let mut state = self.lock()?;
        let max_id = rows
            .iter()
            .filter_map(|r| r.get("id").and_then(Value::as_i64))
            .max()
            .unwrap_or(0);
        state.next_id = state.next_id.max(max_id);
        state.tables.insert(table.to_string(), rows);
        Ok(())
    }

    /// Makes every following call fail with `failure` until cleared.
    pub fn set_failure(&self, failure: Option<RemoteError>) -> Result<()> {
        self.lock()?.failure = failure;
        Ok(())
    }

    /// Returns every select issued so far, in issue order.
    pub fn selects(&self) -> Vec<SelectQuery> {
        self.lock().map(|s| s.selects.clone()).unwrap_or_default()
    }

    /// Returns the selects issued against `table` for the given column list.
    pub fn selects_of(&self, table: &str, columns: &str) -> Vec<SelectQuery> {
        self.selects()
            .into_iter()
            .filter(|q| q.table == table && q.columns == columns)
            .collect()
    }

    /// Number of update calls received.
    pub fn update_count(&self) -> usize {
        self.lock().map(|s| s.updates).unwrap_or_default()
    }

    /// Returns a snapshot of the rows stored in `table`.
    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.lock()
            .map(|s| s.tables.get(table).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| Error::unexpected("Memory data client lock poisoned"))
    }
}

fn project(row: &Row, columns: &[&str]) -> Row {
    let mut projected = Map::new();
    for column in columns {
        if let Some(value) = row.get(*column) {
            projected.insert((*column).to_string(), value.clone());
        }
    }
    Value::Object(projected)
}

#[async_trait]
impl DataClient for MemoryDataClient {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Row>> {
        let mut state = self.lock()?;
        state.selects.push(query.clone());
        if let Some(failure) = state.failure.clone() {
            return Err(failure.into());
        }

        let mut rows: Vec<Row> = state
            .tables
            .get(&query.table)
            .map(|rows| rows.iter().filter(|r| query.matches(r)).cloned().collect())
            .unwrap_or_default();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| order.compare(a, b));
        }

        Ok(match query.projection() {
            Some(columns) => rows.iter().map(|r| project(r, &columns)).collect(),
            None => rows,
        })
    }

    async fn insert(&self, table: &str, row: Row) -> Result<Row> {
        let mut state = self.lock()?;
        if let Some(failure) = state.failure.clone() {
            return Err(failure.into());
        }

        let Value::Object(mut fields) = row else {
            return Err(RemoteError::Api {
                status: 400,
                message: "insert payload must be an object".to_string(),
            }
            .into());
        };

        if !fields.contains_key("id") {
            state.next_id += 1;
            fields.insert("id".to_string(), Value::from(state.next_id));
        }
        fields
            .entry("created_at".to_string())
            .or_insert_with(|| Value::from(Utc::now().to_rfc3339()));

        let stored = Value::Object(fields);
        state
            .tables
            .entry(table.to_string())
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, table: &str, filters: &[Filter], patch: Row) -> Result<Vec<Row>> {
        let mut state = self.lock()?;
        state.updates += 1;
        if let Some(failure) = state.failure.clone() {
            return Err(failure.into());
        }

        let Value::Object(patch) = patch else {
            return Err(RemoteError::Api {
                status: 400,
                message: "update payload must be an object".to_string(),
            }
            .into());
        };

        let mut updated = Vec::new();
        if let Some(rows) = state.tables.get_mut(table) {
            for row in rows.iter_mut() {
                if !filters.iter().all(|f| f.matches(row)) {
                    continue;
                }
                if let Value::Object(fields) = row {
                    for (key, value) in &patch {
                        fields.insert(key.clone(), value.clone());
                    }
                }
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }
}
