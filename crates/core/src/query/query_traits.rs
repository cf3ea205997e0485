use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::query_model::{Filter, Row, SelectQuery};
use crate::errors::{RemoteError, Result};

/// The hosted table API the client talks to.
///
/// Implementations must not retry; callers decide what a failure means.
#[async_trait]
pub trait DataClient: Send + Sync {
    /// Runs a select and returns the matching rows in order.
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Row>>;

    /// Inserts one row and returns it as stored (with generated columns).
    async fn insert(&self, table: &str, row: Row) -> Result<Row>;

    /// Replaces the given fields on every row matching `filters`.
    /// Returns the updated rows.
    async fn update(&self, table: &str, filters: &[Filter], patch: Row) -> Result<Vec<Row>>;
}

/// Decodes raw rows into a typed model.
pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>> {
    rows.into_iter().map(decode_row).collect()
}

pub fn decode_row<T: DeserializeOwned>(row: Row) -> Result<T> {
    serde_json::from_value(row).map_err(|e| RemoteError::Decode(e.to_string()).into())
}
