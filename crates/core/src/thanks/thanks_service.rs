use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::warn;
use serde_json::Value;

use super::thanks_model::{NewThankYouNote, ThankYouNote};
use super::thanks_traits::ThanksServiceTrait;
use crate::constants::{NOTES_TABLE, THANK_YOU_TABLE};
use crate::errors::Result;
use crate::materials::author_display;
use crate::query::{decode_row, decode_rows, DataClient, Order, SelectQuery};

pub struct ThanksService {
    client: Arc<dyn DataClient>,
}

impl ThanksService {
    pub fn new(client: Arc<dyn DataClient>) -> Self {
        Self { client }
    }

    async fn fetch_notes(&self) -> Result<Vec<ThankYouNote>> {
        let query = SelectQuery::new(THANK_YOU_TABLE).order_by(Order::desc("created_at"));
        decode_rows(self.client.select(&query).await?)
    }
}

#[async_trait]
impl ThanksServiceTrait for ThanksService {
    async fn list_notes(&self) -> Vec<ThankYouNote> {
        match self.fetch_notes().await {
            Ok(notes) => notes,
            Err(e) => {
                warn!("Thank-you notes unavailable: {}", e);
                Vec::new()
            }
        }
    }

    async fn submit_note(&self, note: NewThankYouNote) -> Result<ThankYouNote> {
        let row = note.into_row(Utc::now())?;
        let stored = self
            .client
            .insert(THANK_YOU_TABLE, serde_json::to_value(&row)?)
            .await?;
        decode_row(stored)
    }

    async fn contributors(&self) -> Result<Vec<String>> {
        let rows = self
            .client
            .select(&SelectQuery::new(NOTES_TABLE).columns("author"))
            .await?;
        let names: BTreeSet<String> = rows
            .iter()
            .map(|r| author_display(r.get("author").and_then(Value::as_str)).to_string())
            .collect();
        Ok(names.into_iter().collect())
    }
}
