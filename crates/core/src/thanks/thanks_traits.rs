use async_trait::async_trait;

use super::thanks_model::{NewThankYouNote, ThankYouNote};
use crate::errors::Result;

#[async_trait]
pub trait ThanksServiceTrait: Send + Sync {
    /// Notes newest first. A failing backend yields an empty wall.
    async fn list_notes(&self) -> Vec<ThankYouNote>;

    async fn submit_note(&self, note: NewThankYouNote) -> Result<ThankYouNote>;

    /// Public contributor names from the materials table, sorted and distinct.
    async fn contributors(&self) -> Result<Vec<String>>;
}
