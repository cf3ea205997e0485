use async_trait::async_trait;

use crate::errors::Result;
use crate::materials::materials_model::{CatalogTotals, NewStudyMaterial, StudyMaterial};
use crate::query::SelectQuery;

/// Trait for study material operations
#[async_trait]
pub trait MaterialServiceTrait: Send + Sync {
    /// Runs a prepared listing query against the materials table.
    async fn list_materials(&self, query: &SelectQuery) -> Result<Vec<StudyMaterial>>;

    async fn get_totals(&self) -> Result<CatalogTotals>;

    /// Distinct non-empty subjects, sorted.
    async fn get_subjects(&self) -> Result<Vec<String>>;

    /// Bumps the download counter and returns the file URL to open.
    ///
    /// The counter update is best effort: a failure is logged and the URL is
    /// still returned.
    async fn record_download(&self, material: &StudyMaterial) -> Option<String>;

    async fn publish_material(&self, new_material: NewStudyMaterial) -> Result<StudyMaterial>;
}
