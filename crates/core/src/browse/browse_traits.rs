use async_trait::async_trait;

use super::browse_model::{BrowseItems, BrowseLevel, Bucket};
use crate::errors::Result;
use crate::materials::StudyMaterial;

/// Queries behind the browse drill-down. Every call hits the backend.
#[async_trait]
pub trait BrowseServiceTrait: Send + Sync {
    async fn grades(&self) -> Result<Vec<Bucket>>;

    async fn subjects(&self, grade: &str) -> Result<Vec<Bucket>>;

    async fn types(&self, grade: &str, subject: &str) -> Result<Vec<Bucket>>;

    async fn materials(
        &self,
        grade: &str,
        subject: &str,
        material_type: &str,
    ) -> Result<Vec<StudyMaterial>>;

    /// Loads whatever `level` lists.
    async fn load(&self, level: &BrowseLevel) -> Result<BrowseItems> {
        Ok(match level {
            BrowseLevel::Grades => BrowseItems::Grades(self.grades().await?),
            BrowseLevel::Subjects { grade } => BrowseItems::Subjects(self.subjects(grade).await?),
            BrowseLevel::Types { grade, subject } => {
                BrowseItems::Types(self.types(grade, subject).await?)
            }
            BrowseLevel::Materials {
                grade,
                subject,
                material_type,
            } => BrowseItems::Materials(self.materials(grade, subject, material_type).await?),
        })
    }
}
