use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use serde_json::Value;

use super::browse_model::{
    group_grades, group_subjects, group_types, materials_for_subject, Bucket,
};
use super::browse_traits::BrowseServiceTrait;
use crate::constants::NOTES_TABLE;
use crate::errors::Result;
use crate::materials::{MaterialType, StudyMaterial};
use crate::query::{decode_rows, DataClient, Filter, Order, SelectQuery};

pub struct BrowseService {
    client: Arc<dyn DataClient>,
}

impl BrowseService {
    pub fn new(client: Arc<dyn DataClient>) -> Self {
        Self { client }
    }
}

fn text<'a>(row: &'a Value, column: &str) -> Option<&'a str> {
    row.get(column).and_then(Value::as_str)
}

/// Rows without a type are grouped as notes, so the note bucket also lists them.
fn type_filter(material_type: &str) -> Filter {
    if material_type == MaterialType::Note.as_str() {
        Filter::Or(vec![
            Filter::eq("type", material_type),
            Filter::eq("type", Value::Null),
        ])
    } else {
        Filter::eq("type", material_type)
    }
}

#[async_trait]
impl BrowseServiceTrait for BrowseService {
    async fn grades(&self) -> Result<Vec<Bucket>> {
        let rows = self
            .client
            .select(&SelectQuery::new(NOTES_TABLE).columns("grade"))
            .await?;
        Ok(group_grades(rows.iter().map(|r| text(r, "grade"))))
    }

    async fn subjects(&self, grade: &str) -> Result<Vec<Bucket>> {
        let rows = self
            .client
            .select(&SelectQuery::new(NOTES_TABLE).columns("subject").eq("grade", grade))
            .await?;
        Ok(group_subjects(rows.iter().map(|r| text(r, "subject"))))
    }

    async fn types(&self, grade: &str, subject: &str) -> Result<Vec<Bucket>> {
        let rows = self
            .client
            .select(
                &SelectQuery::new(NOTES_TABLE)
                    .columns("type,subject")
                    .eq("grade", grade),
            )
            .await?;
        Ok(group_types(
            rows.iter().map(|r| (text(r, "type"), text(r, "subject"))),
            subject,
        ))
    }

    async fn materials(
        &self,
        grade: &str,
        subject: &str,
        material_type: &str,
    ) -> Result<Vec<StudyMaterial>> {
        let query = SelectQuery::new(NOTES_TABLE)
            .eq("grade", grade)
            .filter(type_filter(material_type))
            .order_by(Order::desc("created_at"));
        let materials: Vec<StudyMaterial> = decode_rows(self.client.select(&query).await?)?;
        debug!(
            "Browse fetched {} {} row(s) for {}, filtering by subject '{}'",
            materials.len(),
            material_type,
            grade,
            subject
        );
        Ok(materials_for_subject(materials, subject))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browse::{BrowseItems, BrowseLevel};
    use crate::query::MemoryDataClient;
    use serde_json::json;

    fn row(id: i64, grade: &str, subject: &str, material_type: Option<&str>, day: u32) -> Value {
        json!({
            "id": id,
            "title": format!("Material {}", id),
            "grade": grade,
            "subject": subject,
            "type": material_type,
            "created_at": format!("2024-03-{:02}T00:00:00+00:00", day),
        })
    }

    fn service() -> (BrowseService, MemoryDataClient) {
        let client = MemoryDataClient::new();
        client
            .seed(
                NOTES_TABLE,
                vec![
                    row(1, "Grade 10", "  Maths ", Some("Note"), 1),
                    row(2, "Grade 10", "maths", Some("Past Paper"), 2),
                    row(3, "Grade 10", "MATHS", Some("Note"), 3),
                    row(4, "Grade 10", "Science", Some("Note"), 4),
                    row(5, "Grade 6-9", "History", None, 5),
                ],
            )
            .unwrap();
        (BrowseService::new(Arc::new(client.clone())), client)
    }

    #[tokio::test]
    async fn test_grades_level_counts_rows() {
        let (service, _) = service();
        let items = service.load(&BrowseLevel::Grades).await.unwrap();
        let BrowseItems::Grades(grades) = items else {
            panic!("expected grades");
        };
        let counts: Vec<(&str, usize)> = grades.iter().map(|b| (b.name.as_str(), b.count)).collect();
        assert_eq!(counts, vec![("Grade 6-9", 1), ("Grade 10", 4)]);
    }

    #[tokio::test]
    async fn test_subjects_of_grade_merge_spellings() {
        let (service, client) = service();
        let subjects = service.subjects("Grade 10").await.unwrap();
        let counts: Vec<(&str, usize)> =
            subjects.iter().map(|b| (b.name.as_str(), b.count)).collect();
        assert_eq!(counts, vec![("Maths", 3), ("Science", 1)]);
        assert_eq!(client.selects_of(NOTES_TABLE, "subject").len(), 1);
    }

    #[tokio::test]
    async fn test_types_of_normalized_subject() {
        let (service, _) = service();
        let types = service.types("Grade 10", "Maths").await.unwrap();
        let counts: Vec<(&str, usize)> = types.iter().map(|b| (b.name.as_str(), b.count)).collect();
        assert_eq!(counts, vec![("Note", 2), ("Past Paper", 1)]);

        let types = service.types("Grade 6-9", "history").await.unwrap();
        assert_eq!(types[0].name, "Note");
    }

    #[tokio::test]
    async fn test_materials_are_filtered_by_subject_newest_first() {
        let (service, _) = service();
        let materials = service.materials("Grade 10", "Maths", "Note").await.unwrap();
        let ids: Vec<String> = materials.iter().map(|m| m.id.to_string()).collect();
        assert_eq!(ids, vec!["3", "1"]);
    }

    #[tokio::test]
    async fn test_untyped_rows_are_listed_under_note() {
        let (service, _) = service();
        let types = service.types("Grade 6-9", "History").await.unwrap();
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].name, "Note");

        let materials = service.materials("Grade 6-9", "History", "Note").await.unwrap();
        assert_eq!(materials.len(), types[0].count);
        assert_eq!(materials[0].id.to_string(), "5");

        let papers = service
            .materials("Grade 6-9", "History", "Past Paper")
            .await
            .unwrap();
        assert!(papers.is_empty());
    }
}
