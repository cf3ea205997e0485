use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error};
use serde_json::{json, Value};

use super::materials_model::{CatalogTotals, NewStudyMaterial, StudyMaterial};
use super::materials_traits::MaterialServiceTrait;
use crate::constants::NOTES_TABLE;
use crate::errors::Result;
use crate::query::{decode_row, decode_rows, DataClient, Filter, SelectQuery};

/// Study material operations over the hosted `notes` table.
pub struct MaterialService {
    client: Arc<dyn DataClient>,
}

impl MaterialService {
    pub fn new(client: Arc<dyn DataClient>) -> Self {
        Self { client }
    }

    async fn distinct_column(&self, column: &str) -> Result<Vec<String>> {
        let rows = self
            .client
            .select(&SelectQuery::new(NOTES_TABLE).columns(column))
            .await?;

        let values: BTreeSet<String> = rows
            .iter()
            .filter_map(|row| row.get(column).and_then(Value::as_str))
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect();
        Ok(values.into_iter().collect())
    }
}

#[async_trait]
impl MaterialServiceTrait for MaterialService {
    async fn list_materials(&self, query: &SelectQuery) -> Result<Vec<StudyMaterial>> {
        debug!("Listing materials with {:?}", query);
        let rows = self.client.select(query).await?;
        decode_rows(rows)
    }

    async fn get_totals(&self) -> Result<CatalogTotals> {
        let rows = self
            .client
            .select(&SelectQuery::new(NOTES_TABLE).columns("downloads"))
            .await?;

        let total_downloads = rows
            .iter()
            .filter_map(|row| row.get("downloads").and_then(Value::as_i64))
            .sum();
        Ok(CatalogTotals {
            total_downloads,
            total_materials: rows.len(),
        })
    }

    async fn get_subjects(&self) -> Result<Vec<String>> {
        self.distinct_column("subject").await
    }

    async fn record_download(&self, material: &StudyMaterial) -> Option<String> {
        // Read-modify-write on the last value we saw; concurrent downloads can
        // lose increments.
        let patch = json!({ "downloads": material.downloads + 1 });
        let filters = [Filter::eq("id", material.id.clone())];
        if let Err(e) = self.client.update(NOTES_TABLE, &filters, patch).await {
            error!("Error updating downloads for {}: {}", material.id, e);
        }
        material.file_url.clone()
    }

    async fn publish_material(&self, new_material: NewStudyMaterial) -> Result<StudyMaterial> {
        let new_material = new_material.validated()?;
        let row = serde_json::to_value(&new_material)?;
        let stored = self.client.insert(NOTES_TABLE, row).await?;
        decode_row(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RemoteError;
    use crate::query::MemoryDataClient;
    use serde_json::json;

    fn material_row(id: i64, subject: &str, downloads: Value, author: &str) -> Value {
        json!({
            "id": id,
            "title": format!("Material {}", id),
            "subject": subject,
            "grade": "Grade 10",
            "type": "Note",
            "author": author,
            "downloads": downloads,
            "file_url": format!("https://files.example/{}.pdf", id),
            "created_at": "2024-01-01T00:00:00+00:00"
        })
    }

    fn service_with_rows() -> (MaterialService, MemoryDataClient) {
        let client = MemoryDataClient::new();
        client
            .seed(
                NOTES_TABLE,
                vec![
                    material_row(1, "Physics", json!(10), "Nimal"),
                    material_row(2, "Biology", json!(null), "Anon#0001"),
                    material_row(3, "Physics", json!(5), "Nimal"),
                    material_row(4, "", json!(1), "Kamala"),
                ],
            )
            .unwrap();
        (MaterialService::new(Arc::new(client.clone())), client)
    }

    #[tokio::test]
    async fn test_totals_sum_downloads_treating_null_as_zero() {
        let (service, _) = service_with_rows();
        let totals = service.get_totals().await.unwrap();
        assert_eq!(
            totals,
            CatalogTotals {
                total_downloads: 16,
                total_materials: 4
            }
        );
    }

    #[tokio::test]
    async fn test_subjects_are_distinct_sorted_and_non_empty() {
        let (service, _) = service_with_rows();
        assert_eq!(
            service.get_subjects().await.unwrap(),
            vec!["Biology".to_string(), "Physics".to_string()]
        );
    }

    #[tokio::test]
    async fn test_record_download_increments_from_seen_value() {
        let (service, client) = service_with_rows();
        let rows = client.rows(NOTES_TABLE);
        let material: StudyMaterial = serde_json::from_value(rows[0].clone()).unwrap();

        let url = service.record_download(&material).await;

        assert_eq!(url.as_deref(), Some("https://files.example/1.pdf"));
        assert_eq!(client.rows(NOTES_TABLE)[0]["downloads"], json!(11));
    }

    #[tokio::test]
    async fn test_record_download_still_returns_url_when_update_fails() {
        let (service, client) = service_with_rows();
        let material: StudyMaterial =
            serde_json::from_value(client.rows(NOTES_TABLE)[2].clone()).unwrap();
        client
            .set_failure(Some(RemoteError::RequestFailed("offline".into())))
            .unwrap();

        let url = service.record_download(&material).await;

        assert_eq!(url.as_deref(), Some("https://files.example/3.pdf"));
        assert_eq!(client.update_count(), 1);
    }

    #[tokio::test]
    async fn test_publish_material_inserts_validated_row() {
        let (service, client) = service_with_rows();
        let stored = service
            .publish_material(NewStudyMaterial {
                title: "Chemistry Past Paper".to_string(),
                subject: "Chemistry".to_string(),
                grade: "Grade 12-13 (A/L)".to_string(),
                medium: "Sinhala".to_string(),
                material_type: "past paper".to_string(),
                author: String::new(),
                year: Some(2022),
                file_url: "https://files.example/chem.pdf".to_string(),
                file_size: Some("2 MB".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(stored.type_label(), "Past Paper");
        assert_eq!(stored.downloads, 0);
        assert!(stored.is_anonymous());
        assert_eq!(client.rows(NOTES_TABLE).len(), 5);
    }
}
