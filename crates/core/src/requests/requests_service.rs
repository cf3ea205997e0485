use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error};
use serde_json::json;

use super::requests_model::{MaterialRequest, NewMaterialRequest, RequestBoard};
use super::requests_traits::RequestServiceTrait;
use crate::constants::REQUESTS_TABLE;
use crate::errors::Result;
use crate::materials::RecordId;
use crate::query::{decode_row, decode_rows, DataClient, Filter, Order, SelectQuery};

pub struct RequestService {
    client: Arc<dyn DataClient>,
}

impl RequestService {
    pub fn new(client: Arc<dyn DataClient>) -> Self {
        Self { client }
    }

    /// Optimistically upvotes `id` on the board, then writes it through.
    ///
    /// The local count stays bumped even if the write fails; the error is
    /// logged.
    pub async fn upvote_on_board(&self, board: &mut RequestBoard, id: &RecordId) {
        let Some(before) = board.upvote_locally(id) else {
            debug!("Upvote for unknown request {}", id);
            return;
        };
        if let Err(e) = self.upvote(&before).await {
            error!("Error upvoting request {}: {}", id, e);
        }
    }
}

#[async_trait]
impl RequestServiceTrait for RequestService {
    async fn list_requests(&self) -> Result<Vec<MaterialRequest>> {
        let query = SelectQuery::new(REQUESTS_TABLE).order_by(Order::desc("created_at"));
        decode_rows(self.client.select(&query).await?)
    }

    async fn post_request(&self, request: NewMaterialRequest) -> Result<MaterialRequest> {
        let request = request.validated()?;
        let stored = self
            .client
            .insert(REQUESTS_TABLE, serde_json::to_value(&request)?)
            .await?;
        decode_row(stored)
    }

    async fn upvote(&self, request: &MaterialRequest) -> Result<()> {
        // Whole-field replacement; concurrent upvotes can be lost.
        self.client
            .update(
                REQUESTS_TABLE,
                &[Filter::eq("id", request.id.clone())],
                json!({ "upvotes": request.upvotes + 1 }),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{Error, RemoteError};
    use crate::query::MemoryDataClient;

    fn service() -> (RequestService, MemoryDataClient) {
        let client = MemoryDataClient::new();
        client
            .seed(
                REQUESTS_TABLE,
                vec![
                    json!({ "id": 1, "subject": "ICT", "grade": "Grade 10", "upvotes": 3, "fulfilled": false, "created_at": "2024-01-01T00:00:00+00:00" }),
                    json!({ "id": 2, "subject": "Maths", "grade": "Grade 6-9", "upvotes": null, "fulfilled": true, "created_at": "2024-02-01T00:00:00+00:00" }),
                ],
            )
            .unwrap();
        (RequestService::new(Arc::new(client.clone())), client)
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let (service, _) = service();
        let requests = service.list_requests().await.unwrap();
        assert_eq!(requests[0].subject, "Maths");
        assert_eq!(requests[1].subject, "ICT");
    }

    #[tokio::test]
    async fn test_post_request_stores_default_grade() {
        let (service, client) = service();
        let posted = service
            .post_request(NewMaterialRequest {
                student_name: "Kasun".into(),
                subject: "Physics".into(),
                note_content: "Unit 3 notes".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(posted.grade, "Grade 6-9");
        assert_eq!(posted.upvotes, 0);
        assert_eq!(client.rows(REQUESTS_TABLE).len(), 3);
    }

    #[tokio::test]
    async fn test_post_failure_reaches_caller() {
        let (service, client) = service();
        client
            .set_failure(Some(RemoteError::RequestFailed("offline".into())))
            .unwrap();
        let result = service
            .post_request(NewMaterialRequest {
                student_name: "Kasun".into(),
                subject: "Physics".into(),
                note_content: "Unit 3 notes".into(),
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(Error::Remote(_))));
    }

    #[tokio::test]
    async fn test_upvote_on_board_is_optimistic() {
        let (service, client) = service();
        let mut board = RequestBoard::new(service.list_requests().await.unwrap());

        service.upvote_on_board(&mut board, &RecordId::Int(1)).await;
        assert_eq!(board.requests[1].upvotes, 4);
        assert_eq!(client.rows(REQUESTS_TABLE)[0]["upvotes"], json!(4));

        client
            .set_failure(Some(RemoteError::RequestFailed("offline".into())))
            .unwrap();
        service.upvote_on_board(&mut board, &RecordId::Int(1)).await;
        assert_eq!(board.requests[1].upvotes, 5);
        assert_eq!(client.update_count(), 2);
    }
}
