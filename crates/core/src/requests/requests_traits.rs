use async_trait::async_trait;

use super::requests_model::{MaterialRequest, NewMaterialRequest};
use crate::errors::Result;

/// Trait for request board operations
#[async_trait]
pub trait RequestServiceTrait: Send + Sync {
    /// All requests, newest first.
    async fn list_requests(&self) -> Result<Vec<MaterialRequest>>;

    /// Validates and posts a request. Failures reach the caller.
    async fn post_request(&self, request: NewMaterialRequest) -> Result<MaterialRequest>;

    /// Writes `current_upvotes + 1` for the request.
    async fn upvote(&self, request: &MaterialRequest) -> Result<()>;
}
