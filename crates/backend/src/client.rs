//! HTTP client for the hosted table API.

use async_trait::async_trait;
use log::{debug, error};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use studyshare_core::errors::Result as CoreResult;
use studyshare_core::query::{DataClient, Filter, Row, SelectQuery};

use crate::config::BackendConfig;
use crate::error::{BackendError, Result};
use crate::filters::{filter_params, select_params};

const APIKEY: HeaderName = HeaderName::from_static("apikey");
const PREFER: HeaderName = HeaderName::from_static("prefer");

/// Error body returned by the table API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

/// Client for the PostgREST-style table API.
#[derive(Debug, Clone)]
pub struct RestClient {
    client: reqwest::Client,
    rest_url: String,
    api_key: String,
}

impl RestClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(BackendError::invalid_request("API key is not configured"));
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            rest_url: config.rest_url(),
            api_key: config.api_key.clone(),
        })
    }

    fn headers(&self, return_rows: bool) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let key = HeaderValue::from_str(&self.api_key)
            .map_err(|e| BackendError::invalid_request(format!("Invalid API key: {}", e)))?;
        headers.insert(APIKEY, key);
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|e| BackendError::invalid_request(format!("Invalid API key: {}", e)))?;
        headers.insert(AUTHORIZATION, bearer);
        if return_rows {
            headers.insert(PREFER, HeaderValue::from_static("return=representation"));
        }
        Ok(headers)
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }

    fn request(&self, method: Method, table: &str, return_rows: bool) -> Result<RequestBuilder> {
        Ok(self
            .client
            .request(method, self.table_url(table))
            .headers(self.headers(return_rows)?))
    }

    pub(crate) fn select_request(&self, query: &SelectQuery) -> Result<RequestBuilder> {
        Ok(self
            .request(Method::GET, &query.table, false)?
            .query(&select_params(query)))
    }

    pub(crate) fn insert_request(&self, table: &str, row: &Row) -> Result<RequestBuilder> {
        Ok(self.request(Method::POST, table, true)?.json(row))
    }

    pub(crate) fn update_request(
        &self,
        table: &str,
        filters: &[Filter],
        patch: &Row,
    ) -> Result<RequestBuilder> {
        if filters.is_empty() {
            // The table API would patch every row.
            return Err(BackendError::invalid_request(
                "Refusing to update without a filter",
            ));
        }
        Ok(self
            .request(Method::PATCH, table, true)?
            .query(&filter_params(filters))
            .json(patch))
    }

    /// Parse response, mapping non-success statuses to API errors.
    async fn parse_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        debug!("Table API response status: {}", status);
        debug!("Table API response body: {}", body);

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(parsed) => [parsed.message, parsed.details, parsed.hint]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(": "),
                Err(_) => body,
            };
            return Err(BackendError::api(status.as_u16(), message));
        }

        serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse table API response: {}. Body: {}", e, body);
            BackendError::Json(e)
        })
    }

    async fn send_rows(&self, request: RequestBuilder) -> Result<Vec<Row>> {
        let response = request.send().await?;
        self.parse_response(response).await
    }
}

#[async_trait]
impl DataClient for RestClient {
    async fn select(&self, query: &SelectQuery) -> CoreResult<Vec<Row>> {
        debug!("Selecting {} from '{}'", query.columns, query.table);
        let rows = self.send_rows(self.select_request(query)?).await?;
        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Row) -> CoreResult<Row> {
        debug!("Inserting into '{}'", table);
        let rows = self.send_rows(self.insert_request(table, &row)?).await?;
        let stored = rows
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::api(200, "Insert returned no row"))?;
        Ok(stored)
    }

    async fn update(&self, table: &str, filters: &[Filter], patch: Row) -> CoreResult<Vec<Row>> {
        debug!("Updating '{}' where {:?}", table, filters);
        let request = self.update_request(table, filters, &patch)?;
        let rows = self.send_rows(request).await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use studyshare_core::query::Order;

    fn client() -> RestClient {
        RestClient::new(&BackendConfig::new("https://demo.supabase.co/", "anon-key")).unwrap()
    }

    #[test]
    fn test_select_request_url_and_headers() {
        let query = SelectQuery::new("notes")
            .contains_any(&["title"], "bio")
            .order_by(Order::desc("created_at"));
        let request = client().select_request(&query).unwrap().build().unwrap();

        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.url().path(), "/rest/v1/notes");
        let params: Vec<(String, String)> = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(params[0], ("select".into(), "*".into()));
        assert_eq!(params[1], ("or".into(), "(title.ilike.*bio*)".into()));
        assert_eq!(params[2], ("order".into(), "created_at.desc".into()));

        assert_eq!(request.headers()["apikey"], "anon-key");
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer anon-key");
        assert!(request.headers().get("prefer").is_none());
    }

    #[test]
    fn test_insert_and_update_ask_for_rows_back() {
        let client = client();
        let insert = client
            .insert_request("requests", &json!({ "subject": "Maths" }))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(insert.method(), Method::POST);
        assert_eq!(insert.headers()["prefer"], "return=representation");

        let update = client
            .update_request(
                "notes",
                &[Filter::eq("id", 7)],
                &json!({ "downloads": 3 }),
            )
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(update.method(), Method::PATCH);
        assert_eq!(update.url().query(), Some("id=eq.7"));
    }

    #[test]
    fn test_unfiltered_update_is_rejected() {
        let result = client().update_request("notes", &[], &json!({ "downloads": 0 }));
        assert!(matches!(result, Err(BackendError::InvalidRequest(_))));
    }

    #[test]
    fn test_missing_key_is_rejected() {
        let result = RestClient::new(&BackendConfig::new("https://demo.supabase.co", ""));
        assert!(result.is_err());
    }
}
