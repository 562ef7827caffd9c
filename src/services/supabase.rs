use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

use crate::models::{NewReview, Review};
use crate::services::store::{ReviewStore, StoreError};

/// Supabase REST client
///
/// Handles all communication with the hosted reviews table through the
/// PostgREST endpoint:
/// - Inserting one row per submitted review
/// - Selecting all rows ordered by creation time for the public listing
pub struct SupabaseClient {
    base_url: String,
    api_key: String,
    table: String,
    client: Client,
}

impl SupabaseClient {
    /// Create a new Supabase client
    pub fn new(base_url: String, api_key: String, table: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_key,
            table,
            client,
        }
    }

    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.table)
        )
    }

    fn check_auth(status: StatusCode) -> Result<(), StoreError> {
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StoreError::Unauthorized);
        }
        Ok(())
    }
}

#[async_trait]
impl ReviewStore for SupabaseClient {
    async fn append(&self, review: NewReview) -> Result<Review, StoreError> {
        let url = self.table_url();

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            // Ask PostgREST to echo the inserted row back
            .header("Prefer", "return=representation")
            .json(&review)
            .send()
            .await?;

        let status = response.status();
        Self::check_auth(status)?;
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Failed to insert review: {} - {}", status, body);
            return Err(StoreError::ApiError(format!(
                "Failed to insert review: {}",
                status
            )));
        }

        let json: Value = response.json().await?;

        let rows = json
            .as_array()
            .ok_or_else(|| StoreError::InvalidResponse("Expected a JSON array of rows".into()))?;

        let row = rows.first().ok_or(StoreError::NoRowReturned)?;

        serde_json::from_value(row.clone())
            .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse inserted row: {}", e)))
    }

    async fn list_all(&self) -> Result<Vec<Review>, StoreError> {
        let url = format!("{}?select=*&order=created_at.desc", self.table_url());

        tracing::debug!("Fetching reviews from: {}", url);

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await?;

        let status = response.status();
        Self::check_auth(status)?;
        if !status.is_success() {
            return Err(StoreError::ApiError(format!(
                "Failed to fetch reviews: {}",
                status
            )));
        }

        let json: Value = response.json().await?;

        let rows = json
            .as_array()
            .ok_or_else(|| StoreError::InvalidResponse("Expected a JSON array of rows".into()))?;

        // Skip rows that do not parse instead of failing the whole listing
        let reviews: Vec<Review> = rows
            .iter()
            .filter_map(|row| serde_json::from_value(row.clone()).ok())
            .collect();

        tracing::debug!("Fetched {} reviews ({} rows)", reviews.len(), rows.len());

        Ok(reviews)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn sample_review() -> NewReview {
        NewReview {
            name: "Ann".to_string(),
            comment: "Great service".to_string(),
            rating: 5,
        }
    }

    #[test]
    fn test_supabase_client_creation() {
        let client = SupabaseClient::new(
            "https://project.supabase.co/".to_string(),
            "test_key".to_string(),
            "reviews".to_string(),
        );

        assert_eq!(client.table_url(), "https://project.supabase.co/rest/v1/reviews");
        assert_eq!(client.api_key, "test_key");
    }

    #[tokio::test]
    async fn test_append_returns_stored_row() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/v1/reviews")
            .match_header("apikey", "test_key")
            .match_header("prefer", "return=representation")
            .match_body(Matcher::Json(serde_json::json!({
                "name": "Ann",
                "comment": "Great service",
                "rating": 5
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"id":"5b3f1c2e-8a41-4f0e-9c37-2d0caa1f66d1","name":"Ann","comment":"Great service","rating":5,"created_at":"2024-05-01T10:00:00+00:00"}]"#,
            )
            .create_async()
            .await;

        let client = SupabaseClient::new(server.url(), "test_key".to_string(), "reviews".to_string());
        let stored = client.append(sample_review()).await.unwrap();

        assert_eq!(stored.name, "Ann");
        assert_eq!(stored.rating, 5);
        assert!(stored.id.is_some());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_append_with_empty_representation_is_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/rest/v1/reviews")
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let client = SupabaseClient::new(server.url(), "test_key".to_string(), "reviews".to_string());
        let err = client.append(sample_review()).await.unwrap_err();

        assert!(matches!(err, StoreError::NoRowReturned));
    }

    #[tokio::test]
    async fn test_list_requests_newest_first_and_skips_bad_rows() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/reviews")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("select".into(), "*".into()),
                Matcher::UrlEncoded("order".into(), "created_at.desc".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"id":"a1","name":"Bea","comment":"Quick turnaround","rating":4,"created_at":"2024-05-02T09:00:00+00:00"},
                    {"id":"a2","name":"Ann","comment":"Great service","rating":5,"created_at":"2024-05-01T10:00:00+00:00"},
                    {"id":"a3","name":"broken row"}
                ]"#,
            )
            .create_async()
            .await;

        let client = SupabaseClient::new(server.url(), "test_key".to_string(), "reviews".to_string());
        let reviews = client.list_all().await.unwrap();

        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].name, "Bea");
        assert_eq!(reviews[1].name, "Ann");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unauthorized_is_mapped() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/v1/reviews")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"message":"Invalid API key"}"#)
            .create_async()
            .await;

        let client = SupabaseClient::new(server.url(), "bad_key".to_string(), "reviews".to_string());
        let err = client.list_all().await.unwrap_err();

        assert!(matches!(err, StoreError::Unauthorized));
    }
}
