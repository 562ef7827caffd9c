use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewReview, Review};

/// Errors that can occur when talking to a review store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("No data returned for the inserted record")]
    NoRowReturned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Review store contract
///
/// Two interchangeable backends exist: a flat JSON file (`FileStore`) and
/// a hosted Supabase table (`SupabaseClient`). Handlers only see this
/// trait: append one validated review, or list everything newest-first.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Persist a review and return the stored record, including the
    /// store-assigned id and timestamp
    async fn append(&self, review: NewReview) -> Result<Review, StoreError>;

    /// All stored reviews, most recent first
    async fn list_all(&self) -> Result<Vec<Review>, StoreError>;
}
