use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::{NewReview, Review};
use crate::services::store::{ReviewStore, StoreError};

/// Flat-file review store
///
/// Keeps every review in a single JSON array on disk and rewrites the
/// file wholesale on each append. The read-modify-write cycle runs under
/// a mutex, and the rewrite lands through a temp file + rename, which
/// keeps concurrent submissions and a crash mid-write from corrupting
/// the file.
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file reads as an empty list
    async fn load(&self) -> Result<Vec<Review>, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn persist(&self, reviews: &[Review]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_vec_pretty(reviews)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        Ok(())
    }
}

#[async_trait]
impl ReviewStore for FileStore {
    async fn append(&self, review: NewReview) -> Result<Review, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut reviews = self.load().await?;

        let stored = Review {
            id: Some(Uuid::new_v4().to_string()),
            name: review.name,
            comment: review.comment,
            rating: review.rating,
            created_at: Utc::now(),
        };
        reviews.push(stored.clone());

        self.persist(&reviews).await?;

        tracing::debug!("Appended review ({} total)", reviews.len());

        Ok(stored)
    }

    async fn list_all(&self) -> Result<Vec<Review>, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut reviews = self.load().await?;
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(reviews)
    }
}
