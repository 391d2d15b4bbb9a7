//! Course reviews, appended to a JSON file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::{fs, sync::Mutex};
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, Result};

pub const MAX_REVIEW_CHARS: usize = 5000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub id: Uuid,
    pub rating: u8,
    pub review: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub rating: i64,
    pub review: String,
}

pub struct ReviewStore {
    path: PathBuf,
    // serialises read-modify-write of the file
    lock: Mutex<()>,
}

impl ReviewStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<ReviewRecord>> {
        match fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_all(&self, records: &[ReviewRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(records)?).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    pub async fn submit(&self, rating: i64, review: &str) -> Result<ReviewRecord> {
        if !(1..=5).contains(&rating) {
            return Err(AppError::InvalidRating(rating));
        }
        let review = review.trim();
        if review.is_empty() {
            return Err(AppError::EmptyReview);
        }
        let len = review.chars().count();
        if len > MAX_REVIEW_CHARS {
            return Err(AppError::ReviewTooLong {
                len,
                max: MAX_REVIEW_CHARS,
            });
        }

        let record = ReviewRecord {
            id: Uuid::new_v4(),
            rating: rating as u8,
            review: review.to_string(),
            timestamp: OffsetDateTime::now_utc(),
        };

        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await?;
        records.push(record.clone());
        self.write_all(&records).await?;

        info!("Stored review {} ({} stars)", record.id, record.rating);
        Ok(record)
    }

    /// Newest first.
    pub async fn list(&self) -> Result<Vec<ReviewRecord>> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await?;
        records.reverse();
        Ok(records)
    }
}

pub fn average_rating(records: &[ReviewRecord]) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    let total: u32 = records.iter().map(|r| r.rating as u32).sum();
    Some(total as f64 / records.len() as f64)
}
