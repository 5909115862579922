use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored upload. `file_path` points into the resume directory; the content
/// itself is only read at scoring time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: i64,
    pub job_id: i64,
    pub file_path: String,
    pub original_filename: String,
    pub candidate_location: Option<String>,
    pub created_at: DateTime<Utc>,
}
