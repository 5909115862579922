use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::scoring::JobPosting;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: i64,
    pub description: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

impl JobRow {
    pub fn posting(&self) -> JobPosting {
        JobPosting {
            id: self.id,
            description: self.description.clone(),
            location: self.location.clone(),
        }
    }
}
