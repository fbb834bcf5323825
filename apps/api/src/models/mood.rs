use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Server-assigned identifier of a stored questionnaire response.
pub type RecordId = i64;

/// One persisted questionnaire submission. Rows are never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct MoodResponseRow {
    pub id: RecordId,
    pub destination: Option<String>,
    pub adventurous: i32,
    pub energy: i32,
    pub what_do_you_enjoy: String,
    pub submitted_at: DateTime<Utc>,
}
