use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Storage model for a free-text note attached to a marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerNote {
    pub id: Uuid,
    pub marker_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input data for creating a note
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNote {
    pub marker_id: Uuid,
    pub content: String,
}
