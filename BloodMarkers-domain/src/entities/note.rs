use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::validate_not_blank;

/// Free-text note attached to a biomarker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct MarkerNote {
    pub id: Uuid,
    pub marker_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for adding a note to a marker
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct CreateNoteRequest {
    #[validate(
        custom = "validate_not_blank",
        length(max = 5000, message = "Note cannot exceed 5000 characters")
    )]
    pub content: String,
}

/// Request payload for replacing a note's content
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct UpdateNoteRequest {
    #[validate(
        custom = "validate_not_blank",
        length(max = 5000, message = "Note cannot exceed 5000 characters")
    )]
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_content_rules() {
        assert!(CreateNoteRequest { content: "Retest fasting".into() }.validate().is_ok());
        assert!(CreateNoteRequest { content: "   ".into() }.validate().is_err());
        assert!(UpdateNoteRequest { content: "a".repeat(5001) }.validate().is_err());
        assert!(UpdateNoteRequest { content: "a".repeat(5000) }.validate().is_ok());
    }
}
