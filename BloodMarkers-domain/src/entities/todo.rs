use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::validate_not_blank;

/// Follow-up goal attached to a measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct MeasurementTodo {
    pub id: Uuid,
    pub measurement_id: Uuid,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct CreateTodoRequest {
    #[validate(
        custom = "validate_not_blank",
        length(max = 200, message = "Title cannot exceed 200 characters")
    )]
    pub title: String,
}

/// Partial update of a todo; omitted fields stay unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct UpdateTodoRequest {
    #[validate(
        custom = "validate_not_blank",
        length(max = 200, message = "Title cannot exceed 200 characters")
    )]
    pub title: Option<String>,

    pub completed: Option<bool>,
}
