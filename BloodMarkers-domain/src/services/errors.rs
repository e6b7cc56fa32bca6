use thiserror::Error;
use validator::ValidationErrors;

use blood_markers_data::repository::RepositoryError;

/// Errors surfaced by domain services
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input rejected before touching storage
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Referenced entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage failure
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl ServiceError {
    pub fn not_found(kind: &str, id: impl std::fmt::Display) -> Self {
        ServiceError::NotFound(format!("{} {} not found", kind, id))
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            // A referenced row vanished between the existence check and the write
            RepositoryError::Constraint(_) => {
                ServiceError::NotFound("Referenced record does not exist".to_string())
            },
            other => ServiceError::RepositoryError(other.to_string()),
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        ServiceError::ValidationError(format_validation_errors(&errors))
    }
}

/// Flatten field errors into "field: message; field: message"
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let messages: Vec<String> = errors
                .iter()
                .map(|err| match &err.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid {}", field),
                })
                .collect();
            format!("{}: {}", field, messages.join(", "))
        })
        .collect();

    // field_errors() is backed by a HashMap
    fields.sort();
    fields.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_errors_map_by_variant() {
        let constraint: ServiceError =
            RepositoryError::Constraint("FOREIGN KEY constraint failed".into()).into();
        assert!(matches!(constraint, ServiceError::NotFound(ref msg) if !msg.contains("FOREIGN KEY")));

        let lock: ServiceError = RepositoryError::Lock("poisoned".into()).into();
        assert!(matches!(lock, ServiceError::RepositoryError(_)));
    }
}
