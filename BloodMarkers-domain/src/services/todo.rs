use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use blood_markers_data::models::CreateTodo;

use crate::entities::conversions::{convert_to_data_update_todo, convert_to_domain_todo};
use crate::entities::{CreateTodoRequest, MeasurementTodo, UpdateTodoRequest};
use crate::services::errors::ServiceError;
use crate::services::Repositories;

/// Trait for measurement todo operations
#[async_trait]
pub trait TodoServiceTrait: Send + Sync {
    async fn create_todo(&self, measurement_id: Uuid, request: CreateTodoRequest)
        -> Result<MeasurementTodo, ServiceError>;

    async fn update_todo(&self, id: Uuid, request: UpdateTodoRequest) -> Result<MeasurementTodo, ServiceError>;

    async fn delete_todo(&self, id: Uuid) -> Result<(), ServiceError>;

    async fn get_todo(&self, id: Uuid) -> Result<MeasurementTodo, ServiceError>;

    /// Todos of a measurement, oldest first
    async fn list_todos(&self, measurement_id: Uuid) -> Result<Vec<MeasurementTodo>, ServiceError>;
}

pub struct TodoService {
    repositories: Repositories,
}

impl TodoService {
    pub fn new(repositories: Repositories) -> Self {
        Self { repositories }
    }

    async fn ensure_measurement(&self, measurement_id: Uuid) -> Result<(), ServiceError> {
        match self.repositories.measurements.get_by_id(measurement_id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found("Measurement", measurement_id)),
        }
    }
}

#[async_trait]
impl TodoServiceTrait for TodoService {
    async fn create_todo(&self, measurement_id: Uuid, request: CreateTodoRequest)
        -> Result<MeasurementTodo, ServiceError>
    {
        request.validate()?;
        self.ensure_measurement(measurement_id).await?;

        let todo = self
            .repositories
            .todos
            .create(CreateTodo {
                measurement_id,
                title: request.title.trim().to_string(),
            })
            .await?;

        debug!("Added todo {} to measurement {}", todo.id, measurement_id);
        Ok(convert_to_domain_todo(todo))
    }

    async fn update_todo(&self, id: Uuid, request: UpdateTodoRequest) -> Result<MeasurementTodo, ServiceError> {
        request.validate()?;
        if request.title.is_none() && request.completed.is_none() {
            return Err(ServiceError::ValidationError("No fields to update".to_string()));
        }

        self.repositories
            .todos
            .update(id, convert_to_data_update_todo(request))
            .await?
            .map(convert_to_domain_todo)
            .ok_or_else(|| ServiceError::not_found("Todo", id))
    }

    async fn delete_todo(&self, id: Uuid) -> Result<(), ServiceError> {
        if self.repositories.todos.delete(id).await? {
            Ok(())
        } else {
            Err(ServiceError::not_found("Todo", id))
        }
    }

    async fn get_todo(&self, id: Uuid) -> Result<MeasurementTodo, ServiceError> {
        self.repositories
            .todos
            .get_by_id(id)
            .await?
            .map(convert_to_domain_todo)
            .ok_or_else(|| ServiceError::not_found("Todo", id))
    }

    async fn list_todos(&self, measurement_id: Uuid) -> Result<Vec<MeasurementTodo>, ServiceError> {
        self.ensure_measurement(measurement_id).await?;
        let todos = self.repositories.todos.list_for_measurement(measurement_id).await?;
        Ok(todos.into_iter().map(convert_to_domain_todo).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blood_markers_data::models::catalog::marker_id_for_name;
    use blood_markers_data::models::CreateMeasurement;

    async fn measurement_id(repos: &Repositories) -> Uuid {
        repos.measurements.create(CreateMeasurement {
            marker_id: marker_id_for_name("Triglycerides"),
            value: 190.0,
            measured_at: "2024-05-01".parse().unwrap(),
            notes: None,
        }).await.unwrap().id
    }

    #[tokio::test]
    async fn test_todo_lifecycle() {
        let repos = Repositories::in_memory();
        let service = TodoService::new(repos.clone());
        let measurement_id = measurement_id(&repos).await;

        let first = service.create_todo(measurement_id, CreateTodoRequest { title: "Cut sugar".into() })
            .await
            .unwrap();
        let second = service.create_todo(measurement_id, CreateTodoRequest { title: "More fish".into() })
            .await
            .unwrap();
        assert!(!first.completed);

        let done = service.update_todo(first.id, UpdateTodoRequest {
            completed: Some(true),
            ..UpdateTodoRequest::default()
        }).await.unwrap();
        assert!(done.completed);
        assert_eq!(done.title, "Cut sugar");

        let listed = service.list_todos(measurement_id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed[0].created_at <= listed[1].created_at);

        service.delete_todo(second.id).await.unwrap();
        assert!(matches!(service.get_todo(second.id).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_todo_errors() {
        let repos = Repositories::in_memory();
        let service = TodoService::new(repos.clone());
        let measurement_id = measurement_id(&repos).await;

        let blank = service.create_todo(measurement_id, CreateTodoRequest { title: "".into() }).await;
        assert!(matches!(blank, Err(ServiceError::ValidationError(_))));

        let orphan = service.create_todo(Uuid::new_v4(), CreateTodoRequest { title: "x".into() }).await;
        assert!(matches!(orphan, Err(ServiceError::NotFound(_))));

        let todo = service.create_todo(measurement_id, CreateTodoRequest { title: "x".into() }).await.unwrap();
        let empty = service.update_todo(todo.id, UpdateTodoRequest::default()).await;
        assert!(matches!(empty, Err(ServiceError::ValidationError(_))));
    }
}
