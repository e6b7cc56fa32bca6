use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use crate::models::catalog::predefined_markers;
use crate::models::{
    BloodMarker, CreateMeasurement, CreateNote, CreateTodo, MarkerNote, Measurement,
    MeasurementFilter, MeasurementTodo, UpdateMeasurement, UpdateTodo,
};
use super::errors::RepositoryError;
use super::storage::now_timestamp;

#[derive(Debug, Default)]
struct Tables {
    markers: Vec<BloodMarker>,
    measurements: HashMap<Uuid, Measurement>,
    notes: HashMap<Uuid, MarkerNote>,
    todos: HashMap<Uuid, MeasurementTodo>,
}

/// In-memory storage for all four tables.
///
/// Mirrors the SQLite schema rules: foreign keys must resolve on insert and
/// deleting a measurement removes its todos.
#[derive(Debug, Clone)]
pub struct InMemoryStorage {
    tables: Arc<Mutex<Tables>>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    /// Create a new in-memory storage seeded with the marker catalog
    pub fn new() -> Self {
        let tables = Tables {
            markers: predefined_markers(),
            ..Tables::default()
        };

        Self {
            tables: Arc::new(Mutex::new(tables)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        Ok(self.tables.lock()?)
    }

    // Markers

    pub fn list_markers(&self) -> Result<Vec<BloodMarker>, RepositoryError> {
        let tables = self.lock()?;
        let mut markers = tables.markers.clone();
        markers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(markers)
    }

    pub fn get_marker(&self, id: &Uuid) -> Result<Option<BloodMarker>, RepositoryError> {
        let tables = self.lock()?;
        Ok(tables.markers.iter().find(|m| &m.id == id).cloned())
    }

    // Measurements

    pub fn create_measurement(&self, request: CreateMeasurement) -> Result<Measurement, RepositoryError> {
        let mut tables = self.lock()?;

        if !tables.markers.iter().any(|m| m.id == request.marker_id) {
            return Err(RepositoryError::Constraint(format!(
                "marker {} does not exist", request.marker_id
            )));
        }

        let now = now_timestamp();
        let measurement = Measurement {
            id: Uuid::new_v4(),
            marker_id: request.marker_id,
            value: request.value,
            measured_at: request.measured_at,
            notes: request.notes,
            created_at: now,
            updated_at: now,
        };

        tables.measurements.insert(measurement.id, measurement.clone());
        Ok(measurement)
    }

    pub fn update_measurement(
        &self,
        id: &Uuid,
        changes: UpdateMeasurement,
    ) -> Result<Option<Measurement>, RepositoryError> {
        let mut tables = self.lock()?;

        let Some(measurement) = tables.measurements.get_mut(id) else {
            return Ok(None);
        };

        if let Some(value) = changes.value {
            measurement.value = value;
        }
        if let Some(measured_at) = changes.measured_at {
            measurement.measured_at = measured_at;
        }
        if let Some(notes) = changes.notes {
            measurement.notes = notes;
        }
        measurement.updated_at = now_timestamp();

        Ok(Some(measurement.clone()))
    }

    pub fn delete_measurement(&self, id: &Uuid) -> Result<bool, RepositoryError> {
        let mut tables = self.lock()?;

        let removed = tables.measurements.remove(id).is_some();
        if removed {
            tables.todos.retain(|_, todo| &todo.measurement_id != id);
        }

        Ok(removed)
    }

    pub fn get_measurement(&self, id: &Uuid) -> Result<Option<Measurement>, RepositoryError> {
        let tables = self.lock()?;
        Ok(tables.measurements.get(id).cloned())
    }

    pub fn filter_measurements(
        &self,
        filter: &MeasurementFilter,
    ) -> Result<(Vec<Measurement>, usize), RepositoryError> {
        let tables = self.lock()?;
        let sort_desc = filter.sort_desc.unwrap_or(true);

        let mut measurements: Vec<Measurement> = tables.measurements
            .values()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect();

        measurements.sort_by(|a, b| {
            let cmp = a.measured_at.cmp(&b.measured_at)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id));
            if sort_desc {
                cmp.reverse()
            } else {
                cmp
            }
        });

        let total = measurements.len();
        let offset = filter.offset.unwrap_or(0);
        let limit = filter.limit.unwrap_or(total);

        let page = measurements
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect();

        Ok((page, total))
    }

    // Notes

    pub fn create_note(&self, request: CreateNote) -> Result<MarkerNote, RepositoryError> {
        let mut tables = self.lock()?;

        if !tables.markers.iter().any(|m| m.id == request.marker_id) {
            return Err(RepositoryError::Constraint(format!(
                "marker {} does not exist", request.marker_id
            )));
        }

        let now = now_timestamp();
        let note = MarkerNote {
            id: Uuid::new_v4(),
            marker_id: request.marker_id,
            content: request.content,
            created_at: now,
            updated_at: now,
        };

        tables.notes.insert(note.id, note.clone());
        Ok(note)
    }

    pub fn update_note(&self, id: &Uuid, content: String) -> Result<Option<MarkerNote>, RepositoryError> {
        let mut tables = self.lock()?;

        Ok(tables.notes.get_mut(id).map(|note| {
            note.content = content;
            note.updated_at = now_timestamp();
            note.clone()
        }))
    }

    pub fn delete_note(&self, id: &Uuid) -> Result<bool, RepositoryError> {
        let mut tables = self.lock()?;
        Ok(tables.notes.remove(id).is_some())
    }

    pub fn get_note(&self, id: &Uuid) -> Result<Option<MarkerNote>, RepositoryError> {
        let tables = self.lock()?;
        Ok(tables.notes.get(id).cloned())
    }

    pub fn list_notes(&self, marker_id: &Uuid) -> Result<Vec<MarkerNote>, RepositoryError> {
        let tables = self.lock()?;

        let mut notes: Vec<MarkerNote> = tables.notes
            .values()
            .filter(|n| &n.marker_id == marker_id)
            .cloned()
            .collect();

        // Newest first
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(notes)
    }

    // Todos

    pub fn create_todo(&self, request: CreateTodo) -> Result<MeasurementTodo, RepositoryError> {
        let mut tables = self.lock()?;

        if !tables.measurements.contains_key(&request.measurement_id) {
            return Err(RepositoryError::Constraint(format!(
                "measurement {} does not exist", request.measurement_id
            )));
        }

        let now = now_timestamp();
        let todo = MeasurementTodo {
            id: Uuid::new_v4(),
            measurement_id: request.measurement_id,
            title: request.title,
            completed: false,
            created_at: now,
            updated_at: now,
        };

        tables.todos.insert(todo.id, todo.clone());
        Ok(todo)
    }

    pub fn update_todo(&self, id: &Uuid, changes: UpdateTodo) -> Result<Option<MeasurementTodo>, RepositoryError> {
        let mut tables = self.lock()?;

        Ok(tables.todos.get_mut(id).map(|todo| {
            if let Some(title) = changes.title {
                todo.title = title;
            }
            if let Some(completed) = changes.completed {
                todo.completed = completed;
            }
            todo.updated_at = now_timestamp();
            todo.clone()
        }))
    }

    pub fn delete_todo(&self, id: &Uuid) -> Result<bool, RepositoryError> {
        let mut tables = self.lock()?;
        Ok(tables.todos.remove(id).is_some())
    }

    pub fn get_todo(&self, id: &Uuid) -> Result<Option<MeasurementTodo>, RepositoryError> {
        let tables = self.lock()?;
        Ok(tables.todos.get(id).cloned())
    }

    pub fn list_todos(&self, measurement_id: Option<&Uuid>) -> Result<Vec<MeasurementTodo>, RepositoryError> {
        let tables = self.lock()?;

        let mut todos: Vec<MeasurementTodo> = tables.todos
            .values()
            .filter(|t| measurement_id.map_or(true, |id| &t.measurement_id == id))
            .cloned()
            .collect();

        // Oldest first
        todos.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(todos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::marker_id_for_name;

    fn glucose_reading(storage: &InMemoryStorage, date: &str, value: f64) -> Measurement {
        storage.create_measurement(CreateMeasurement {
            marker_id: marker_id_for_name("Glucose"),
            value,
            measured_at: date.parse().unwrap(),
            notes: None,
        }).unwrap()
    }

    #[test]
    fn test_storage_is_seeded_with_catalog() {
        let storage = InMemoryStorage::new();
        let markers = storage.list_markers().unwrap();

        assert!(!markers.is_empty());
        assert!(storage.get_marker(&marker_id_for_name("Glucose")).unwrap().is_some());
    }

    #[test]
    fn test_measurement_requires_existing_marker() {
        let storage = InMemoryStorage::new();
        let result = storage.create_measurement(CreateMeasurement {
            marker_id: Uuid::new_v4(),
            value: 1.0,
            measured_at: "2024-01-01".parse().unwrap(),
            notes: None,
        });

        assert!(matches!(result, Err(RepositoryError::Constraint(_))));
    }

    #[test]
    fn test_filter_sorts_and_paginates() {
        let storage = InMemoryStorage::new();
        glucose_reading(&storage, "2024-01-01", 90.0);
        glucose_reading(&storage, "2024-03-01", 110.0);
        glucose_reading(&storage, "2024-02-01", 95.0);

        let (page, total) = storage.filter_measurements(&MeasurementFilter {
            limit: Some(2),
            sort_desc: Some(false),
            ..MeasurementFilter::default()
        }).unwrap();

        assert_eq!(total, 3);
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].value, 90.0);
        assert_eq!(page[1].value, 95.0);

        let (page, _) = storage.filter_measurements(&MeasurementFilter {
            offset: Some(2),
            ..MeasurementFilter::default()
        }).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].value, 90.0);
    }

    #[test]
    fn test_deleting_measurement_removes_its_todos() {
        let storage = InMemoryStorage::new();
        let measurement = glucose_reading(&storage, "2024-01-01", 120.0);
        let todo = storage.create_todo(CreateTodo {
            measurement_id: measurement.id,
            title: "Cut sugar".to_string(),
        }).unwrap();

        assert!(storage.delete_measurement(&measurement.id).unwrap());
        assert!(storage.get_todo(&todo.id).unwrap().is_none());
        assert!(!storage.delete_measurement(&measurement.id).unwrap());
    }

    #[test]
    fn test_update_measurement_clears_notes() {
        let storage = InMemoryStorage::new();
        let measurement = storage.create_measurement(CreateMeasurement {
            marker_id: marker_id_for_name("Glucose"),
            value: 88.0,
            measured_at: "2024-01-01".parse().unwrap(),
            notes: Some("fasted".to_string()),
        }).unwrap();

        let updated = storage.update_measurement(&measurement.id, UpdateMeasurement {
            notes: Some(None),
            ..UpdateMeasurement::default()
        }).unwrap().unwrap();

        assert_eq!(updated.notes, None);
        assert_eq!(updated.value, 88.0);
    }
}
