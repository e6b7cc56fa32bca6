use blood_markers_data::models as data;

use super::marker::{BloodMarker, ReferenceRange};
use super::measurement::{CreateMeasurementRequest, Measurement, MeasurementQuery, UpdateMeasurementRequest};
use super::note::MarkerNote;
use super::todo::{MeasurementTodo, UpdateTodoRequest};

/// Conversion functions between domain entities and data models
/// These functions follow the pattern convert_to_[target_layer]_[model_name]

pub fn convert_to_domain_marker(marker: data::BloodMarker) -> BloodMarker {
    BloodMarker {
        id: marker.id,
        name: marker.name,
        category: marker.category,
        unit: marker.unit,
        description: marker.description,
        range: ReferenceRange::new(marker.min_value, marker.max_value),
    }
}

pub fn convert_to_domain_measurement(measurement: data::Measurement) -> Measurement {
    Measurement {
        id: measurement.id,
        marker_id: measurement.marker_id,
        value: measurement.value,
        measured_at: measurement.measured_at,
        notes: measurement.notes,
        created_at: measurement.created_at,
        updated_at: measurement.updated_at,
    }
}

pub fn convert_to_domain_note(note: data::MarkerNote) -> MarkerNote {
    MarkerNote {
        id: note.id,
        marker_id: note.marker_id,
        content: note.content,
        created_at: note.created_at,
        updated_at: note.updated_at,
    }
}

pub fn convert_to_domain_todo(todo: data::MeasurementTodo) -> MeasurementTodo {
    MeasurementTodo {
        id: todo.id,
        measurement_id: todo.measurement_id,
        title: todo.title,
        completed: todo.completed,
        created_at: todo.created_at,
        updated_at: todo.updated_at,
    }
}

/// Blank notes are stored as absent
fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

pub fn convert_to_data_create_measurement(request: CreateMeasurementRequest) -> data::CreateMeasurement {
    data::CreateMeasurement {
        marker_id: request.marker_id,
        value: request.value,
        measured_at: request.measured_at,
        notes: normalize_notes(request.notes),
    }
}

pub fn convert_to_data_update_measurement(request: UpdateMeasurementRequest) -> data::UpdateMeasurement {
    data::UpdateMeasurement {
        value: request.value,
        measured_at: request.measured_at,
        // Present but blank clears the notes
        notes: request.notes.map(|n| normalize_notes(Some(n))),
    }
}

pub fn convert_to_data_measurement_filter(query: &MeasurementQuery) -> data::MeasurementFilter {
    data::MeasurementFilter {
        marker_id: query.marker_id,
        start_date: query.start_date,
        end_date: query.end_date,
        limit: query.limit,
        offset: query.offset,
        sort_desc: query.sort_desc,
    }
}

pub fn convert_to_data_update_todo(request: UpdateTodoRequest) -> data::UpdateTodo {
    data::UpdateTodo {
        title: request.title.map(|t| t.trim().to_string()),
        completed: request.completed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn test_marker_range_is_carried_over() {
        let marker = convert_to_domain_marker(data::BloodMarker {
            id: Uuid::new_v4(),
            name: "HDL Cholesterol".into(),
            category: "Lipids".into(),
            unit: "mg/dL".into(),
            description: None,
            min_value: Some(40.0),
            max_value: None,
        });

        assert_eq!(marker.range, ReferenceRange::new(Some(40.0), None));
    }

    #[test]
    fn test_blank_notes_are_dropped() {
        let create = convert_to_data_create_measurement(CreateMeasurementRequest {
            marker_id: Uuid::new_v4(),
            value: 1.0,
            measured_at: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            notes: Some("  ".into()),
        });
        assert_eq!(create.notes, None);

        let clear = convert_to_data_update_measurement(UpdateMeasurementRequest {
            notes: Some(String::new()),
            ..UpdateMeasurementRequest::default()
        });
        assert_eq!(clear.notes, Some(None));

        let untouched = convert_to_data_update_measurement(UpdateMeasurementRequest::default());
        assert_eq!(untouched.notes, None);
    }
}
