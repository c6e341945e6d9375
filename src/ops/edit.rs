use serde_json::{Number, Value, json};
use thiserror::Error;

use crate::io::writer::SaveScheduler;
use crate::model::{FieldKind, Session, field_kind};

use super::calendar::normalize_date_or_empty;

#[derive(Debug, Error, PartialEq)]
pub enum EditError {
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("no such project: {0}")]
    NoSuchProject(String),
}

/// Apply one field edit to a loaded record and schedule its debounced save.
///
/// Raw input is coerced by the field's kind before it lands in the payload:
/// dates are normalized or cleared, numbers parse when they can and stay
/// strings when they cannot, text passes through untouched. The edit never
/// touches disk directly; the scheduler owns persistence.
pub fn set_field(
    session: &mut Session,
    sched: &mut SaveScheduler,
    id: &str,
    field: &str,
    raw: &str,
) -> Result<(), EditError> {
    let kind = field_kind(field).ok_or_else(|| EditError::UnknownField(field.to_string()))?;
    let index = session
        .find(id)
        .ok_or_else(|| EditError::NoSuchProject(id.to_string()))?;

    let value = coerce(kind, raw);
    // Index came from find(); the record is present.
    let Some(record) = session.record_mut(index) else {
        return Err(EditError::NoSuchProject(id.to_string()));
    };
    record.data.set(field, value);
    sched.note_edit(&record.key());
    Ok(())
}

/// Coerce raw input by field kind. The search text derived at load is not
/// refreshed here; it updates on the next scan.
fn coerce(kind: FieldKind, raw: &str) -> Value {
    match kind {
        FieldKind::Text => json!(raw),
        FieldKind::Date => json!(normalize_date_or_empty(raw)),
        FieldKind::Number => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return json!("");
            }
            // Integer input stays an integer in the backing file
            if let Ok(n) = trimmed.parse::<i64>() {
                return json!(n);
            }
            match trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
                Some(n) => Value::Number(n),
                None => json!(raw),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::capability::DirHandle;
    use crate::model::{Category, Payload, ProjectRecord};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;

    fn sample_session() -> Session {
        let mut s = Session::new();
        s.replace_records(vec![ProjectRecord::new(
            Category::Ei,
            "B12",
            false,
            None,
            Payload::from_json(r#"{"title":"Pump Swap","ecDate":""}"#),
            DirHandle::new(1, "PumpSwap"),
        )]);
        s
    }

    #[test]
    fn test_text_passes_through() {
        let mut s = sample_session();
        let mut sched = SaveScheduler::default();
        set_field(&mut s, &mut sched, "EI/B12/PumpSwap", "status", "In progress").unwrap();
        assert_eq!(s.record(0).unwrap().data.str_field("status"), Some("In progress"));
    }

    #[test]
    fn test_date_normalized_on_set() {
        let mut s = sample_session();
        let mut sched = SaveScheduler::default();
        set_field(&mut s, &mut sched, "EI/B12/PumpSwap", "ecDate", "3/4/24").unwrap();
        assert_eq!(s.record(0).unwrap().data.str_field("ecDate"), Some("2024-03-04"));
    }

    #[test]
    fn test_unparseable_date_cleared() {
        let mut s = sample_session();
        let mut sched = SaveScheduler::default();
        set_field(&mut s, &mut sched, "EI/B12/PumpSwap", "assignedDate", "soonish").unwrap();
        assert_eq!(s.record(0).unwrap().data.str_field("assignedDate"), Some(""));
    }

    #[test]
    fn test_number_coercion() {
        let mut s = sample_session();
        let mut sched = SaveScheduler::default();

        set_field(&mut s, &mut sched, "EI/B12/PumpSwap", "percentComplete", "40").unwrap();
        assert_eq!(s.record(0).unwrap().data.get("percentComplete"), Some(&json!(40)));

        set_field(&mut s, &mut sched, "EI/B12/PumpSwap", "percentComplete", "2.5").unwrap();
        assert_eq!(s.record(0).unwrap().data.get("percentComplete"), Some(&json!(2.5)));

        // Blank stays a blank string, not zero
        set_field(&mut s, &mut sched, "EI/B12/PumpSwap", "percentComplete", "").unwrap();
        assert_eq!(s.record(0).unwrap().data.get("percentComplete"), Some(&json!("")));

        // Unparseable input is kept verbatim
        set_field(&mut s, &mut sched, "EI/B12/PumpSwap", "priority", "high").unwrap();
        assert_eq!(s.record(0).unwrap().data.get("priority"), Some(&json!("high")));
    }

    #[test]
    fn test_integer_edit_serializes_without_fraction() {
        let mut s = sample_session();
        let mut sched = SaveScheduler::default();
        set_field(&mut s, &mut sched, "EI/B12/PumpSwap", "percentComplete", "40").unwrap();
        let saved = s.record(0).unwrap().data.to_tab_json();
        assert!(saved.contains("\"percentComplete\": 40"));
        assert!(!saved.contains("40.0"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut s = sample_session();
        let mut sched = SaveScheduler::default();
        let err = set_field(&mut s, &mut sched, "EI/B12/PumpSwap", "notesDoc", "x").unwrap_err();
        assert_eq!(err, EditError::UnknownField("notesDoc".to_string()));
        let err = set_field(&mut s, &mut sched, "EI/B12/PumpSwap", "bogus", "x").unwrap_err();
        assert_eq!(err, EditError::UnknownField("bogus".to_string()));
    }

    #[test]
    fn test_missing_project_rejected() {
        let mut s = sample_session();
        let mut sched = SaveScheduler::default();
        let err = set_field(&mut s, &mut sched, "EI/B12/Nope", "title", "x").unwrap_err();
        assert_eq!(err, EditError::NoSuchProject("EI/B12/Nope".to_string()));
        assert_eq!(sched.pending_len(), 0);
    }

    #[test]
    fn test_edit_schedules_pending_save() {
        let mut s = sample_session();
        let mut sched = SaveScheduler::new(Duration::from_millis(500));
        set_field(&mut s, &mut sched, "EI/B12/PumpSwap", "title", "New Title").unwrap();
        assert!(sched.is_pending("EI/B12/PumpSwap:current"));
        assert_eq!(sched.pending_len(), 1);
    }

    #[test]
    fn test_search_text_not_refreshed_until_rescan() {
        let mut s = sample_session();
        let mut sched = SaveScheduler::default();
        set_field(&mut s, &mut sched, "EI/B12/PumpSwap", "title", "Renamed").unwrap();
        let record = s.record(0).unwrap();
        assert!(record.search_text.contains("pump swap"));
        assert!(!record.search_text.contains("renamed"));
    }
}
