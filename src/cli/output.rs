use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use serde_json::Value;

use crate::model::{Category, FIELDS, Payload, ProjectRecord};
use crate::ops::calendar::CalendarIndex;

/// How many search hits the human-readable view prints before truncating.
/// JSON output always carries the full result set.
pub const SEARCH_DISPLAY_LIMIT: usize = 8;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct RecordJson {
    pub id: String,
    pub category: Category,
    pub building: String,
    pub folder: String,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub has_notes: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Payload>,
}

#[derive(Serialize)]
pub struct ScanJson {
    pub status: String,
    pub count: usize,
}

#[derive(Serialize)]
pub struct SearchJson {
    pub query: String,
    pub total: usize,
    pub matches: Vec<RecordJson>,
}

#[derive(Serialize)]
pub struct CalendarJson {
    pub months: Vec<String>,
    pub days: Vec<CalendarDayJson>,
}

#[derive(Serialize)]
pub struct CalendarDayJson {
    pub date: String,
    pub projects: Vec<RecordJson>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn record_to_json(record: &ProjectRecord, with_data: bool) -> RecordJson {
    RecordJson {
        id: record.id(),
        category: record.category,
        building: record.building.clone(),
        folder: record.folder.clone(),
        completed: record.completed,
        title: record.data.title().map(str::to_string),
        description: record.data.description().map(str::to_string),
        has_notes: record.data.has_notes_doc(),
        data: with_data.then(|| record.data.clone()),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn completion_char(record: &ProjectRecord) -> char {
    if record.completed { 'x' } else { ' ' }
}

/// Format a single project as a one-line summary
pub fn format_record_line(record: &ProjectRecord) -> String {
    format!(
        "[{}] {}  {}",
        completion_char(record),
        record.id(),
        record.sort_title()
    )
}

fn value_display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Format the detailed record view: identity lines, then every editable
/// field present in the payload, in display order.
pub fn format_record_detail(record: &ProjectRecord) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!(
        "[{}] {}  {}",
        completion_char(record),
        record.id(),
        record.sort_title()
    ));
    if let Some(marker) = &record.completed_folder {
        lines.push(format!("completed under: {}", marker));
    }

    for (key, _) in FIELDS {
        if let Some(value) = record.data.get(key) {
            lines.push(format!("{}: {}", key, value_display(value)));
        }
    }
    if record.data.has_notes_doc() {
        lines.push("notes: attached".to_string());
    }
    lines
}

fn month_header(year: i32, month: u32) -> String {
    match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(first) => format!("== {} ==", first.format("%B %Y")),
        None => format!("== {}-{:02} ==", year, month),
    }
}

/// Format the calendar view month by month. Months without any dated
/// project still get a header, matching the inclusive span.
pub fn format_calendar(index: &CalendarIndex, records: &[ProjectRecord]) -> Vec<String> {
    let mut lines = Vec::new();
    for &(year, month) in &index.months {
        lines.push(month_header(year, month));
        for (date, indices) in &index.by_date {
            if (date.year(), date.month()) != (year, month) {
                continue;
            }
            for &i in indices {
                if let Some(record) = records.get(i) {
                    lines.push(format!("  {}  {}  ({})", date, record.sort_title(), record.id()));
                }
            }
        }
    }
    lines
}

pub fn calendar_to_json(index: &CalendarIndex, records: &[ProjectRecord]) -> CalendarJson {
    CalendarJson {
        months: index
            .months
            .iter()
            .map(|&(y, m)| format!("{}-{:02}", y, m))
            .collect(),
        days: index
            .by_date
            .iter()
            .map(|(date, indices)| CalendarDayJson {
                date: date.to_string(),
                projects: indices
                    .iter()
                    .filter_map(|&i| records.get(i))
                    .map(|r| record_to_json(r, false))
                    .collect(),
            })
            .collect(),
    }
}
