use std::collections::BTreeMap;
use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::model::ProjectRecord;

/// Payload field the calendar is keyed on.
const CALENDAR_FIELD: &str = "ecDate";

fn iso_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"))
}

fn slash_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{2}|\d{4})$").expect("valid regex"))
}

/// Normalize a calendar date field to `YYYY-MM-DD`.
///
/// ISO input passes through unchanged; `M/D/YY` and `M/D/YYYY` are
/// zero-padded, with 2-digit years expanded by prefixing `20`. Any other
/// form is rejected.
pub fn normalize_date(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if iso_re().is_match(trimmed) {
        return Some(trimmed.to_string());
    }
    let caps = slash_re().captures(trimmed)?;
    let month = format!("{:0>2}", &caps[1]);
    let day = format!("{:0>2}", &caps[2]);
    let year_raw = &caps[3];
    let year = if year_raw.len() == 2 {
        format!("20{}", year_raw)
    } else {
        year_raw.to_string()
    };
    Some(format!("{}-{}-{}", year, month, day))
}

/// Date-bucketed view of one completion partition.
#[derive(Debug)]
pub struct CalendarIndex {
    /// Inclusive month span `(year, month)` from the earliest to the latest
    /// bucketed date, empty months included.
    pub months: Vec<(i32, u32)>,
    /// Record indices per calendar date.
    pub by_date: BTreeMap<NaiveDate, Vec<usize>>,
}

/// Bucket records of one partition by their normalized calendar field.
///
/// Records whose field is absent, rejected by normalization, or not a real
/// calendar date are excluded from the map only, never from the record set.
/// Returns None when no record carries a usable date.
pub fn calendar_index(records: &[ProjectRecord], completed: bool) -> Option<CalendarIndex> {
    let mut by_date: BTreeMap<NaiveDate, Vec<usize>> = BTreeMap::new();

    for (index, record) in records.iter().enumerate() {
        if record.completed != completed {
            continue;
        }
        let Some(normalized) = record
            .data
            .str_field(CALENDAR_FIELD)
            .and_then(normalize_date)
        else {
            continue;
        };
        let Ok(date) = NaiveDate::parse_from_str(&normalized, "%Y-%m-%d") else {
            continue;
        };
        by_date.entry(date).or_default().push(index);
    }

    let min = *by_date.keys().next()?;
    let max = *by_date.keys().next_back()?;
    Some(CalendarIndex {
        months: month_span(min, max),
        by_date,
    })
}

/// Whole months from `min`'s month to `max`'s month, inclusive.
fn month_span(min: NaiveDate, max: NaiveDate) -> Vec<(i32, u32)> {
    let mut months = Vec::new();
    let (mut year, mut month) = (min.year(), min.month());
    loop {
        months.push((year, month));
        if (year, month) == (max.year(), max.month()) {
            break;
        }
        month += 1;
        if month > 12 {
            month = 1;
            year += 1;
        }
    }
    months
}

/// Helper for normalizing a date field as stored: invalid input becomes the
/// empty string, mirroring how the editor clears unusable values.
pub fn normalize_date_or_empty(value: &str) -> String {
    normalize_date(value).unwrap_or_default()
}
