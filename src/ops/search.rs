use crate::model::ProjectRecord;

/// Free-text search over the derived search text (title + description +
/// folder name, lowercased at load).
///
/// Returns None for an empty query, which callers must distinguish from
/// `Some` with zero matches. Indices point into the full record slice.
pub fn search_records(records: &[ProjectRecord], query: &str) -> Option<Vec<usize>> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }
    Some(
        records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.search_text.contains(&query))
            .map(|(i, _)| i)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::capability::DirHandle;
    use crate::model::{Category, Payload};

    fn rec(id: u64, folder: &str, json: &str) -> ProjectRecord {
        ProjectRecord::new(
            Category::Ei,
            "B12",
            false,
            None,
            Payload::from_json(json),
            DirHandle::new(id, folder),
        )
    }

    fn sample() -> Vec<ProjectRecord> {
        vec![
            rec(1, "PumpSwap", r#"{"title":"Pump Swap","description":"Replace feed pump"}"#),
            rec(2, "Retube", r#"{"title":"Boiler Retube","description":"Unit 4 boiler"}"#),
            rec(3, "MiscWork", "{}"),
        ]
    }

    #[test]
    fn test_empty_query_is_no_active_result_set() {
        let records = sample();
        assert!(search_records(&records, "").is_none());
        assert!(search_records(&records, "   ").is_none());
    }

    #[test]
    fn test_zero_matches_is_distinct_from_no_query() {
        let records = sample();
        assert_eq!(search_records(&records, "zzznotfound"), Some(vec![]));
    }

    #[test]
    fn test_matches_title_description_and_folder() {
        let records = sample();
        assert_eq!(search_records(&records, "pump"), Some(vec![0]));
        assert_eq!(search_records(&records, "unit 4"), Some(vec![1]));
        assert_eq!(search_records(&records, "miscwork"), Some(vec![2]));
    }

    #[test]
    fn test_case_insensitive_and_trimmed() {
        let records = sample();
        assert_eq!(search_records(&records, "  BOILER "), Some(vec![1]));
        assert_eq!(search_records(&records, "PuMp"), Some(vec![0]));
    }

    #[test]
    fn test_multiple_matches_keep_record_order() {
        let records = sample();
        // "b" appears in "boiler" and building-less folder text of all three?
        // Use a term shared by the two titled records only.
        assert_eq!(search_records(&records, "e"), Some(vec![0, 1]));
    }
}
