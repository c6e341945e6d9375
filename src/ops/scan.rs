use std::cmp::Ordering;

use crate::io::capability::{DirHandle, FsCapability};
use crate::model::{Category, DATA_FILE, Payload, ProjectRecord};

/// Case-insensitive names marking a building's completed subtree.
pub const COMPLETED_ALIASES: [&str; 2] = ["complete", "completed"];

/// Result of one full scan of the tree.
#[derive(Debug)]
pub struct ScanOutcome {
    /// All discovered records, sorted by the scan comparator.
    pub records: Vec<ProjectRecord>,
    /// Aggregate status line for the user.
    pub status: String,
}

impl ScanOutcome {
    pub fn count(&self) -> usize {
        self.records.len()
    }
}

/// Walk category → building → project and load every leaf holding a backing
/// file. Never fails as a whole: missing category roots are skipped, leaves
/// without a backing file are skipped, malformed payloads load as empty, and
/// any single unreadable node is dropped in place.
pub fn scan(fs: &dyn FsCapability) -> ScanOutcome {
    let root = fs.root();
    let mut records = Vec::new();

    for category in Category::ALL {
        let Some(category_dir) = fs.subdir(&root, category.code()) else {
            continue;
        };

        for building_dir in fs.subdirs(&category_dir).unwrap_or_default() {
            let building = building_dir.name().to_string();
            let children = fs.subdirs(&building_dir).unwrap_or_default();

            // At most one completed marker per building; first match wins.
            let marker = children
                .iter()
                .find(|d| is_completed_marker(d.name()))
                .cloned();

            for child in &children {
                if is_completed_marker(child.name()) {
                    continue;
                }
                if let Some(record) = load_leaf(fs, category, &building, child, false, None) {
                    records.push(record);
                }
            }

            if let Some(marker) = marker {
                let marker_name = marker.name().to_string();
                for leaf in fs.subdirs(&marker).unwrap_or_default() {
                    if let Some(record) =
                        load_leaf(fs, category, &building, &leaf, true, Some(&marker_name))
                    {
                        records.push(record);
                    }
                }
            }
        }
    }

    records.sort_by(compare_records);
    let status = format!("Loaded {} projects.", records.len());
    ScanOutcome { records, status }
}

fn is_completed_marker(name: &str) -> bool {
    COMPLETED_ALIASES.contains(&name.to_lowercase().as_str())
}

/// Load one leaf directory. None when the backing file is missing or
/// unreadable; malformed JSON still yields a record with an empty payload.
fn load_leaf(
    fs: &dyn FsCapability,
    category: Category,
    building: &str,
    dir: &DirHandle,
    completed: bool,
    completed_folder: Option<&str>,
) -> Option<ProjectRecord> {
    let text = fs.read_file(dir, DATA_FILE).ok()?;
    let data = Payload::from_json(&text);
    Some(ProjectRecord::new(
        category,
        building,
        completed,
        completed_folder.map(str::to_string),
        data,
        dir.clone(),
    ))
}

/// Scan ordering: category code, then building name, then title (falling
/// back to folder name), all lexical, ties broken left-to-right.
pub fn compare_records(a: &ProjectRecord, b: &ProjectRecord) -> Ordering {
    a.category
        .code()
        .cmp(b.category.code())
        .then_with(|| a.building.cmp(&b.building))
        .then_with(|| a.sort_title().cmp(b.sort_title()))
}
