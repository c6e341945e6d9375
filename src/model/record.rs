use crate::io::capability::DirHandle;

use super::category::Category;
use super::payload::Payload;

/// Marker name used for the completed segment when the actual marker
/// directory name was not recorded.
const DEFAULT_COMPLETED_SEGMENT: &str = "Completed";

/// One project leaf loaded from the tree.
///
/// `(category, building, folder, completed)` uniquely identifies a record.
/// The completion flag reflects which physical subtree the leaf was found
/// under at scan time, never the payload.
#[derive(Debug, Clone)]
pub struct ProjectRecord {
    pub category: Category,
    /// Building directory name (second level).
    pub building: String,
    /// Leaf directory name.
    pub folder: String,
    /// True if the leaf was found under a completed-marker directory.
    pub completed: bool,
    /// Actual name of the completed-marker directory, when completed.
    pub completed_folder: Option<String>,
    /// Payload from the backing file. May trail the file until next flush.
    pub data: Payload,
    /// Opaque handle to the leaf directory.
    pub dir: DirHandle,
    /// Lowercase title + description + folder name, recomputed on (re)load.
    pub search_text: String,
    /// Display path, computed lazily and never invalidated by edits.
    pub cached_path: Option<String>,
    /// Serialized payload at load or last successful flush. A flush that
    /// would rewrite this exact content is skipped.
    pub clean_payload: String,
}

impl ProjectRecord {
    pub fn new(
        category: Category,
        building: impl Into<String>,
        completed: bool,
        completed_folder: Option<String>,
        data: Payload,
        dir: DirHandle,
    ) -> ProjectRecord {
        let folder = dir.name().to_string();
        let search_text = derive_search_text(&data, &folder);
        let clean_payload = data.to_tab_json();
        ProjectRecord {
            category,
            building: building.into(),
            folder,
            completed,
            completed_folder,
            data,
            dir,
            search_text,
            cached_path: None,
            clean_payload,
        }
    }

    /// Human-facing identifier: `CATEGORY/building/folder`.
    pub fn id(&self) -> String {
        format!("{}/{}/{}", self.category.code(), self.building, self.folder)
    }

    /// Full identity key including the completion flag. Used where records
    /// must be distinguished even when a folder name exists in both the
    /// current and completed subtrees.
    pub fn key(&self) -> String {
        format!(
            "{}:{}",
            self.id(),
            if self.completed { "completed" } else { "current" }
        )
    }

    /// Title used for sorting: payload title, else the folder name.
    pub fn sort_title(&self) -> &str {
        self.data.title().unwrap_or(&self.folder)
    }

    /// Display label: payload description, else the folder name.
    pub fn label(&self) -> &str {
        self.data.description().unwrap_or(&self.folder)
    }

    /// Path segments this record's identity implies, root-relative:
    /// category, building, completed marker (when completed), folder.
    /// None when the identity is too incomplete to name a path.
    pub fn expected_parts(&self) -> Option<Vec<String>> {
        if self.building.is_empty() {
            return None;
        }
        let mut parts = vec![self.category.code().to_string(), self.building.clone()];
        if self.completed {
            parts.push(
                self.completed_folder
                    .clone()
                    .unwrap_or_else(|| DEFAULT_COMPLETED_SEGMENT.to_string()),
            );
        }
        parts.push(self.folder.clone());
        Some(parts)
    }
}

fn derive_search_text(data: &Payload, folder: &str) -> String {
    format!(
        "{} {} {}",
        data.title().unwrap_or(""),
        data.description().unwrap_or(""),
        folder
    )
    .to_lowercase()
    .trim()
    .to_string()
}
