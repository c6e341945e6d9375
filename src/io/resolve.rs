use crate::model::ProjectRecord;

use super::capability::{DirHandle, FsCapability};

/// Display paths join with a backslash to match the tree's native form.
const SEPARATOR: &str = "\\";

/// Compute (and cache) the human-readable path for a project.
///
/// Strategies run in order, first success wins, each side-effect-free on
/// failure: the cached path, host-native resolution verified against the
/// record's identity, a path derived purely from identity metadata, and
/// finally a bounded search down from the root. Failures are logged at
/// diagnostic level only.
pub fn display_path(
    fs: &dyn FsCapability,
    record: &mut ProjectRecord,
    base_path: Option<&str>,
) -> String {
    if let Some(cached) = &record.cached_path {
        return cached.clone();
    }

    let parts = native_parts(fs, record)
        .or_else(|| record.expected_parts())
        .or_else(|| ancestor_search(fs, &record.dir));

    let path = join_parts(base_path, &parts.unwrap_or_else(|| vec![record.folder.clone()]));
    record.cached_path = Some(path.clone());
    path
}

fn join_parts(base_path: Option<&str>, parts: &[String]) -> String {
    let chain = parts.join(SEPARATOR);
    match base_path {
        Some(base) if !base.is_empty() => format!("{}{}{}", base, SEPARATOR, chain),
        _ => chain,
    }
}

/// Host-native resolution, accepted only when its trailing segments match
/// the identity-derived expectation case-insensitively. A mismatch means the
/// resolved chain is stale or wrong; the tier falls through.
fn native_parts(fs: &dyn FsCapability, record: &ProjectRecord) -> Option<Vec<String>> {
    let resolved = fs.resolve(&record.dir)?;
    if resolved.is_empty() {
        return None;
    }
    if let Some(expected) = record.expected_parts() {
        if !suffix_matches(&resolved, &expected) {
            eprintln!(
                "diagnostic: native resolution for {} does not match its identity segments",
                record.id()
            );
            return None;
        }
    }
    Some(resolved)
}

/// Case-insensitive trailing-segment comparison. A chain shorter than the
/// expected suffix cannot match.
fn suffix_matches(resolved: &[String], expected: &[String]) -> bool {
    if resolved.len() < expected.len() {
        return false;
    }
    resolved
        .iter()
        .rev()
        .zip(expected.iter().rev())
        .all(|(r, e)| r.to_lowercase() == e.to_lowercase())
}

/// Walk down from the root comparing handles until the leaf is found,
/// collecting segment names along the way. The structure is a strict tree,
/// so the traversal is bounded by its depth.
fn ancestor_search(fs: &dyn FsCapability, target: &DirHandle) -> Option<Vec<String>> {
    let mut trail = Vec::new();
    if search_from(fs, &fs.root(), target, &mut trail) {
        Some(trail)
    } else {
        None
    }
}

fn search_from(
    fs: &dyn FsCapability,
    dir: &DirHandle,
    target: &DirHandle,
    trail: &mut Vec<String>,
) -> bool {
    for child in fs.subdirs(dir).unwrap_or_default() {
        trail.push(child.name().to_string());
        if child == *target || search_from(fs, &child, target, trail) {
            return true;
        }
        trail.pop();
    }
    false
}
