use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Persisted session state: the granted root directory plus host settings.
/// Stored as a small TOML file under the user config dir; the `root` key is
/// the one fixed entry restored at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Grant {
    /// Path of the granted root directory. Absent until the user grants one.
    #[serde(default)]
    pub root: Option<String>,
    /// Prefix for display paths (e.g. the UNC or drive-letter base of the
    /// tree). When absent, display paths stay root-relative.
    #[serde(default)]
    pub base_path: Option<String>,
    /// Debounce quiet period in milliseconds.
    #[serde(default)]
    pub quiet_ms: Option<u64>,
}

/// Get the grant file path, respecting XDG_CONFIG_HOME
pub fn grant_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_home().join(".config"));
    config_dir.join("projdash").join("grant.toml")
}

fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Read the grant from a specific path.
/// If the file doesn't exist, returns an empty grant.
/// If the file is corrupted, backs it up as .bak and returns empty.
pub fn read_grant_from(path: &Path) -> Grant {
    if !path.exists() {
        return Grant::default();
    }

    match fs::read_to_string(path) {
        Ok(content) => match toml::from_str::<Grant>(&content) {
            Ok(grant) => grant,
            Err(e) => {
                let bak = path.with_extension("toml.bak");
                let _ = fs::copy(path, &bak);
                eprintln!(
                    "warning: could not parse {} (backed up as {}): {}",
                    path.display(),
                    bak.display(),
                    e
                );
                Grant::default()
            }
        },
        Err(_) => Grant::default(),
    }
}

/// Read the grant from the default location.
pub fn read_grant() -> Grant {
    read_grant_from(&grant_path())
}

/// Write the grant to a specific path.
pub fn write_grant_to(path: &Path, grant: &Grant) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content =
        toml::to_string_pretty(grant).map_err(|e| std::io::Error::other(e.to_string()))?;
    fs::write(path, content)
}

/// Write the grant to the default location.
pub fn write_grant(grant: &Grant) -> Result<(), std::io::Error> {
    write_grant_to(&grant_path(), grant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_grant() -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("projdash").join("grant.toml");
        (tmp, path)
    }

    #[test]
    fn test_missing_file_is_empty_grant() {
        let (_tmp, path) = temp_grant();
        let grant = read_grant_from(&path);
        assert!(grant.root.is_none());
        assert!(grant.base_path.is_none());
    }

    #[test]
    fn test_round_trip() {
        let (_tmp, path) = temp_grant();
        let grant = Grant {
            root: Some("/srv/projects".to_string()),
            base_path: Some("C:\\Projects".to_string()),
            quiet_ms: Some(250),
        };
        write_grant_to(&path, &grant).unwrap();
        let loaded = read_grant_from(&path);
        assert_eq!(loaded.root.as_deref(), Some("/srv/projects"));
        assert_eq!(loaded.base_path.as_deref(), Some("C:\\Projects"));
        assert_eq!(loaded.quiet_ms, Some(250));
    }

    #[test]
    fn test_corrupted_file_backed_up() {
        let (_tmp, path) = temp_grant();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not valid toml [[[").unwrap();
        let grant = read_grant_from(&path);
        assert!(grant.root.is_none());
        assert!(path.with_extension("toml.bak").exists());
    }
}
