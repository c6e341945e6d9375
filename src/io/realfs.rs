use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::capability::{Access, DirHandle, FsCapability, FsError};

/// Filesystem capability over a real directory tree, scoped to the granted
/// root. Callers only see opaque handles; paths stay inside the table.
pub struct RealFs {
    root_path: PathBuf,
    table: RefCell<HandleTable>,
}

struct HandleTable {
    paths: Vec<PathBuf>,
    by_path: HashMap<PathBuf, u64>,
}

impl RealFs {
    pub fn new(root: &Path) -> RealFs {
        let root_path = root.to_path_buf();
        let mut by_path = HashMap::new();
        by_path.insert(root_path.clone(), 0);
        RealFs {
            root_path: root_path.clone(),
            table: RefCell::new(HandleTable {
                paths: vec![root_path],
                by_path,
            }),
        }
    }

    /// The granted root path, for host-side uses like watching.
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    fn path_of(&self, dir: &DirHandle) -> Result<PathBuf, FsError> {
        self.table
            .borrow()
            .paths
            .get(dir.id() as usize)
            .cloned()
            .ok_or_else(|| FsError::NotFound(dir.name().to_string()))
    }

    /// Mint (or reuse) the handle for a path. Ids are stable per path so
    /// handle equality survives repeated enumeration.
    fn intern(&self, path: PathBuf) -> DirHandle {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut table = self.table.borrow_mut();
        if let Some(&id) = table.by_path.get(&path) {
            return DirHandle::new(id, name);
        }
        let id = table.paths.len() as u64;
        table.paths.push(path.clone());
        table.by_path.insert(path, id);
        DirHandle::new(id, name)
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

impl FsCapability for RealFs {
    fn request_access(&self, access: Access) -> Result<(), FsError> {
        let meta = fs::metadata(&self.root_path).map_err(|_| {
            FsError::PermissionDenied(self.root_path.to_string_lossy().into_owned())
        })?;
        if !meta.is_dir() {
            return Err(FsError::NotFound(
                self.root_path.to_string_lossy().into_owned(),
            ));
        }
        if access == Access::ReadWrite && meta.permissions().readonly() {
            return Err(FsError::PermissionDenied(
                self.root_path.to_string_lossy().into_owned(),
            ));
        }
        Ok(())
    }

    fn root(&self) -> DirHandle {
        let name = self
            .root_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        DirHandle::new(0, name)
    }

    fn subdirs(&self, dir: &DirHandle) -> Result<Vec<DirHandle>, FsError> {
        let path = self.path_of(dir)?;
        let mut names: Vec<PathBuf> = fs::read_dir(&path)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .map(|entry| entry.path())
            .collect();
        names.sort();
        Ok(names.into_iter().map(|p| self.intern(p)).collect())
    }

    fn subdir(&self, dir: &DirHandle, name: &str) -> Option<DirHandle> {
        let path = self.path_of(dir).ok()?.join(name);
        if path.is_dir() {
            Some(self.intern(path))
        } else {
            None
        }
    }

    fn read_file(&self, dir: &DirHandle, name: &str) -> Result<String, FsError> {
        let path = self.path_of(dir)?.join(name);
        if !path.is_file() {
            return Err(FsError::NotFound(name.to_string()));
        }
        Ok(fs::read_to_string(&path)?)
    }

    fn write_file(&self, dir: &DirHandle, name: &str, content: &str) -> Result<(), FsError> {
        let path = self.path_of(dir)?.join(name);
        atomic_write(&path, content.as_bytes())?;
        Ok(())
    }

    fn resolve(&self, dir: &DirHandle) -> Option<Vec<String>> {
        let path = self.path_of(dir).ok()?;
        let rel = path.strip_prefix(&self.root_path).ok()?;
        Some(
            rel.components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect(),
        )
    }
}
