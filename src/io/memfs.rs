use std::cell::{Cell, RefCell};

use indexmap::IndexMap;

use super::capability::{Access, DirHandle, FsCapability, FsError};

/// How `MemFs::resolve` behaves.
#[derive(Debug, Clone, Default)]
pub enum ResolveMode {
    /// Resolve from the real in-memory structure.
    #[default]
    Native,
    /// Pretend the host offers no resolve primitive.
    Unsupported,
    /// Return these segments for any handle, regardless of the structure.
    Override(Vec<String>),
}

struct MemDir {
    name: String,
    parent: Option<u64>,
    children: Vec<u64>,
    files: IndexMap<String, String>,
}

/// In-memory filesystem capability: the reference backing for tests and for
/// hosts without a real tree. Supports access denial, write failure, and
/// resolve overrides so failure paths can be exercised directly.
pub struct MemFs {
    dirs: RefCell<Vec<MemDir>>,
    resolve_mode: RefCell<ResolveMode>,
    deny_access: Cell<bool>,
    fail_writes: Cell<bool>,
    write_log: RefCell<Vec<(String, String)>>,
}

impl Default for MemFs {
    fn default() -> Self {
        MemFs::new()
    }
}

impl MemFs {
    pub fn new() -> MemFs {
        MemFs {
            dirs: RefCell::new(vec![MemDir {
                name: "projects".to_string(),
                parent: None,
                children: Vec::new(),
                files: IndexMap::new(),
            }]),
            resolve_mode: RefCell::new(ResolveMode::Native),
            deny_access: Cell::new(false),
            fail_writes: Cell::new(false),
            write_log: RefCell::new(Vec::new()),
        }
    }

    pub fn add_dir(&self, parent: &DirHandle, name: &str) -> DirHandle {
        let mut dirs = self.dirs.borrow_mut();
        let id = dirs.len() as u64;
        dirs.push(MemDir {
            name: name.to_string(),
            parent: Some(parent.id()),
            children: Vec::new(),
            files: IndexMap::new(),
        });
        dirs[parent.id() as usize].children.push(id);
        DirHandle::new(id, name)
    }

    pub fn add_file(&self, dir: &DirHandle, name: &str, content: &str) {
        self.dirs.borrow_mut()[dir.id() as usize]
            .files
            .insert(name.to_string(), content.to_string());
    }

    /// Current content of a file, if present.
    pub fn file(&self, dir: &DirHandle, name: &str) -> Option<String> {
        self.dirs
            .borrow()
            .get(dir.id() as usize)
            .and_then(|d| d.files.get(name).cloned())
    }

    pub fn set_resolve(&self, mode: ResolveMode) {
        *self.resolve_mode.borrow_mut() = mode;
    }

    pub fn set_deny_access(&self, deny: bool) {
        self.deny_access.set(deny);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Every successful write as `(directory name, file name)`, in order.
    pub fn write_log(&self) -> Vec<(String, String)> {
        self.write_log.borrow().clone()
    }
}

impl FsCapability for MemFs {
    fn request_access(&self, _access: Access) -> Result<(), FsError> {
        if self.deny_access.get() {
            Err(FsError::PermissionDenied("in-memory root".to_string()))
        } else {
            Ok(())
        }
    }

    fn root(&self) -> DirHandle {
        DirHandle::new(0, self.dirs.borrow()[0].name.clone())
    }

    fn subdirs(&self, dir: &DirHandle) -> Result<Vec<DirHandle>, FsError> {
        let dirs = self.dirs.borrow();
        let d = dirs
            .get(dir.id() as usize)
            .ok_or_else(|| FsError::NotFound(dir.name().to_string()))?;
        Ok(d.children
            .iter()
            .map(|&id| DirHandle::new(id, dirs[id as usize].name.clone()))
            .collect())
    }

    fn subdir(&self, dir: &DirHandle, name: &str) -> Option<DirHandle> {
        self.subdirs(dir)
            .ok()?
            .into_iter()
            .find(|d| d.name() == name)
    }

    fn read_file(&self, dir: &DirHandle, name: &str) -> Result<String, FsError> {
        self.file(dir, name)
            .ok_or_else(|| FsError::NotFound(name.to_string()))
    }

    fn write_file(&self, dir: &DirHandle, name: &str, content: &str) -> Result<(), FsError> {
        if self.fail_writes.get() {
            return Err(FsError::PermissionDenied(name.to_string()));
        }
        let mut dirs = self.dirs.borrow_mut();
        let d = dirs
            .get_mut(dir.id() as usize)
            .ok_or_else(|| FsError::NotFound(dir.name().to_string()))?;
        d.files.insert(name.to_string(), content.to_string());
        self.write_log
            .borrow_mut()
            .push((d.name.clone(), name.to_string()));
        Ok(())
    }

    fn resolve(&self, dir: &DirHandle) -> Option<Vec<String>> {
        match &*self.resolve_mode.borrow() {
            ResolveMode::Unsupported => None,
            ResolveMode::Override(parts) => Some(parts.clone()),
            ResolveMode::Native => {
                let dirs = self.dirs.borrow();
                let mut parts = Vec::new();
                let mut cursor = dir.id();
                while cursor != 0 {
                    let d = dirs.get(cursor as usize)?;
                    parts.push(d.name.clone());
                    cursor = d.parent?;
                }
                parts.reverse();
                Some(parts)
            }
        }
    }
}
