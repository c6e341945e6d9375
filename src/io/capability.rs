use thiserror::Error;

/// Error type for filesystem capability operations
#[derive(Debug, Error)]
pub enum FsError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("operation not supported")]
    Unsupported,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Opaque handle to a directory inside the granted tree.
///
/// Handles expose only their leaf name; the backing location is known to the
/// capability alone. Equality is by handle identity, not name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirHandle {
    id: u64,
    name: String,
}

impl DirHandle {
    pub(crate) fn new(id: u64, name: impl Into<String>) -> DirHandle {
        DirHandle {
            id,
            name: name.into(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Access level requested from the capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    ReadWrite,
}

/// Injected filesystem capability scoped to one granted root directory.
///
/// All engine I/O goes through this seam so a host can substitute its own
/// storage and tests can run against an in-memory tree.
pub trait FsCapability {
    /// Request access before first use. Denial is a non-fatal condition the
    /// caller surfaces to the user.
    fn request_access(&self, access: Access) -> Result<(), FsError>;

    /// The granted root directory.
    fn root(&self) -> DirHandle;

    /// Immediate subdirectories of `dir`, in stable name order.
    fn subdirs(&self, dir: &DirHandle) -> Result<Vec<DirHandle>, FsError>;

    /// A named immediate subdirectory, or None if absent or unreadable.
    fn subdir(&self, dir: &DirHandle, name: &str) -> Option<DirHandle>;

    /// Read a file directly inside `dir`.
    fn read_file(&self, dir: &DirHandle, name: &str) -> Result<String, FsError>;

    /// Write (replace) a file directly inside `dir`.
    fn write_file(&self, dir: &DirHandle, name: &str, content: &str) -> Result<(), FsError>;

    /// Host-native ancestor resolution: the ordered segment names leading
    /// from the root down to `dir`, excluding the root itself. None when the
    /// host offers no such primitive or cannot resolve the handle.
    fn resolve(&self, dir: &DirHandle) -> Option<Vec<String>>;
}
