use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Opaque handle to one locally selected image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PhotoRef(u64);

impl fmt::Display for PhotoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "blob:{}", self.0)
    }
}

/// Issues and releases photo handles.
///
/// Every handle stays live until it is revoked, so the board revokes the
/// handle a cell drops on overwrite and every handle on reset.
#[derive(Debug, Default)]
pub struct PhotoStore {
    next_id: u64,
    live: HashMap<u64, PathBuf>,
}

impl PhotoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, path: &Path) -> PhotoRef {
        self.next_id += 1;
        self.live.insert(self.next_id, path.to_path_buf());
        PhotoRef(self.next_id)
    }

    pub fn resolve(&self, photo: &PhotoRef) -> Option<&Path> {
        self.live.get(&photo.0).map(PathBuf::as_path)
    }

    /// Releases `photo`. Revoking an unknown or already revoked handle is a no-op.
    pub fn revoke(&mut self, photo: &PhotoRef) -> bool {
        let released = self.live.remove(&photo.0).is_some();
        if released {
            tracing::debug!(%photo, "revoked photo handle");
        }
        released
    }

    pub fn revoke_all(&mut self) -> usize {
        let count = self.live.len();
        self.live.clear();
        count
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}
