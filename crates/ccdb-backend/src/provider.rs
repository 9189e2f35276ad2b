use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use ccdb_types::ObjectPath;

use crate::error::{BackendError, BackendResult};

/// Source of raw calibration object bytes.
///
/// Implementations must satisfy:
/// - `get_object` returns the complete object or an error; never a prefix.
/// - A path the provider cannot supply yields [`BackendError::ObjectNotFound`].
/// - Reads are safe to issue concurrently.
pub trait ObjectProvider: Send + Sync {
    /// Read the object stored at `path`. May block on I/O.
    fn get_object(&self, path: &ObjectPath) -> BackendResult<Vec<u8>>;
}

/// In-memory, HashMap-based object provider.
///
/// Intended for tests and embedding.
#[derive(Default)]
pub struct InMemoryObjectProvider {
    objects: RwLock<HashMap<ObjectPath, Vec<u8>>>,
}

impl InMemoryObjectProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the object at `path`.
    pub fn insert(&self, path: ObjectPath, data: impl Into<Vec<u8>>) {
        self.objects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, data.into());
    }

    /// Remove the object at `path`. Returns `true` if it existed.
    pub fn remove(&self, path: &ObjectPath) -> bool {
        self.objects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path)
            .is_some()
    }

    pub fn contains(&self, path: &ObjectPath) -> bool {
        self.objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.objects.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ObjectProvider for InMemoryObjectProvider {
    fn get_object(&self, path: &ObjectPath) -> BackendResult<Vec<u8>> {
        self.objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
            .ok_or_else(|| BackendError::ObjectNotFound(path.to_string()))
    }
}

impl std::fmt::Debug for InMemoryObjectProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectProvider")
            .field("object_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> ObjectPath {
        ObjectPath::new(s).unwrap()
    }

    #[test]
    fn insert_and_get() {
        let p = InMemoryObjectProvider::new();
        assert!(p.is_empty());
        p.insert(path("/TPC/Calib"), b"bytes".to_vec());
        assert_eq!(p.len(), 1);
        assert!(p.contains(&path("/TPC/Calib")));
        assert_eq!(p.get_object(&path("/TPC/Calib")).unwrap(), b"bytes");
    }

    #[test]
    fn paths_are_exact() {
        let p = InMemoryObjectProvider::new();
        p.insert(path("/TPC/Calib"), b"x".to_vec());
        assert!(p.get_object(&path("TPC/Calib")).is_err());
    }

    #[test]
    fn missing_is_not_found() {
        let p = InMemoryObjectProvider::new();
        let err = p.get_object(&path("/nonexistent")).unwrap_err();
        assert!(matches!(err, BackendError::ObjectNotFound(ref s) if s == "/nonexistent"));
    }

    #[test]
    fn insert_replaces_and_remove_deletes() {
        let p = InMemoryObjectProvider::new();
        p.insert(path("/a"), b"one".to_vec());
        p.insert(path("/a"), b"two".to_vec());
        assert_eq!(p.get_object(&path("/a")).unwrap(), b"two");
        assert!(p.remove(&path("/a")));
        assert!(!p.remove(&path("/a")));
        assert!(p.is_empty());
    }

    #[test]
    fn debug_shows_count() {
        let p = InMemoryObjectProvider::new();
        p.insert(path("/a"), Vec::new());
        assert_eq!(format!("{p:?}"), "InMemoryObjectProvider { object_count: 1 }");
    }
}
