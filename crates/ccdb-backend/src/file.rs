use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use ccdb_types::ObjectPath;
use tracing::debug;

use crate::error::{BackendError, BackendResult};
use crate::provider::ObjectProvider;

/// Object provider backed by a directory tree.
///
/// The object at `/TPC/Calib/Pedestals` is the file
/// `<root>/TPC/Calib/Pedestals`. The file contents are returned as-is.
#[derive(Clone, Debug)]
pub struct FileObjectProvider {
    root: PathBuf,
}

impl FileObjectProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// On-disk location of `path`.
    pub fn resolve(&self, path: &ObjectPath) -> PathBuf {
        path.segments().fold(self.root.clone(), |acc, seg| acc.join(seg))
    }
}

impl ObjectProvider for FileObjectProvider {
    fn get_object(&self, path: &ObjectPath) -> BackendResult<Vec<u8>> {
        let file = self.resolve(path);
        if file.is_dir() {
            return Err(BackendError::ObjectNotFound(path.to_string()));
        }
        match std::fs::read(&file) {
            Ok(data) => {
                debug!(path = %path, file = %file.display(), size = data.len(), "read object from disk");
                Ok(data)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(BackendError::ObjectNotFound(path.to_string()))
            }
            Err(e) => Err(BackendError::Io(e)),
        }
    }
}
