use serde::{Deserialize, Serialize};

use crate::digest::ObjectDigest;
use crate::path::ObjectPath;

/// An immutable calibration object together with the key it is stored under.
///
/// The byte payload is opaque to the backend. `path` records where the
/// object lives in the source-of-truth store; it is `None` for objects
/// reconstructed from an inbound message that did not echo the path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationObject {
    path: Option<ObjectPath>,
    key: String,
    data: Vec<u8>,
}

impl CalibrationObject {
    pub fn new(path: Option<ObjectPath>, key: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            path,
            key: key.into(),
            data,
        }
    }

    pub fn path(&self) -> Option<&ObjectPath> {
        self.path.as_ref()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Raw (uncompressed) object bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn digest(&self) -> ObjectDigest {
        ObjectDigest::of(&self.data)
    }

    /// Consume the object and return its bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}
