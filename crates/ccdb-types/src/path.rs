use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Logical path of a calibration object in the source-of-truth store,
/// e.g. `/TPC/Calib/Pedestals` or `MID/Align/run_1234`.
///
/// Paths are `/`-separated and opaque beyond three rules: they must contain
/// at least one non-empty segment, no NUL byte, and no `..` segment. A
/// leading `/` is kept as given so the path round-trips through the wire
/// envelope unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectPath(String);

impl ObjectPath {
    pub fn new(path: impl Into<String>) -> Result<Self, TypeError> {
        let path = path.into();
        if path.contains('\0') {
            return Err(TypeError::InvalidPath { path, reason: "contains NUL byte" });
        }
        if path.split('/').any(|seg| seg == "..") {
            return Err(TypeError::InvalidPath { path, reason: "contains '..' segment" });
        }
        if path.split('/').all(str::is_empty) {
            return Err(TypeError::InvalidPath { path, reason: "no path segments" });
        }
        Ok(Self(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Non-empty `/`-separated segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ObjectPath {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ObjectPath {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ObjectPath {
    type Error = TypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ObjectPath> for String {
    fn from(path: ObjectPath) -> Self {
        path.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn absolute_path_is_preserved() {
        let p = ObjectPath::new("/TPC/Calib/Pedestals").unwrap();
        assert_eq!(p.as_str(), "/TPC/Calib/Pedestals");
        assert_eq!(p.segments().collect::<Vec<_>>(), vec!["TPC", "Calib", "Pedestals"]);
        assert_eq!(p.to_string(), "/TPC/Calib/Pedestals");
    }

    #[test]
    fn segments_skip_empty_parts() {
        let p = ObjectPath::new("//MID//Align/").unwrap();
        assert_eq!(p.segments().collect::<Vec<_>>(), vec!["MID", "Align"]);
    }

    #[test]
    fn rejects_empty_and_root() {
        assert!(ObjectPath::new("").is_err());
        assert!(ObjectPath::new("/").is_err());
        assert!(ObjectPath::new("///").is_err());
    }

    #[test]
    fn rejects_parent_segment() {
        let err = ObjectPath::new("/TPC/../etc/passwd").unwrap_err();
        assert!(matches!(err, TypeError::InvalidPath { reason: "contains '..' segment", .. }));
    }

    #[test]
    fn dotted_names_are_fine() {
        assert!(ObjectPath::new("/TPC/calib..v2/obj").is_ok());
        assert!(ObjectPath::new("./local").is_ok());
    }

    #[test]
    fn rejects_nul() {
        assert!(ObjectPath::new("/a\0b").is_err());
    }

    #[test]
    fn serde_validates() {
        let ok: ObjectPath = serde_json::from_str("\"/TPC/Calib\"").unwrap();
        assert_eq!(ok.as_str(), "/TPC/Calib");
        assert!(serde_json::from_str::<ObjectPath>("\"/../x\"").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "\"/TPC/Calib\"");
    }

    proptest! {
        #[test]
        fn valid_paths_have_clean_segments(s in "[a-zA-Z0-9_/]{1,40}") {
            if let Ok(p) = ObjectPath::new(s) {
                prop_assert!(p.segments().count() > 0);
                prop_assert!(p.segments().all(|seg| !seg.is_empty() && !seg.contains('/')));
            }
        }
    }
}
