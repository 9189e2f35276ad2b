//! Foundation types for the CCDB object-store backend.
//!
//! Every other `ccdb-*` crate depends on `ccdb-types`.
//!
//! # Key Types
//!
//! - [`CalibrationObject`]: Immutable calibration payload with its key and source path
//! - [`ObjectPath`]: Validated logical path into the source-of-truth store
//! - [`ObjectDigest`]: BLAKE3 digest of an object's bytes

pub mod digest;
pub mod error;
pub mod object;
pub mod path;

pub use digest::ObjectDigest;
pub use error::TypeError;
pub use object::CalibrationObject;
pub use path::ObjectPath;
