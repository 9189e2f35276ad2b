//! Object-store backend for the CCDB conditions database.
//!
//! The backend turns calibration objects into requests for a distributed
//! key-value store and turns inbound store messages back into objects:
//!
//! - **Pack**: provider read → compress → PUT envelope → transport
//! - **Unpack**: transport → envelope decode → decompress → [`CalibrationObject`]
//!
//! The object source and the messaging transport are injected through the
//! [`ObjectProvider`] and [`MessageTransport`] traits. The destination store
//! and codec parameters come from an explicit [`BackendConfig`].
//!
//! # Providers
//!
//! - [`InMemoryObjectProvider`] -- `HashMap`-based provider for tests and embedding
//! - [`FileObjectProvider`] -- objects stored as files under a root directory
//!
//! # Transports
//!
//! - [`ChannelTransport`] -- in-process loopback pair over tokio channels
//! - [`StreamTransport`] -- length-prefixed frames over any async byte stream
//!
//! # Design Rules
//!
//! 1. The backend keeps no state between calls; concurrent calls share nothing mutable.
//! 2. Any failure aborts the whole pack or unpack. No partial objects, no retries.
//! 3. Outbound envelopes always carry compressed bytes, never raw object bytes.
//!
//! [`CalibrationObject`]: ccdb_types::CalibrationObject

pub mod backend;
pub mod config;
pub mod error;
pub mod file;
pub mod provider;
pub mod stream;
pub mod transport;

pub use backend::Backend;
pub use config::{BackendConfig, DEFAULT_STORE};
pub use error::{BackendError, BackendResult};
pub use file::FileObjectProvider;
pub use provider::{InMemoryObjectProvider, ObjectProvider};
pub use stream::StreamTransport;
pub use transport::{ChannelTransport, Delivery, MessageTransport};
