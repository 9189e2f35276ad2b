//! Wire protocol for the CCDB object-store backend.
//!
//! A request travelling to or from the distributed key-value store is a
//! protobuf [`RequestMessage`]: operation, destination store, key, and an
//! opaque value holding the compressed object. [`EnvelopeCodec`] converts
//! between that wire form and the validated [`Envelope`] used by the
//! backend. [`FrameCodec`] adds a length prefix for byte-stream transports
//! that have no message boundaries of their own.

pub mod codec;
pub mod error;
pub mod frame;
pub mod message;

pub use codec::{decode, encode, EnvelopeCodec};
pub use error::{ProtocolError, ProtocolResult};
pub use frame::{FrameCodec, ENVELOPE_V1, FRAME_HEADER_LEN};
pub use message::{Envelope, Operation, RequestMessage, MAX_MESSAGE_SIZE};
