//! Persistence slots.
//!
//! The whole collection is one serialized blob in a single named slot,
//! rewritten wholesale after every mutation and read once at startup. There
//! is no partial persistence and no rollback.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub mod error {
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum BackendError {
        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),

        #[error("encode error: {0}")]
        Encode(#[from] serde_json::Error),
    }
}

mod file;
mod memory;

pub use file::FileSlot;
pub use memory::MemorySlot;

use error::BackendError;

/// A single named key-value slot holding one serialized collection.
pub trait Slot {
    /// Reads the blob, `None` if the slot has never been written.
    fn read(&self) -> Result<Option<String>, BackendError>;

    /// Overwrites the blob.
    fn write(&mut self, blob: &str) -> Result<(), BackendError>;
}

/// Current collection blob format version.
pub(crate) const FORMAT_VERSION: u8 = 1;

/// Envelope around a persisted collection: `{"version":1,"records":[...]}`.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Envelope<R> {
    pub(crate) version: u8,
    pub(crate) records: R,
}

pub(crate) fn encode<T: Serialize>(records: &[T]) -> Result<String, BackendError> {
    Ok(serde_json::to_string(&Envelope {
        version: FORMAT_VERSION,
        records,
    })?)
}

/// Decodes a collection blob.
///
/// Accepts the current envelope format and the legacy format, a bare JSON
/// array as written by older deployments. Legacy blobs are rewritten as
/// envelopes on the next mutation. Returns `None` for an unsupported version
/// or an undecodable blob.
pub(crate) fn decode<T: DeserializeOwned>(blob: &str) -> Option<Vec<T>> {
    match serde_json::from_str::<Envelope<Vec<T>>>(blob) {
        Ok(Envelope {
            version: FORMAT_VERSION,
            records,
        }) => Some(records),
        Ok(Envelope { version, .. }) => {
            warn!(version, "unsupported collection format version");
            None
        }
        Err(_) => serde_json::from_str::<Vec<T>>(blob).ok(),
    }
}

#[cfg(test)]
mod tests;
