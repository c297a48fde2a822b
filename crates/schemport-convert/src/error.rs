use std::path::PathBuf;

use schemport_nbt::{NbtError, TagType};

/// Reasons a source document cannot be turned into a grid.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("tag decoding failed: {0}")]
    Decode(#[from] NbtError),

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` is {found:?}, expected {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: TagType,
    },

    #[error("dimension `{field}` out of range: {value}")]
    InvalidDimension { field: &'static str, value: i64 },

    #[error("block array holds {actual} ids, dimensions require {expected}")]
    LengthMismatch { expected: u64, actual: usize },

    #[error("tile entity #{index} is malformed: {reason}")]
    MalformedRecord { index: usize, reason: String },
}

/// Reasons a converted document cannot be written.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("tag encoding failed: {0}")]
    Encode(#[from] NbtError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A failed single-file conversion. Always names the offending path.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("failed to load {}: {source}", path.display())]
    SourceLoad {
        path: PathBuf,
        #[source]
        source: SourceError,
    },

    #[error("failed to write {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: PersistError,
    },

    #[error("conversion worker for {} panicked", path.display())]
    WorkerPanicked { path: PathBuf },

    #[error("could not start worker for {}: {source}", path.display())]
    WorkerSpawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
