//! Binary tag format: the big-endian, length-prefixed tree encoding used by
//! both schematic and structure documents.

pub mod error;
pub mod read;
pub mod tag;
pub mod write;

pub use error::NbtError;
pub use read::{read_file, read_root, MAX_DEPTH};
pub use tag::{Compound, Tag, TagType};
pub use write::{write_gzip, write_gzip_file, write_root};
