use crate::tag::TagType;

/// Errors that can occur while decoding or encoding a tag document.
#[derive(Debug, thiserror::Error)]
pub enum NbtError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown tag id {0}")]
    UnknownTag(u8),

    #[error("negative length {0}")]
    NegativeLength(i32),

    #[error("list of End tags with non-zero length {0}")]
    NonEmptyEndList(i32),

    #[error("nesting deeper than {0} levels")]
    DepthLimit(usize),

    #[error("root tag must be a compound, found tag id {0}")]
    RootNotCompound(u8),

    #[error("list mixes {expected:?} and {found:?} elements")]
    HeterogeneousList { expected: TagType, found: TagType },

    #[error("string of {0} bytes exceeds the 65535-byte limit")]
    StringTooLong(usize),

    #[error("sequence of {0} elements exceeds the i32 length limit")]
    LengthOverflow(usize),
}
