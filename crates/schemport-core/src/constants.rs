//! Shared constants for the source and target formats.
//! Both the converter and the CLI read these; nothing else defines them.

/// Smallest block identifier the source format can store.
pub const BLOCK_ID_MIN: i32 = 0;

/// Largest block identifier the source format can store.
pub const BLOCK_ID_MAX: i32 = 255;

/// Number of identifiers in the closed range [BLOCK_ID_MIN, BLOCK_ID_MAX].
pub const BLOCK_ID_COUNT: usize = (BLOCK_ID_MAX - BLOCK_ID_MIN + 1) as usize;

/// Offset added to a negative stored byte to reinterpret it as unsigned.
pub const SIGNED_BYTE_WRAP: i32 = 256;

/// Namespace used for placeholder block names.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Author string written into every structure document.
pub const DEFAULT_AUTHOR: &str = "schemport";

/// Data version stamped on structure documents (game release 1.16.x).
pub const STRUCTURE_DATA_VERSION: i32 = 2586;

/// Default gzip level for structure output.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Highest gzip level accepted by the encoder.
pub const MAX_COMPRESSION_LEVEL: u32 = 9;

/// Conventional root tag name of a source schematic.
pub const SOURCE_ROOT_NAME: &str = "Schematic";

/// File extension given to converted structure files.
pub const OUTPUT_EXTENSION: &str = "nbt";
