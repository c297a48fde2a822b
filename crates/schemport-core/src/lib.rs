pub mod config;
pub mod constants;
pub mod error;
pub mod types;

pub use config::{ConvertConfig, PaletteStrategy};
pub use error::ConfigError;
pub use types::{BlockPos, Dimensions};
