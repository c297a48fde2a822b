pub mod batch;
pub mod document;
pub mod error;
pub mod grid;
pub mod metadata;
pub mod palette;
pub mod pipeline;
pub mod progress;
pub mod stream;

pub use batch::{BatchCoordinator, BatchSummary, ConversionJob, FileOutcome};
pub use document::StructureDocument;
pub use error::{ConversionError, PersistError, SourceError};
pub use grid::{AuxRecord, SourceGrid};
pub use metadata::MetadataIndex;
pub use palette::{BlockPalette, PaletteEntry};
pub use pipeline::FilePipeline;
pub use progress::{NoProgress, NullDisplay, ProgressDisplay, ProgressSink};
pub use stream::BlockEntry;
