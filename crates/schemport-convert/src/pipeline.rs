use std::path::Path;

use schemport_core::ConvertConfig;

use crate::document::StructureDocument;
use crate::error::{ConversionError, PersistError};
use crate::grid::{self, SourceGrid};
use crate::metadata::MetadataIndex;
use crate::palette::BlockPalette;
use crate::progress::ProgressSink;
use crate::stream;

/// Root name written on structure documents.
const TARGET_ROOT_NAME: &str = "";

const STAGING_PREFIX: &str = ".schemport-";
const STAGING_SUFFIX: &str = ".part";

/// Converts one source file into one structure file.
#[derive(Debug, Clone, Default)]
pub struct FilePipeline {
    config: ConvertConfig,
}

impl FilePipeline {
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }

    /// Load `source`, convert it and write the result to `dest`.
    ///
    /// Failures are logged with the source path and returned; nothing is
    /// written to `dest` unless the whole conversion succeeds.
    pub fn convert<P: ProgressSink + ?Sized>(
        &self,
        source: &Path,
        dest: &Path,
        progress: &P,
    ) -> Result<(), ConversionError> {
        let result = self.try_convert(source, dest, progress);
        if let Err(e) = &result {
            log::error!("An error occurred while processing {}: {e}", source.display());
        }
        result
    }

    fn try_convert<P: ProgressSink + ?Sized>(
        &self,
        source: &Path,
        dest: &Path,
        progress: &P,
    ) -> Result<(), ConversionError> {
        log::info!("Processing {}...", source.display());
        let grid = grid::open(source).map_err(|source_err| ConversionError::SourceLoad {
            path: source.to_path_buf(),
            source: source_err,
        })?;

        let document = self.build_document(grid, progress);

        log::info!("Saving {}...", dest.display());
        self.persist(&document, dest)
            .map_err(|source_err| ConversionError::Persist {
                path: dest.to_path_buf(),
                source: source_err,
            })
    }

    /// Run palette, metadata and block conversion over an in-memory grid.
    pub fn build_document<P: ProgressSink + ?Sized>(
        &self,
        mut grid: SourceGrid,
        progress: &P,
    ) -> StructureDocument {
        let mut palette =
            BlockPalette::build(&self.config.namespace, self.config.palette, grid.block_ids());
        let mut metadata = MetadataIndex::build(grid.take_aux_records());
        let blocks = stream::convert_blocks(&grid, &mut palette, &mut metadata, progress);
        StructureDocument::assemble(&self.config, grid.dimensions(), palette, blocks)
    }

    /// Write `document` gzip-compressed to `dest`.
    ///
    /// Output goes to a uniquely named staging file in `dest`'s folder and is
    /// renamed into place, so `dest` only ever holds a complete document and
    /// concurrent writers never share a staging file. The staging file is
    /// removed if writing fails.
    pub fn persist(&self, document: &StructureDocument, dest: &Path) -> Result<(), PersistError> {
        let folder = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(STAGING_SUFFIX)
            .tempfile_in(folder)?;
        log::debug!("staging {} at {}", dest.display(), staging.path().display());

        let staging = schemport_nbt::write_gzip(
            staging,
            TARGET_ROOT_NAME,
            &document.to_compound(),
            self.config.effective_compression_level(),
        )?;
        staging.persist(dest).map_err(|e| PersistError::Io(e.error))?;
        Ok(())
    }
}
