use std::io::Read;
use std::path::Path;

use glam::IVec3;
use schemport_core::constants::SOURCE_ROOT_NAME;
use schemport_core::{BlockPos, Dimensions};
use schemport_nbt::{Compound, Tag};

use crate::error::SourceError;

/// One tile-entity record: its position and the full record payload.
#[derive(Debug, Clone, PartialEq)]
pub struct AuxRecord {
    pub pos: BlockPos,
    pub payload: Compound,
}

/// A loaded source document: dimensions, flat block ids and tile-entity
/// records. Block ids are kept exactly as stored (signed); correction
/// happens during conversion.
#[derive(Debug, Clone)]
pub struct SourceGrid {
    dimensions: Dimensions,
    block_ids: Vec<i32>,
    aux_records: Vec<AuxRecord>,
}

impl SourceGrid {
    /// Build a grid, checking that the id array matches the dimensions.
    pub fn new(
        dimensions: Dimensions,
        block_ids: Vec<i32>,
        aux_records: Vec<AuxRecord>,
    ) -> Result<Self, SourceError> {
        let expected = dimensions
            .voxel_count()
            .ok_or(SourceError::LengthMismatch {
                expected: u64::MAX,
                actual: block_ids.len(),
            })?;
        if expected != block_ids.len() as u64 {
            return Err(SourceError::LengthMismatch {
                expected,
                actual: block_ids.len(),
            });
        }
        Ok(Self {
            dimensions,
            block_ids,
            aux_records,
        })
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn block_ids(&self) -> &[i32] {
        &self.block_ids
    }

    pub fn aux_records(&self) -> &[AuxRecord] {
        &self.aux_records
    }

    /// Number of voxels, equal to `length * height * width`.
    pub fn voxel_count(&self) -> u64 {
        self.block_ids.len() as u64
    }

    /// Split off the tile-entity records, leaving the grid without them.
    pub fn take_aux_records(&mut self) -> Vec<AuxRecord> {
        std::mem::take(&mut self.aux_records)
    }
}

/// Load a source document from disk (gzip or raw).
pub fn open(path: &Path) -> Result<SourceGrid, SourceError> {
    let (_, root) = schemport_nbt::read_file(path)?;
    from_root(root)
}

/// Load a source document from any reader (gzip or raw).
pub fn read<R: Read>(reader: R) -> Result<SourceGrid, SourceError> {
    let (_, root) = schemport_nbt::read_root(reader)?;
    from_root(root)
}

/// Pre-scan helper: fully loads `path` and returns its voxel count.
pub fn scan_voxel_count(path: &Path) -> Result<u64, SourceError> {
    Ok(open(path)?.voxel_count())
}

/// Interpret a decoded root compound as a schematic.
///
/// The fields are read from the root itself, or from a `Schematic` child
/// compound when the root wraps one.
pub fn from_root(mut root: Compound) -> Result<SourceGrid, SourceError> {
    let mut schematic = match root.remove(SOURCE_ROOT_NAME) {
        Some(Tag::Compound(inner)) => inner,
        Some(other) => {
            root.insert(SOURCE_ROOT_NAME, other);
            root
        }
        None => root,
    };

    let dimensions = Dimensions::new(
        dimension(&schematic, "Length")?,
        dimension(&schematic, "Height")?,
        dimension(&schematic, "Width")?,
    );

    let block_ids: Vec<i32> = match schematic.remove("Blocks") {
        Some(Tag::ByteArray(bytes)) => bytes.into_iter().map(i32::from).collect(),
        Some(Tag::IntArray(ids)) => ids,
        Some(other) => {
            return Err(SourceError::WrongType {
                field: "Blocks",
                expected: "ByteArray",
                found: other.tag_type(),
            })
        }
        None => return Err(SourceError::MissingField("Blocks")),
    };

    let aux_records = match schematic.remove("TileEntities") {
        Some(Tag::List(items)) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| aux_record(index, item))
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(SourceError::WrongType {
                field: "TileEntities",
                expected: "List",
                found: other.tag_type(),
            })
        }
        None => Vec::new(),
    };

    log::debug!(
        "schematic {}x{}x{} with {} tile entities",
        dimensions.length,
        dimensions.height,
        dimensions.width,
        aux_records.len()
    );

    SourceGrid::new(dimensions, block_ids, aux_records)
}

fn dimension(schematic: &Compound, field: &'static str) -> Result<u32, SourceError> {
    let tag = schematic
        .get(field)
        .ok_or(SourceError::MissingField(field))?;
    let value = tag.as_i64().ok_or(SourceError::WrongType {
        field,
        expected: "integer",
        found: tag.tag_type(),
    })?;
    u32::try_from(value)
        .ok()
        .filter(|&v| i32::try_from(v).is_ok())
        .ok_or(SourceError::InvalidDimension { field, value })
}

fn aux_record(index: usize, item: Tag) -> Result<AuxRecord, SourceError> {
    let Tag::Compound(payload) = item else {
        return Err(SourceError::MalformedRecord {
            index,
            reason: format!("expected Compound, found {:?}", item.tag_type()),
        });
    };
    let coord = |axis: &str| -> Result<i32, SourceError> {
        payload
            .get(axis)
            .and_then(Tag::as_i64)
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| SourceError::MalformedRecord {
                index,
                reason: format!("missing or invalid `{axis}` coordinate"),
            })
    };
    let pos = IVec3::new(coord("x")?, coord("y")?, coord("z")?);
    Ok(AuxRecord { pos, payload })
}
