use std::collections::HashMap;

use schemport_core::BlockPos;
use schemport_nbt::Compound;

use crate::grid::AuxRecord;

/// Tile-entity payloads keyed by exact voxel position.
///
/// Source documents do not guarantee unique positions; when two records
/// share one, the later record replaces the earlier.
#[derive(Debug, Clone, Default)]
pub struct MetadataIndex {
    records: HashMap<BlockPos, Compound>,
}

impl MetadataIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index records in input order (last write wins).
    pub fn build(records: Vec<AuxRecord>) -> Self {
        let mut index = Self::new();
        for record in records {
            index.insert(record.pos, record.payload);
        }
        index
    }

    /// Insert a payload, returning the one it replaced.
    pub fn insert(&mut self, pos: BlockPos, payload: Compound) -> Option<Compound> {
        let previous = self.records.insert(pos, payload);
        if previous.is_some() {
            log::debug!("duplicate tile entity at {pos}, keeping the later record");
        }
        previous
    }

    #[cfg(test)]
    pub fn get(&self, pos: BlockPos) -> Option<&Compound> {
        self.records.get(&pos)
    }

    /// Remove and return the payload at `pos`.
    pub fn take(&mut self, pos: BlockPos) -> Option<Compound> {
        self.records.remove(&pos)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Positions still indexed, in no particular order.
    pub fn positions(&self) -> impl Iterator<Item = BlockPos> + '_ {
        self.records.keys().copied()
    }
}
