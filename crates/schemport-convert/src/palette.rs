use std::collections::HashMap;

use schemport_core::constants::{BLOCK_ID_COUNT, BLOCK_ID_MAX, BLOCK_ID_MIN, SIGNED_BYTE_WRAP};
use schemport_core::PaletteStrategy;
use schemport_nbt::Compound;

/// One palette slot: a block name and its (always empty) state properties.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteEntry {
    pub name: String,
    pub properties: Compound,
}

/// Ordered, duplicate-free list of block names. An entry's position is the
/// `state` index that block entries refer to.
#[derive(Debug, Clone)]
pub struct BlockPalette {
    namespace: String,
    entries: Vec<PaletteEntry>,
    by_name: HashMap<String, u32>,
    /// Fast path for in-range ids: corrected id -> palette index.
    by_id: [Option<u32>; BLOCK_ID_COUNT],
}

/// Placeholder name for a numeric block id, e.g. `minecraft:unknown_35`.
pub fn placeholder_name(namespace: &str, id: i32) -> String {
    format!("{namespace}:unknown_{id}")
}

/// Reinterpret a stored signed byte as unsigned. Only negative values move;
/// anything else, including ids above the byte range, passes through.
pub fn correct_id(raw: i32) -> i32 {
    if raw < 0 {
        raw + SIGNED_BYTE_WRAP
    } else {
        raw
    }
}

fn in_range(id: i32) -> bool {
    (BLOCK_ID_MIN..=BLOCK_ID_MAX).contains(&id)
}

impl BlockPalette {
    /// An empty palette whose placeholders use `namespace`.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            entries: Vec::new(),
            by_name: HashMap::new(),
            by_id: [None; BLOCK_ID_COUNT],
        }
    }

    /// Palette with one placeholder per id in the source range, ascending.
    pub fn full_range(namespace: impl Into<String>) -> Self {
        let mut palette = Self::new(namespace);
        for id in BLOCK_ID_MIN..=BLOCK_ID_MAX {
            palette.resolve(id);
        }
        palette
    }

    /// Palette with a placeholder for each in-range id that occurs in
    /// `raw_ids` (after correction), ascending.
    pub fn compact(namespace: impl Into<String>, raw_ids: &[i32]) -> Self {
        let mut seen = [false; BLOCK_ID_COUNT];
        for &raw in raw_ids {
            let id = correct_id(raw);
            if in_range(id) {
                seen[(id - BLOCK_ID_MIN) as usize] = true;
            }
        }
        let mut palette = Self::new(namespace);
        for (offset, _) in seen.iter().enumerate().filter(|(_, used)| **used) {
            palette.resolve(BLOCK_ID_MIN + offset as i32);
        }
        palette
    }

    /// Build the starting palette for a grid according to `strategy`.
    pub fn build(namespace: impl Into<String>, strategy: PaletteStrategy, raw_ids: &[i32]) -> Self {
        match strategy {
            PaletteStrategy::FullRange => Self::full_range(namespace),
            PaletteStrategy::Compact => Self::compact(namespace, raw_ids),
        }
    }

    /// Palette index for a corrected id, appending its placeholder on first
    /// sight. Never fails: out-of-range ids get a placeholder built from
    /// their numeric value.
    pub fn resolve(&mut self, id: i32) -> u32 {
        let slot = in_range(id).then(|| (id - BLOCK_ID_MIN) as usize);
        if let Some(index) = slot.and_then(|s| self.by_id[s]) {
            return index;
        }
        let index = self.insert(placeholder_name(&self.namespace, id));
        if let Some(s) = slot {
            self.by_id[s] = Some(index);
        }
        index
    }

    /// Index of `name`, inserting it with empty properties if absent.
    pub fn insert(&mut self, name: String) -> u32 {
        if let Some(&index) = self.by_name.get(&name) {
            return index;
        }
        let index = self.entries.len() as u32;
        self.by_name.insert(name.clone(), index);
        self.entries.push(PaletteEntry {
            name,
            properties: Compound::new(),
        });
        index
    }

    pub fn index_of(&self, name: &str) -> Option<u32> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, index: u32) -> Option<&PaletteEntry> {
        self.entries.get(index as usize)
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
