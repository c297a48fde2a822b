use schemport_core::{ConvertConfig, Dimensions};
use schemport_nbt::{Compound, Tag};

use crate::palette::BlockPalette;
use crate::stream::BlockEntry;

/// A structure document ready to be written: header fields, palette and
/// blocks in traversal order.
#[derive(Debug, Clone)]
pub struct StructureDocument {
    pub data_version: i32,
    pub author: String,
    /// (x, y, z) extent.
    pub size: [i32; 3],
    pub palette: BlockPalette,
    pub blocks: Vec<BlockEntry>,
}

impl StructureDocument {
    /// Assemble a document. `dimensions` are mapped to
    /// `size = (length, height, width)`.
    pub fn assemble(
        config: &ConvertConfig,
        dimensions: Dimensions,
        palette: BlockPalette,
        blocks: Vec<BlockEntry>,
    ) -> Self {
        Self {
            data_version: config.data_version,
            author: config.author.clone(),
            size: dimensions.size(),
            palette,
            blocks,
        }
    }

    /// Tag tree in the structure-file layout.
    pub fn to_compound(&self) -> Compound {
        let palette: Vec<Tag> = self
            .palette
            .entries()
            .iter()
            .map(|entry| {
                let mut state = Compound::new();
                state.insert("Name", entry.name.as_str());
                state.insert("Properties", entry.properties.clone());
                Tag::Compound(state)
            })
            .collect();

        let blocks: Vec<Tag> = self
            .blocks
            .iter()
            .map(|block| {
                let mut entry = Compound::new();
                entry.insert("state", block.state as i32);
                entry.insert("pos", int_list(block.pos.to_array()));
                if let Some(nbt) = &block.nbt {
                    entry.insert("nbt", nbt.clone());
                }
                Tag::Compound(entry)
            })
            .collect();

        let mut root = Compound::new();
        root.insert("DataVersion", self.data_version);
        root.insert("author", self.author.as_str());
        root.insert("size", int_list(self.size));
        root.insert("palette", palette);
        root.insert("blocks", blocks);
        root
    }
}

fn int_list(values: [i32; 3]) -> Tag {
    Tag::List(values.iter().map(|&v| Tag::Int(v)).collect())
}
