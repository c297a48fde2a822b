use glam::IVec3;
use schemport_core::BlockPos;
use schemport_nbt::Compound;

use crate::grid::SourceGrid;
use crate::metadata::MetadataIndex;
use crate::palette::{correct_id, BlockPalette};
use crate::progress::ProgressSink;

/// One voxel of the output document.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockEntry {
    /// Index into the document palette.
    pub state: u32,
    pub pos: BlockPos,
    /// Tile-entity payload recorded at `pos`, if any.
    pub nbt: Option<Compound>,
}

/// Walk every voxel of `grid` and emit its block entry.
///
/// Traversal order is y outer, z middle, x inner, which matches the flat
/// array layout `y*width*length + z*length + x`; the returned entries are in
/// that order. Attached payloads are moved out of `metadata`, so whatever
/// remains afterwards lay outside the grid. `progress` is ticked once per
/// voxel.
pub fn convert_blocks<P: ProgressSink + ?Sized>(
    grid: &SourceGrid,
    palette: &mut BlockPalette,
    metadata: &mut MetadataIndex,
    progress: &P,
) -> Vec<BlockEntry> {
    let dims = grid.dimensions();
    let ids = grid.block_ids();

    let mut blocks = Vec::with_capacity(ids.len());
    for y in 0..dims.height {
        for z in 0..dims.width {
            for x in 0..dims.length {
                let pos = IVec3::new(x as i32, y as i32, z as i32);
                let Some(&id) = dims.linear_index(pos).and_then(|i| ids.get(i)) else {
                    continue;
                };
                let state = palette.resolve(correct_id(id));
                let nbt = metadata.take(pos);
                blocks.push(BlockEntry { state, pos, nbt });
                progress.tick();
            }
        }
    }

    if !metadata.is_empty() {
        for pos in metadata.positions() {
            log::debug!("tile entity at {pos} has no matching voxel");
        }
        log::warn!(
            "{} tile entities lie outside the {}x{}x{} grid and were dropped",
            metadata.len(),
            dims.length,
            dims.height,
            dims.width
        );
    }

    blocks
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use schemport_core::{Dimensions, PaletteStrategy};

    use super::*;
    use crate::grid::AuxRecord;
    use crate::progress::NoProgress;

    fn grid(dims: (u32, u32, u32), ids: Vec<i32>) -> SourceGrid {
        SourceGrid::new(Dimensions::new(dims.0, dims.1, dims.2), ids, Vec::new())
            .expect("valid grid")
    }

    fn run(grid: &SourceGrid, strategy: PaletteStrategy) -> (BlockPalette, Vec<BlockEntry>) {
        let mut palette = BlockPalette::build("minecraft", strategy, grid.block_ids());
        let mut metadata = MetadataIndex::new();
        let blocks = convert_blocks(grid, &mut palette, &mut metadata, &NoProgress);
        (palette, blocks)
    }

    fn name<'a>(palette: &'a BlockPalette, entry: &BlockEntry) -> &'a str {
        &palette.get(entry.state).expect("state in palette").name
    }

    #[test]
    fn test_uniform_grid_single_palette_entry() {
        let g = grid((3, 2, 4), vec![42; 24]);
        let (palette, blocks) = run(&g, PaletteStrategy::Compact);
        assert_eq!(palette.len(), 1);
        assert_eq!(blocks.len(), 24);
        assert!(blocks.iter().all(|b| b.state == 0));
        assert_eq!(name(&palette, &blocks[0]), "minecraft:unknown_42");
    }

    #[test]
    fn test_uniform_grid_full_range_references_its_slot() {
        let g = grid((2, 2, 2), vec![42; 8]);
        let (palette, blocks) = run(&g, PaletteStrategy::FullRange);
        assert_eq!(palette.len(), 256);
        assert!(blocks.iter().all(|b| b.state == 42));
    }

    #[test]
    fn test_every_id_present_gives_256_ascending() {
        // Store ids as the source does: 128..=255 appear as negative bytes.
        let ids: Vec<i32> = (0..256).rev().map(|v| (v as u8 as i8) as i32).collect();
        let g = grid((16, 16, 1), ids);
        for strategy in [PaletteStrategy::FullRange, PaletteStrategy::Compact] {
            let (palette, _) = run(&g, strategy);
            assert_eq!(palette.len(), 256);
            for (i, entry) in palette.entries().iter().enumerate() {
                assert_eq!(entry.name, format!("minecraft:unknown_{i}"));
            }
        }
    }

    #[test]
    fn test_negative_one_matches_255() {
        let g = grid((2, 1, 1), vec![-1, 255]);
        for strategy in [PaletteStrategy::FullRange, PaletteStrategy::Compact] {
            let (palette, blocks) = run(&g, strategy);
            assert_eq!(blocks[0].state, blocks[1].state);
            assert_eq!(name(&palette, &blocks[0]), "minecraft:unknown_255");
        }
    }

    #[test]
    fn test_out_of_range_id_does_not_abort() {
        let g = grid((3, 1, 1), vec![1, 9999, 2]);
        let (palette, blocks) = run(&g, PaletteStrategy::FullRange);
        assert_eq!(blocks.len(), 3);
        assert_eq!(name(&palette, &blocks[1]), "minecraft:unknown_9999");
        assert_eq!(blocks[1].state, 256);
        assert_eq!(name(&palette, &blocks[2]), "minecraft:unknown_2");
    }

    #[test]
    fn test_far_negative_id_uses_corrected_value() {
        let g = grid((1, 1, 1), vec![-300]);
        let (palette, blocks) = run(&g, PaletteStrategy::Compact);
        assert_eq!(name(&palette, &blocks[0]), "minecraft:unknown_-44");
    }

    #[test]
    fn test_traversal_order_y_then_z_then_x() {
        let g = grid((2, 2, 2), (0..8).collect());
        let (_, blocks) = run(&g, PaletteStrategy::FullRange);
        let positions: Vec<_> = blocks.iter().map(|b| b.pos.to_array()).collect();
        assert_eq!(
            positions,
            vec![
                [0, 0, 0],
                [1, 0, 0],
                [0, 0, 1],
                [1, 0, 1],
                [0, 1, 0],
                [1, 1, 0],
                [0, 1, 1],
                [1, 1, 1],
            ]
        );
        assert!(blocks[..4].iter().all(|b| b.pos.y == 0));
        assert!(blocks[4..].iter().all(|b| b.pos.y == 1));
        // Linear layout means the i-th entry reads the i-th id.
        for (i, b) in blocks.iter().enumerate() {
            assert_eq!(b.state, i as u32);
        }
    }

    #[test]
    fn test_position_recomputes_traversal_index() {
        let dims = Dimensions::new(3, 4, 5);
        let g = grid((3, 4, 5), vec![0; 60]);
        let (_, blocks) = run(&g, PaletteStrategy::Compact);
        for (rank, b) in blocks.iter().enumerate() {
            assert_eq!(dims.linear_index(b.pos), Some(rank));
        }
    }

    #[test]
    fn test_metadata_attached_only_at_its_position() {
        let mut payload = Compound::new();
        payload.insert("id", "Chest");
        let g = SourceGrid::new(
            Dimensions::new(2, 2, 2),
            vec![54; 8],
            vec![AuxRecord {
                pos: IVec3::new(1, 0, 1),
                payload: payload.clone(),
            }],
        )
        .expect("valid grid");
        let mut palette = BlockPalette::full_range("minecraft");
        let mut metadata = MetadataIndex::build(g.aux_records().to_vec());
        let blocks = convert_blocks(&g, &mut palette, &mut metadata, &NoProgress);

        let with_nbt: Vec<_> = blocks.iter().filter(|b| b.nbt.is_some()).collect();
        assert_eq!(with_nbt.len(), 1);
        assert_eq!(with_nbt[0].pos, IVec3::new(1, 0, 1));
        assert_eq!(with_nbt[0].nbt.as_ref(), Some(&payload));
        assert!(metadata.is_empty());
    }

    #[test]
    fn test_metadata_outside_grid_is_left_behind() {
        let g = grid((1, 1, 1), vec![0]);
        let mut palette = BlockPalette::full_range("minecraft");
        let mut metadata = MetadataIndex::new();
        metadata.insert(IVec3::new(5, 5, 5), Compound::new());
        let blocks = convert_blocks(&g, &mut palette, &mut metadata, &NoProgress);
        assert!(blocks[0].nbt.is_none());
        assert_eq!(metadata.len(), 1);
    }

    #[test]
    fn test_progress_ticks_once_per_voxel() {
        let g = grid((4, 3, 2), vec![1; 24]);
        let mut palette = BlockPalette::full_range("minecraft");
        let counter = AtomicU64::new(0);
        convert_blocks(&g, &mut palette, &mut MetadataIndex::new(), &counter);
        assert_eq!(counter.load(Ordering::Relaxed), 24);
    }

    #[test]
    fn test_empty_grid() {
        let g = grid((0, 5, 5), Vec::new());
        let (_, blocks) = run(&g, PaletteStrategy::FullRange);
        assert!(blocks.is_empty());
    }
}
