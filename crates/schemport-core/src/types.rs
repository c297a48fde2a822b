use glam::IVec3;

/// Voxel position inside a grid. x runs along length, y along height,
/// z along width.
pub type BlockPos = IVec3;

/// Declared extent of a source grid, in the source's axis naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dimensions {
    /// Extent along x.
    pub length: u32,
    /// Extent along y.
    pub height: u32,
    /// Extent along z.
    pub width: u32,
}

impl Dimensions {
    pub fn new(length: u32, height: u32, width: u32) -> Self {
        Self {
            length,
            height,
            width,
        }
    }

    /// Total number of voxels, or None if the product does not fit in u64.
    pub fn voxel_count(&self) -> Option<u64> {
        (self.length as u64)
            .checked_mul(self.height as u64)?
            .checked_mul(self.width as u64)
    }

    /// Target-format size triple: (x, y, z) = (length, height, width).
    /// Extents above `i32::MAX` saturate.
    pub fn size(&self) -> [i32; 3] {
        let axis = |v: u32| i32::try_from(v).unwrap_or(i32::MAX);
        [axis(self.length), axis(self.height), axis(self.width)]
    }

    /// Whether `pos` lies inside the grid.
    pub fn contains(&self, pos: BlockPos) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && pos.z >= 0
            && (pos.x as u32) < self.length
            && (pos.y as u32) < self.height
            && (pos.z as u32) < self.width
    }

    /// Index into the flat block array: `y*width*length + z*length + x`.
    /// Returns None for positions outside the grid.
    pub fn linear_index(&self, pos: BlockPos) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        let length = self.length as usize;
        let width = self.width as usize;
        Some(pos.y as usize * width * length + pos.z as usize * length + pos.x as usize)
    }
}
