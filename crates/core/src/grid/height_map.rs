//! Final stud map handed to the caller

use crate::core_types::SurfaceKind;
use crate::grid::cell::Cell;
use crate::grid::config::GridConfig;
use crate::grid::quantizer::{QuantizedGrid, BRICK_HEIGHT};
use serde::{Deserialize, Serialize};

/// Relative slack allowed between a stored height and its brick count
const HEIGHT_TOLERANCE: f32 = 1e-5;

/// Quantized height grid ready to be built from bricks
///
/// Cells are stored row-major with x as the outer axis: cell `(x, z)` lives at index
/// `x * depth + z`, the order in which they were sampled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightMap {
    /// Columns along X
    pub width: usize,
    /// Rows along Z
    pub depth: usize,
    /// World units per stud
    pub scale: f32,
    pub cells: Vec<Cell>,
    /// Sum of bricks over all cells
    pub total_unit_count: u64,
}

impl HeightMap {
    /// Assemble the map for `config` from quantized cells
    pub fn new(config: &GridConfig, quantized: QuantizedGrid) -> Self {
        debug_assert_eq!(quantized.cells.len(), config.cell_count());
        Self {
            width: config.width,
            depth: config.depth,
            scale: config.scale,
            cells: quantized.cells,
            total_unit_count: quantized.total_units,
        }
    }

    /// Brick height in world units
    #[inline]
    pub fn unit(&self) -> f32 {
        BRICK_HEIGHT * self.scale
    }

    #[inline]
    pub fn index(&self, x: usize, z: usize) -> usize {
        x * self.depth + z
    }

    #[inline]
    pub fn grid_position(&self, index: usize) -> (usize, usize) {
        (index / self.depth, index % self.depth)
    }

    /// Cell at grid position `(x, z)`, if inside the grid
    pub fn cell(&self, x: usize, z: usize) -> Option<&Cell> {
        if x < self.width && z < self.depth {
            self.cells.get(self.index(x, z))
        } else {
            None
        }
    }

    /// Iterate `(x, z, cell)` in storage order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Cell)> + '_ {
        self.cells.iter().enumerate().map(|(i, cell)| {
            let (x, z) = self.grid_position(i);
            (x, z, cell)
        })
    }

    /// Tallest column in bricks
    pub fn max_units(&self) -> u32 {
        self.cells.iter().map(|c| c.units).max().unwrap_or(0)
    }

    /// Number of cells classified as `kind`
    pub fn count_of(&self, kind: SurfaceKind) -> usize {
        self.cells.iter().filter(|c| c.kind == kind).count()
    }

    /// Bricks needed for the cells classified as `kind`
    pub fn units_of(&self, kind: SurfaceKind) -> u64 {
        self.cells
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| u64::from(c.units))
            .sum()
    }

    /// Whether the stored dimensions, cells and total agree with each other, and every
    /// cell's height is its brick count times [`HeightMap::unit`]
    pub fn is_consistent(&self) -> bool {
        let unit = self.unit();
        if !unit.is_finite() || unit <= 0.0 {
            return false;
        }

        self.width.checked_mul(self.depth) == Some(self.cells.len())
            && self.cells.iter().map(|c| u64::from(c.units)).sum::<u64>() == self.total_unit_count
            && self.cells.iter().all(|c| {
                let expected = c.units as f32 * unit;
                (c.height - expected).abs() <= HEIGHT_TOLERANCE * expected.max(1.0)
            })
    }
}
