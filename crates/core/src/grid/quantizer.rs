//! Brick quantization of sampled heights
//!
//! Two passes per cell:
//! 1. **Flatten** (optional): heights below the lowest hit collapse to zero, everything
//!    else is rebased on it.
//! 2. **Snap**: `k = round(height / unit)` bricks, stored back as `k * unit`.
//!
//! An exact half brick rounds to the even brick count (`f32::round_ties_even`), so 0.5
//! bricks snaps to 0 and 2.5 bricks snaps to 2.

use crate::grid::cell::{Cell, RawCell};
use crate::grid::config::GridConfig;
use crate::grid::sampler::SampledGrid;

/// Height of one brick relative to its stud pitch (a standard brick is 1.2 studs tall)
pub const BRICK_HEIGHT: f32 = 1.2;

/// Quantized cells and the total number of bricks across the grid
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizedGrid {
    pub cells: Vec<Cell>,
    pub total_units: u64,
}

/// Snaps raw heights to whole bricks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightQuantizer {
    /// Brick height in world units
    pub unit: f32,
    /// Flattening reference (lowest hit surface)
    pub min_height: f32,
    pub flatten_ground: bool,
}

impl HeightQuantizer {
    pub fn new(unit: f32, min_height: f32, flatten_ground: bool) -> Self {
        Self {
            unit,
            min_height,
            flatten_ground,
        }
    }

    /// Quantizer for the output of a sweep over `config`
    pub fn for_sweep(config: &GridConfig, sampled: &SampledGrid) -> Self {
        Self::new(config.unit(), sampled.min_height, config.flatten_ground)
    }

    /// Flatten pass for one height (identity when flattening is off)
    #[inline]
    pub fn flatten(&self, height: f32) -> f32 {
        if self.flatten_ground {
            if height < self.min_height {
                0.0
            } else {
                height - self.min_height
            }
        } else {
            height
        }
    }

    /// Snap pass for one height: returns `(bricks, snapped height)`
    #[inline]
    pub fn snap(&self, height: f32) -> (u32, f32) {
        let units = (height / self.unit).round_ties_even().max(0.0) as u32;
        (units, units as f32 * self.unit)
    }

    /// Both passes for one cell
    pub fn quantize_cell(&self, cell: &RawCell) -> Cell {
        let (units, height) = self.snap(self.flatten(cell.height));
        Cell {
            height,
            kind: cell.kind,
            units,
        }
    }

    /// Quantize every cell of a sweep, in order, accumulating the brick count
    pub fn quantize(&self, cells: &[RawCell]) -> QuantizedGrid {
        self.quantize_iter(cells.iter().copied())
    }

    /// Run both passes again over already quantized cells
    pub fn requantize(&self, cells: &[Cell]) -> QuantizedGrid {
        self.quantize_iter(cells.iter().map(|c| RawCell {
            height: c.height,
            kind: c.kind,
            hit: true,
        }))
    }

    fn quantize_iter(&self, cells: impl Iterator<Item = RawCell>) -> QuantizedGrid {
        let mut total_units = 0u64;
        let cells = cells
            .map(|raw| {
                let cell = self.quantize_cell(&raw);
                total_units += u64::from(cell.units);
                cell
            })
            .collect();

        QuantizedGrid { cells, total_units }
    }
}
