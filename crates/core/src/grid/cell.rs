//! Per-cell sample records

use crate::core_types::SurfaceKind;
use serde::{Deserialize, Serialize};

/// Cell as measured by the sampler, before quantization
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RawCell {
    /// Elevation of the hit surface above the bottom of the sampling volume (world units).
    /// Zero when the probe missed.
    pub height: f32,
    pub kind: SurfaceKind,
    /// Whether the probe struck anything
    pub hit: bool,
}

impl RawCell {
    /// Cell whose probe struck a surface
    pub fn hit(height: f32, kind: SurfaceKind) -> Self {
        Self {
            height,
            kind,
            hit: true,
        }
    }

    /// Cell whose probe found nothing
    pub fn miss() -> Self {
        Self::default()
    }
}

/// Quantized column: a whole number of bricks
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Cell {
    /// Column height in world units, always `units * unit`
    pub height: f32,
    pub kind: SurfaceKind,
    /// Number of bricks stacked in this column
    pub units: u32,
}
