//! Operator feedback: the box swept by the probes
//!
//! Nothing here touches sampled data. Engines implement [`DebugRenderer`] to draw the
//! volume (typically as a translucent red cube) so the operator can line the grid up
//! with the scene before exporting.

use crate::core_types::{Rotation, Vec3};
use crate::grid::GridConfig;

/// Translucent red
pub const VOLUME_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 0.5];

/// Oriented box covering every probe of a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingVolume {
    /// Box centre, half the probe length below the anchor
    pub center: Vec3,
    /// Full extents along the box's local axes
    pub size: Vec3,
    pub rotation: Rotation,
    /// RGBA
    pub color: [f32; 4],
}

impl SamplingVolume {
    pub fn from_config(config: &GridConfig) -> Self {
        Self {
            center: config.anchor.position - Vec3::new(0.0, config.max_height / 2.0, 0.0),
            size: Vec3::new(
                config.width as f32 * config.scale,
                config.max_height,
                config.depth as f32 * config.scale,
            ),
            rotation: config.anchor.rotation(),
            color: VOLUME_COLOR,
        }
    }

    /// The eight corners in world space, bottom face first
    pub fn corners(&self) -> [Vec3; 8] {
        let h = self.size / 2.0;
        let local = [
            Vec3::new(-h.x, -h.y, -h.z),
            Vec3::new(h.x, -h.y, -h.z),
            Vec3::new(h.x, -h.y, h.z),
            Vec3::new(-h.x, -h.y, h.z),
            Vec3::new(-h.x, h.y, -h.z),
            Vec3::new(h.x, h.y, -h.z),
            Vec3::new(h.x, h.y, h.z),
            Vec3::new(-h.x, h.y, h.z),
        ];
        local.map(|p| self.center + self.rotation * p)
    }

    /// Whether a world-space point lies inside (or on) the box
    pub fn contains(&self, point: Vec3) -> bool {
        let local = self.rotation.inverse() * (point - self.center);
        let h = self.size / 2.0;
        let eps = 1e-4;
        local.x.abs() <= h.x + eps && local.y.abs() <= h.y + eps && local.z.abs() <= h.z + eps
    }
}

/// Receiver for debug geometry
pub trait DebugRenderer {
    fn draw_volume(&mut self, volume: &SamplingVolume);
}
