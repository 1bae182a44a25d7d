//! Sampling configuration and grid geometry

use crate::core_types::{Rotation, Vec3};
use crate::error::StudMapError;
use crate::grid::quantizer::BRICK_HEIGHT;
use crate::probe::TagClassifier;
use serde::{Deserialize, Serialize};

/// World-space placement of the sampled rectangle.
///
/// `position` is the centre of the top face of the sampling volume; probes start at
/// this height. `yaw` rotates the grid about the world up axis (radians), so rows stay
/// horizontal and probes stay vertical.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub position: Vec3,
    pub yaw: f32,
}

impl Anchor {
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self { position, yaw }
    }

    /// Anchor with no rotation
    pub fn at(position: Vec3) -> Self {
        Self::new(position, 0.0)
    }

    pub fn rotation(&self) -> Rotation {
        Rotation::from_axis_angle(&Vec3::y_axis(), self.yaw)
    }
}

impl Default for Anchor {
    fn default() -> Self {
        Self::at(Vec3::zeros())
    }
}

/// Configuration for one stud-map run
///
/// Immutable for the duration of a run. Call [`GridConfig::validate`] (the sampler and
/// analyser do this for you) before using the geometry helpers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of columns along the anchor's local X axis
    pub width: usize,
    /// Number of rows along the anchor's local Z axis
    pub depth: usize,
    /// World units per stud (cell edge length)
    pub scale: f32,
    /// Probe length; also the height of the sampling volume
    pub max_height: f32,
    pub anchor: Anchor,
    /// Rebase all heights on the lowest hit surface before quantizing
    pub flatten_ground: bool,
    /// Maps hit tags to surface kinds
    pub classifier: TagClassifier,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 100,
            depth: 100,
            scale: 1.0,
            max_height: 10.0,
            anchor: Anchor::default(),
            flatten_ground: false,
            classifier: TagClassifier::default(),
        }
    }
}

impl GridConfig {
    /// Config of the given size with every other field defaulted
    pub fn with_size(width: usize, depth: usize) -> Self {
        Self {
            width,
            depth,
            ..Default::default()
        }
    }

    /// Check dimensions, scale, height and anchor
    ///
    /// # Errors
    /// Returns [`StudMapError::InvalidConfiguration`] naming the first bad field
    pub fn validate(&self) -> Result<(), StudMapError> {
        if self.width == 0 {
            return Err(StudMapError::empty_dimension("width", self.width));
        }
        if self.depth == 0 {
            return Err(StudMapError::empty_dimension("depth", self.depth));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(StudMapError::non_positive("scale", self.scale));
        }
        if !self.max_height.is_finite() || self.max_height <= 0.0 {
            return Err(StudMapError::non_positive("max_height", self.max_height));
        }
        let extent = self.width.max(self.depth) as f32 * self.scale;
        if !extent.is_finite() || !self.unit().is_finite() {
            return Err(StudMapError::InvalidConfiguration {
                parameter: "scale",
                message: format!("gives an area or brick of infinite size, got {}", self.scale),
            });
        }
        if self.max_height / self.unit() >= u32::MAX as f32 {
            return Err(StudMapError::InvalidConfiguration {
                parameter: "max_height",
                message: format!(
                    "allows {} bricks per column, more than a u32 brick count holds",
                    self.max_height / self.unit()
                ),
            });
        }
        if self.width.checked_mul(self.depth).is_none() {
            return Err(StudMapError::InvalidConfiguration {
                parameter: "width",
                message: format!("width x depth overflows ({} x {})", self.width, self.depth),
            });
        }
        if !self.anchor.position.iter().all(|v| v.is_finite()) {
            return Err(StudMapError::non_finite("anchor.position"));
        }
        if !self.anchor.yaw.is_finite() {
            return Err(StudMapError::non_finite("anchor.yaw"));
        }
        Ok(())
    }

    /// Total number of cells (`width * depth`)
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width * self.depth
    }

    /// Flat index of grid position `(x, z)`; x is the outer axis
    #[inline]
    pub fn index(&self, x: usize, z: usize) -> usize {
        x * self.depth + z
    }

    /// Grid position `(x, z)` of a flat index
    #[inline]
    pub fn grid_position(&self, index: usize) -> (usize, usize) {
        (index / self.depth, index % self.depth)
    }

    /// All grid positions in sampling order (x outer, z inner)
    pub fn grid_positions(&self) -> impl Iterator<Item = (usize, usize)> {
        let depth = self.depth;
        (0..self.width).flat_map(move |x| (0..depth).map(move |z| (x, z)))
    }

    /// Height of one brick in world units
    #[inline]
    pub fn unit(&self) -> f32 {
        BRICK_HEIGHT * self.scale
    }

    /// World-space corner of the sampled rectangle (cell `(0, 0)`'s outer corner)
    pub fn sampling_origin(&self) -> Vec3 {
        let half_extent = Vec3::new(
            self.width as f32 * self.scale / 2.0,
            0.0,
            self.depth as f32 * self.scale / 2.0,
        );
        self.anchor.position - self.anchor.rotation() * half_extent
    }

    /// World-space start point of the probe for cell `(x, z)` (its centre, at anchor height)
    pub fn probe_origin(&self, x: usize, z: usize) -> Vec3 {
        let offset = Vec3::new(
            (x as f32 + 0.5) * self.scale,
            0.0,
            (z as f32 + 0.5) * self.scale,
        );
        self.sampling_origin() + self.anchor.rotation() * offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_config_is_valid() {
        let config = GridConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cell_count(), 10_000);
        assert_relative_eq!(config.unit(), 1.2);
    }

    #[test]
    fn test_rejects_bad_values() {
        let cases = [
            (GridConfig::with_size(0, 4), "width"),
            (GridConfig::with_size(4, 0), "depth"),
            (GridConfig { scale: 0.0, ..Default::default() }, "scale"),
            (GridConfig { scale: f32::NAN, ..Default::default() }, "scale"),
            (GridConfig { max_height: -1.0, ..Default::default() }, "max_height"),
            (GridConfig { max_height: f32::INFINITY, ..Default::default() }, "max_height"),
            (GridConfig { scale: f32::MAX, ..Default::default() }, "scale"),
            (
                GridConfig { anchor: Anchor::new(Vec3::zeros(), f32::NAN), ..Default::default() },
                "anchor.yaw",
            ),
        ];

        for (config, expected) in cases {
            match config.validate() {
                Err(StudMapError::InvalidConfiguration { parameter, .. }) => {
                    assert_eq!(parameter, expected);
                }
                other => panic!("expected InvalidConfiguration for {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_rejects_columns_taller_than_brick_count() {
        // 1e7 / 0.0012 is about 8.3e9 bricks, past u32::MAX
        let config = GridConfig {
            scale: 0.001,
            max_height: 1.0e7,
            ..Default::default()
        };
        match config.validate() {
            Err(StudMapError::InvalidConfiguration { parameter, .. }) => {
                assert_eq!(parameter, "max_height");
            }
            other => panic!("expected InvalidConfiguration, got {other:?}"),
        }

        let tall = GridConfig {
            max_height: 1.0e6,
            ..Default::default()
        };
        assert!(tall.validate().is_ok());
    }

    #[test]
    fn test_row_major_indexing() {
        let config = GridConfig::with_size(3, 2);
        assert_eq!(config.grid_position(4), (2, 0));
        assert_eq!(config.index(2, 0), 4);

        let order: Vec<_> = config.grid_positions().collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1)]);
        for (i, (x, z)) in order.into_iter().enumerate() {
            assert_eq!(config.index(x, z), i);
        }
    }

    #[test]
    fn test_probe_origins_centered_on_anchor() {
        let config = GridConfig {
            width: 4,
            depth: 2,
            scale: 2.0,
            anchor: Anchor::at(Vec3::new(10.0, 5.0, -3.0)),
            ..Default::default()
        };

        let origin = config.sampling_origin();
        assert_relative_eq!(origin, Vec3::new(6.0, 5.0, -5.0));

        assert_relative_eq!(config.probe_origin(0, 0), Vec3::new(7.0, 5.0, -4.0));
        assert_relative_eq!(config.probe_origin(3, 1), Vec3::new(13.0, 5.0, -2.0));
    }

    #[test]
    fn test_yaw_rotates_grid_about_anchor() {
        let config = GridConfig {
            width: 2,
            depth: 2,
            scale: 1.0,
            anchor: Anchor::new(Vec3::new(0.0, 3.0, 0.0), std::f32::consts::FRAC_PI_2),
            ..Default::default()
        };

        // Quarter turn about +Y maps local +X onto world -Z
        let p = config.probe_origin(1, 0);
        assert_relative_eq!(p, Vec3::new(-0.5, 3.0, -0.5), epsilon = 1e-5);
        for (x, z) in config.grid_positions() {
            assert_relative_eq!(config.probe_origin(x, z).y, 3.0, epsilon = 1e-6);
        }
    }
}
