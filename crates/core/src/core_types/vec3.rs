//! Vector and rotation aliases for world-space probe geometry.

use nalgebra::{UnitQuaternion, Vector3};

/// 3D vector type for world positions and probe directions.
///
/// This is a simple alias for `nalgebra::Vector3<f32>`. The world is Y-up: sample
/// rows lie in the XZ plane and probes travel along `-Y`.
pub type Vec3 = Vector3<f32>;

/// Orientation of the sampling anchor.
pub type Rotation = UnitQuaternion<f32>;

/// Straight down in world space.
#[inline]
pub fn down() -> Vec3 {
    -Vec3::y()
}
