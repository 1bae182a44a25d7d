//! Synthetic scene built from a terrain height field and box-shaped structures
//!
//! Stands in for a live 3D engine: terrain is a regular elevation grid with bilinear
//! interpolation, buildings are axis-aligned boxes. Only vertical (downward) probes are
//! answered, which is all the grid sampler ever issues.

use super::{ProbeError, ProbeHit, ProbeResult, SurfaceProbe};
use crate::core_types::{SurfaceKind, Vec3};
use serde::{Deserialize, Serialize};

/// Tolerance on the probe direction before it is considered non-vertical
const VERTICAL_TOLERANCE: f32 = 1e-4;

/// Regular elevation grid covering a rectangle of the XZ plane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeightField {
    /// World X of the first sample
    pub(crate) origin_x: f32,
    /// World Z of the first sample
    pub(crate) origin_z: f32,
    /// Extent along X in world units
    pub(crate) width: f32,
    /// Extent along Z in world units
    pub(crate) depth: f32,
    /// Spacing between samples along X in world units
    pub(crate) resolution_x: f32,
    /// Spacing between samples along Z in world units
    pub(crate) resolution_z: f32,
    /// Number of samples in X direction
    pub(crate) nx: usize,
    /// Number of samples in Z direction
    pub(crate) nz: usize,
    /// Elevations (row-major order: [z * nx + x])
    pub(crate) elevations: Vec<f32>,
    /// Minimum elevation in dataset
    pub(crate) min_elevation: f32,
    /// Maximum elevation in dataset
    pub(crate) max_elevation: f32,
}

impl HeightField {
    /// Create flat terrain at the given elevation, starting at world `(0, 0)`
    pub fn flat(width: f32, depth: f32, resolution: f32, elevation: f32) -> Self {
        let nx = (width / resolution).ceil() as usize + 1;
        let nz = (depth / resolution).ceil() as usize + 1;

        HeightField {
            origin_x: 0.0,
            origin_z: 0.0,
            width,
            depth,
            resolution_x: resolution,
            resolution_z: resolution,
            nx,
            nz,
            elevations: vec![elevation; nx * nz],
            min_elevation: elevation,
            max_elevation: elevation,
        }
    }

    /// Create terrain from a heightmap array
    ///
    /// # Arguments
    /// * `width` - Extent along X in world units
    /// * `depth` - Extent along Z in world units
    /// * `heightmap` - Samples in row-major order `[z * nx + x]`
    /// * `nx` - Number of samples in X direction (at least 2)
    /// * `nz` - Number of samples in Z direction (at least 2)
    /// * `elevation_scale` - Multiplier for heightmap values
    /// * `base_elevation` - Base elevation added to all heights
    pub fn from_heightmap(
        width: f32,
        depth: f32,
        heightmap: &[f32],
        nx: usize,
        nz: usize,
        elevation_scale: f32,
        base_elevation: f32,
    ) -> Self {
        assert!(nx >= 2 && nz >= 2, "Heightmap needs at least 2x2 samples");
        assert_eq!(heightmap.len(), nx * nz, "Heightmap size mismatch");

        let resolution_x = width / (nx - 1) as f32;
        let resolution_z = depth / (nz - 1) as f32;

        let mut min_elev = f32::MAX;
        let mut max_elev = f32::MIN;

        let elevations: Vec<f32> = heightmap
            .iter()
            .map(|&h| {
                let elev = base_elevation + h * elevation_scale;
                min_elev = min_elev.min(elev);
                max_elev = max_elev.max(elev);
                elev
            })
            .collect();

        HeightField {
            origin_x: 0.0,
            origin_z: 0.0,
            width,
            depth,
            resolution_x,
            resolution_z,
            nx,
            nz,
            elevations,
            min_elevation: min_elev,
            max_elevation: max_elev,
        }
    }

    /// Move the field so its first sample sits at world `(x, z)`
    pub fn with_origin(mut self, x: f32, z: f32) -> Self {
        self.origin_x = x;
        self.origin_z = z;
        self
    }

    /// Whether world position `(x, z)` lies over the field
    pub fn contains(&self, x: f32, z: f32) -> bool {
        let lx = x - self.origin_x;
        let lz = z - self.origin_z;
        (0.0..=self.width).contains(&lx) && (0.0..=self.depth).contains(&lz)
    }

    /// Query elevation at world position `(x, z)` using bilinear interpolation.
    /// Positions outside the field are clamped to its edge.
    pub fn elevation_at(&self, x: f32, z: f32) -> f32 {
        let lx = (x - self.origin_x).clamp(0.0, self.width);
        let lz = (z - self.origin_z).clamp(0.0, self.depth);

        let gx = lx / self.resolution_x;
        let gz = lz / self.resolution_z;

        let ix0 = (gx.floor() as usize).min(self.nx - 2);
        let iz0 = (gz.floor() as usize).min(self.nz - 2);
        let ix1 = ix0 + 1;
        let iz1 = iz0 + 1;

        let fx = (gx - ix0 as f32).clamp(0.0, 1.0);
        let fz = (gz - iz0 as f32).clamp(0.0, 1.0);

        let e00 = self.elevations[iz0 * self.nx + ix0];
        let e10 = self.elevations[iz0 * self.nx + ix1];
        let e01 = self.elevations[iz1 * self.nx + ix0];
        let e11 = self.elevations[iz1 * self.nx + ix1];

        let e0 = e00 * (1.0 - fx) + e10 * fx;
        let e1 = e01 * (1.0 - fx) + e11 * fx;
        e0 * (1.0 - fz) + e1 * fz
    }

    pub fn min_elevation(&self) -> f32 {
        self.min_elevation
    }

    pub fn max_elevation(&self) -> f32 {
        self.max_elevation
    }
}

/// Axis-aligned box obstacle (a building, a wall, a bridge deck, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub min: Vec3,
    pub max: Vec3,
    pub tag: String,
}

impl Structure {
    /// Box spanning the two corners, in any order
    pub fn new(a: Vec3, b: Vec3, tag: impl Into<String>) -> Self {
        Self {
            min: a.inf(&b),
            max: a.sup(&b),
            tag: tag.into(),
        }
    }

    /// Building standing on `base_y` with the given footprint centre and size
    pub fn building(
        center_x: f32,
        center_z: f32,
        size_x: f32,
        size_z: f32,
        base_y: f32,
        height: f32,
    ) -> Self {
        Self::new(
            Vec3::new(center_x - size_x / 2.0, base_y, center_z - size_z / 2.0),
            Vec3::new(center_x + size_x / 2.0, base_y + height, center_z + size_z / 2.0),
            SurfaceKind::Building.name(),
        )
    }

    fn covers(&self, x: f32, z: f32) -> bool {
        (self.min.x..=self.max.x).contains(&x) && (self.min.z..=self.max.z).contains(&z)
    }
}

/// Terrain plus structures, answering downward probes with the highest surface below
/// the probe origin.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeightFieldScene {
    terrain: Option<HeightField>,
    terrain_tag: String,
    structures: Vec<Structure>,
}

impl HeightFieldScene {
    /// Scene with nothing in it; every probe misses
    pub fn empty() -> Self {
        Self::default()
    }

    /// Scene over the given terrain, tagged `"Ground"`
    pub fn new(terrain: HeightField) -> Self {
        Self {
            terrain: Some(terrain),
            terrain_tag: SurfaceKind::Ground.name().to_string(),
            structures: Vec::new(),
        }
    }

    /// Replace the tag reported for terrain hits
    pub fn with_terrain_tag(mut self, tag: impl Into<String>) -> Self {
        self.terrain_tag = tag.into();
        self
    }

    pub fn with_structure(mut self, structure: Structure) -> Self {
        self.structures.push(structure);
        self
    }

    pub fn add_structure(&mut self, structure: Structure) {
        self.structures.push(structure);
    }

    pub fn structures(&self) -> &[Structure] {
        &self.structures
    }

    pub fn terrain(&self) -> Option<&HeightField> {
        self.terrain.as_ref()
    }

    /// Highest surface at `(x, z)` that is not above `ceiling`, with its tag
    pub fn surface_below(&self, x: f32, z: f32, ceiling: f32) -> Option<(f32, &str)> {
        let terrain = self
            .terrain
            .as_ref()
            .filter(|t| t.contains(x, z))
            .map(|t| (t.elevation_at(x, z), self.terrain_tag.as_str()));

        let roofs = self
            .structures
            .iter()
            .filter(|s| s.covers(x, z))
            .map(|s| (s.max.y, s.tag.as_str()));

        terrain
            .into_iter()
            .chain(roofs)
            .filter(|(y, _)| *y <= ceiling)
            .max_by(|a, b| a.0.total_cmp(&b.0))
    }
}

impl SurfaceProbe for HeightFieldScene {
    fn probe(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> ProbeResult {
        let dir = direction.try_normalize(f32::EPSILON);
        let vertical = dir.is_some_and(|d| (d.y + 1.0).abs() <= VERTICAL_TOLERANCE);
        if !vertical {
            return Err(ProbeError::UnsupportedDirection(direction));
        }

        Ok(self
            .surface_below(origin.x, origin.z, origin.y)
            .map(|(y, tag)| (origin.y - y, tag))
            .filter(|(distance, _)| *distance <= max_distance)
            .map(|(distance, tag)| ProbeHit::new(distance, tag)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::down;
    use approx::assert_relative_eq;

    #[test]
    fn test_flat_terrain() {
        let terrain = HeightField::flat(100.0, 100.0, 5.0, 50.0);

        assert_eq!(terrain.elevation_at(25.0, 25.0), 50.0);
        assert_eq!(terrain.elevation_at(75.0, 75.0), 50.0);
        assert_eq!(terrain.min_elevation(), 50.0);
        assert_eq!(terrain.max_elevation(), 50.0);
    }

    #[test]
    fn test_from_heightmap() {
        // 3x3 with a peak in the centre
        let heightmap = [0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0];
        let terrain = HeightField::from_heightmap(100.0, 100.0, &heightmap, 3, 3, 50.0, 10.0);

        assert_eq!(terrain.min_elevation(), 10.0);
        assert_eq!(terrain.max_elevation(), 60.0);
        assert_relative_eq!(terrain.elevation_at(50.0, 50.0), 60.0, epsilon = 1e-4);
        assert_relative_eq!(terrain.elevation_at(25.0, 50.0), 35.0, epsilon = 1e-4);
    }

    #[test]
    fn test_from_heightmap_with_unequal_extents() {
        // Ramp rising along Z over a field four times deeper than wide
        let heightmap = [0.0, 0.0, 1.0, 1.0];
        let terrain = HeightField::from_heightmap(10.0, 40.0, &heightmap, 2, 2, 1.0, 0.0);

        assert_relative_eq!(terrain.elevation_at(5.0, 0.0), 0.0, epsilon = 1e-6);
        assert_relative_eq!(terrain.elevation_at(5.0, 10.0), 0.25, epsilon = 1e-6);
        assert_relative_eq!(terrain.elevation_at(5.0, 20.0), 0.5, epsilon = 1e-6);
        assert_relative_eq!(terrain.elevation_at(5.0, 40.0), 1.0, epsilon = 1e-6);

        // Ramp along X over a field wider than deep
        let heightmap = [0.0, 1.0, 0.0, 1.0];
        let terrain = HeightField::from_heightmap(40.0, 10.0, &heightmap, 2, 2, 1.0, 0.0);
        assert_relative_eq!(terrain.elevation_at(20.0, 5.0), 0.5, epsilon = 1e-6);
        assert_relative_eq!(terrain.elevation_at(40.0, 10.0), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_offset_origin() {
        let terrain = HeightField::flat(10.0, 10.0, 1.0, 2.0).with_origin(-5.0, -5.0);
        assert!(terrain.contains(0.0, 0.0));
        assert!(terrain.contains(-5.0, 5.0));
        assert!(!terrain.contains(5.5, 0.0));
    }

    #[test]
    fn test_probe_hits_terrain() {
        let scene = HeightFieldScene::new(HeightField::flat(10.0, 10.0, 1.0, 2.0));
        let hit = scene.probe(Vec3::new(5.0, 10.0, 5.0), down(), 10.0).unwrap();
        let hit = hit.expect("terrain below probe");
        assert_relative_eq!(hit.distance, 8.0);
        assert_eq!(hit.tag, "Ground");
    }

    #[test]
    fn test_probe_prefers_roof() {
        let scene = HeightFieldScene::new(HeightField::flat(10.0, 10.0, 1.0, 0.0))
            .with_structure(Structure::building(5.0, 5.0, 2.0, 2.0, 0.0, 6.0));

        let on_roof = scene.probe(Vec3::new(5.0, 10.0, 5.0), down(), 10.0).unwrap().unwrap();
        assert_relative_eq!(on_roof.distance, 4.0);
        assert_eq!(on_roof.tag, "Building");

        let beside = scene.probe(Vec3::new(1.0, 10.0, 1.0), down(), 10.0).unwrap().unwrap();
        assert_relative_eq!(beside.distance, 10.0);
        assert_eq!(beside.tag, "Ground");
    }

    #[test]
    fn test_probe_misses_outside_and_beyond_range() {
        let scene = HeightFieldScene::new(HeightField::flat(10.0, 10.0, 1.0, 0.0));
        assert_eq!(scene.probe(Vec3::new(20.0, 10.0, 5.0), down(), 10.0), Ok(None));
        assert_eq!(scene.probe(Vec3::new(5.0, 10.0, 5.0), down(), 9.0), Ok(None));
        assert_eq!(HeightFieldScene::empty().probe(Vec3::zeros(), down(), 1.0), Ok(None));
    }

    #[test]
    fn test_probe_ignores_surfaces_above_origin() {
        let scene = HeightFieldScene::new(HeightField::flat(10.0, 10.0, 1.0, 0.0))
            .with_structure(Structure::building(5.0, 5.0, 2.0, 2.0, 0.0, 20.0));
        let hit = scene.probe(Vec3::new(5.0, 10.0, 5.0), down(), 10.0).unwrap().unwrap();
        assert_eq!(hit.tag, "Ground");
    }

    #[test]
    fn test_probe_rejects_sideways_direction() {
        let scene = HeightFieldScene::empty();
        let result = scene.probe(Vec3::zeros(), Vec3::x(), 1.0);
        assert!(matches!(result, Err(ProbeError::UnsupportedDirection(_))));
    }
}
