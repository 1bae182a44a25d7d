//! One-call façade: sweep, quantize, export
//!
//! `StudMapAnalyser` owns a validated [`GridConfig`] and the [`SurfaceProbe`] to sweep
//! with. Each call to [`StudMapAnalyser::compute`] runs the full pipeline and hands back
//! a fresh [`HeightMap`]; nothing is cached between runs.

use crate::debug_volume::{DebugRenderer, SamplingVolume};
use crate::error::StudMapError;
use crate::export::ExportError;
use crate::grid::{GridConfig, GridSampler, HeightMap, HeightQuantizer, SampledGrid};
use crate::probe::SurfaceProbe;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Stud-map generator for one sampling area
pub struct StudMapAnalyser<P> {
    config: GridConfig,
    probe: P,
}

impl<P: SurfaceProbe> StudMapAnalyser<P> {
    /// Create an analyser
    ///
    /// # Errors
    /// Returns [`StudMapError::InvalidConfiguration`] if `config` is malformed
    pub fn new(config: GridConfig, probe: P) -> Result<Self, StudMapError> {
        config.validate()?;
        Ok(Self { config, probe })
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Sweep the grid and quantize it
    ///
    /// # Errors
    /// Returns [`StudMapError::QueryFailure`] if any probe fails
    pub fn compute(&self) -> Result<HeightMap, StudMapError> {
        let sampled = GridSampler::new(&self.config, &self.probe)?.sample()?;
        Ok(self.finish(&sampled))
    }

    /// Compute the map and write it to `<dir>/<name>.json`
    ///
    /// # Errors
    /// Returns [`ExportError::Compute`] if the sweep fails, or an I/O variant if the
    /// file cannot be written
    pub fn export(&self, dir: impl AsRef<Path>, name: &str) -> Result<PathBuf, ExportError> {
        let map = self.compute()?;
        map.export_to(dir, name)
    }

    /// Sampling volume for operator feedback
    pub fn sampling_volume(&self) -> SamplingVolume {
        SamplingVolume::from_config(&self.config)
    }

    pub fn draw_debug(&self, renderer: &mut impl DebugRenderer) {
        renderer.draw_volume(&self.sampling_volume());
    }

    fn finish(&self, sampled: &SampledGrid) -> HeightMap {
        if self.config.flatten_ground && sampled.hit_count() == 0 {
            warn!("Ground flattening requested but no probe hit a surface");
        }

        let quantizer = HeightQuantizer::for_sweep(&self.config, sampled);
        let map = HeightMap::new(&self.config, quantizer.quantize(&sampled.cells));

        info!(
            "Stud map {}x{} (scale {:.2}): {} bricks, tallest column {}",
            map.width,
            map.depth,
            map.scale,
            map.total_unit_count,
            map.max_units()
        );
        map
    }
}

impl<P: SurfaceProbe + Sync> StudMapAnalyser<P> {
    /// [`StudMapAnalyser::compute`] with the sweep spread over the rayon pool
    ///
    /// # Errors
    /// Returns [`StudMapError::QueryFailure`] if any probe fails
    pub fn compute_parallel(&self) -> Result<HeightMap, StudMapError> {
        let sampled = GridSampler::new(&self.config, &self.probe)?.sample_parallel()?;
        Ok(self.finish(&sampled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{SurfaceKind, Vec3};
    use crate::probe::{HeightField, HeightFieldScene, ProbeHit, ProbeResult, Structure};
    use approx::assert_relative_eq;

    #[derive(Default)]
    struct RecordingRenderer {
        volumes: Vec<SamplingVolume>,
    }

    impl DebugRenderer for RecordingRenderer {
        fn draw_volume(&mut self, volume: &SamplingVolume) {
            self.volumes.push(*volume);
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let probe = |_: Vec3, _: Vec3, _: f32| -> ProbeResult { Ok(None) };
        let config = GridConfig {
            max_height: 0.0,
            ..Default::default()
        };
        assert!(StudMapAnalyser::new(config, probe).is_err());
    }

    #[test]
    fn test_compute_two_cell_scenario() {
        let probe = |origin: Vec3, _: Vec3, _: f32| -> ProbeResult {
            Ok((origin.x < 0.0).then(|| ProbeHit::new(9.0, "Ground")))
        };
        let config = GridConfig {
            width: 2,
            depth: 1,
            scale: 1.0,
            max_height: 10.0,
            ..Default::default()
        };

        let map = StudMapAnalyser::new(config.clone(), probe).unwrap().compute().unwrap();
        assert_relative_eq!(map.cells[0].height, 1.2);
        assert_eq!(map.cells[1].height, 0.0);
        assert_eq!(map.total_unit_count, 1);

        let flattened = GridConfig {
            flatten_ground: true,
            ..config
        };
        let map = StudMapAnalyser::new(flattened, probe).unwrap().compute().unwrap();
        assert!(map.cells.iter().all(|c| c.height == 0.0));
        assert_eq!(map.total_unit_count, 0);
    }

    #[test]
    fn test_city_block_parallel_matches_sequential() {
        let scene = HeightFieldScene::new(HeightField::flat(20.0, 20.0, 1.0, 1.0))
            .with_structure(Structure::building(5.0, 5.0, 4.0, 4.0, 1.0, 6.0))
            .with_structure(Structure::building(14.0, 12.0, 3.0, 6.0, 1.0, 3.7));
        let config = GridConfig {
            width: 20,
            depth: 20,
            anchor: crate::grid::Anchor::at(Vec3::new(10.0, 12.0, 10.0)),
            max_height: 12.0,
            flatten_ground: true,
            ..Default::default()
        };

        let analyser = StudMapAnalyser::new(config, scene).unwrap();
        let map = analyser.compute().unwrap();
        assert_eq!(map, analyser.compute_parallel().unwrap());

        // Ground is the flattening reference, so only rooftops keep bricks
        assert!(map
            .cells
            .iter()
            .filter(|c| c.kind == SurfaceKind::Ground)
            .all(|c| c.units == 0));
        assert_eq!(map.cell(5, 5).map(|c| (c.kind, c.units)), Some((SurfaceKind::Building, 5)));
        assert_eq!(map.cell(14, 12).map(|c| c.units), Some(3));
    }

    #[test]
    fn test_draw_debug_emits_volume() {
        let probe = |_: Vec3, _: Vec3, _: f32| -> ProbeResult { Ok(None) };
        let analyser = StudMapAnalyser::new(GridConfig::with_size(3, 3), probe).unwrap();
        let mut renderer = RecordingRenderer::default();

        analyser.draw_debug(&mut renderer);
        assert_eq!(renderer.volumes, vec![analyser.sampling_volume()]);
    }
}
