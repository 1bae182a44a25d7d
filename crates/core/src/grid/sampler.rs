//! Vertical probe sweep over the configured grid
//!
//! One downward probe per cell, fired from the cell centre at anchor height. A hit at
//! distance `d` gives a raw height of `max_height - d`, i.e. the elevation of the
//! surface above the bottom of the sampling volume.
//!
//! The sweep also reports the lowest surface that was hit. Cells whose probe missed do
//! not take part in that minimum; it starts at `max_height` and only hits can lower it.

use crate::core_types::down;
use crate::error::StudMapError;
use crate::grid::cell::RawCell;
use crate::grid::config::GridConfig;
use crate::probe::{ProbeError, SurfaceProbe};
use rayon::prelude::*;
use tracing::debug;

/// Output of a sweep: one raw cell per grid position plus the lowest hit height
#[derive(Debug, Clone, PartialEq)]
pub struct SampledGrid {
    /// Cells in row-major order (x outer, z inner)
    pub cells: Vec<RawCell>,
    /// Lowest hit height, or `max_height` if nothing lower was hit
    pub min_height: f32,
}

impl SampledGrid {
    /// Number of probes that struck a surface
    pub fn hit_count(&self) -> usize {
        self.cells.iter().filter(|c| c.hit).count()
    }
}

/// Sweeps a validated [`GridConfig`] with a [`SurfaceProbe`]
pub struct GridSampler<'a, P: SurfaceProbe + ?Sized> {
    config: &'a GridConfig,
    probe: &'a P,
}

impl<'a, P: SurfaceProbe + ?Sized> GridSampler<'a, P> {
    /// Create a sampler, validating the configuration first
    ///
    /// # Errors
    /// Returns [`StudMapError::InvalidConfiguration`] if the config is malformed.
    /// No probe is issued in that case.
    pub fn new(config: &'a GridConfig, probe: &'a P) -> Result<Self, StudMapError> {
        config.validate()?;
        Ok(Self { config, probe })
    }

    /// Probe every cell in order, issuing exactly `width * depth` queries
    ///
    /// # Errors
    /// Returns [`StudMapError::QueryFailure`] for the first cell whose probe fails.
    /// No partial grid is returned.
    pub fn sample(&self) -> Result<SampledGrid, StudMapError> {
        let mut cells = Vec::with_capacity(self.config.cell_count());
        let mut min_height = self.config.max_height;

        for (x, z) in self.config.grid_positions() {
            let cell = self.sample_cell(x, z)?;
            if cell.hit && cell.height < min_height {
                min_height = cell.height;
            }
            cells.push(cell);
        }

        let sampled = SampledGrid { cells, min_height };
        self.log_summary(&sampled);
        Ok(sampled)
    }

    /// Probe a single cell
    ///
    /// # Errors
    /// Returns [`StudMapError::QueryFailure`] if the probe errors or reports a distance
    /// outside `[0, max_height]`
    pub fn sample_cell(&self, x: usize, z: usize) -> Result<RawCell, StudMapError> {
        let origin = self.config.probe_origin(x, z);
        let max_distance = self.config.max_height;

        let hit = self
            .probe
            .probe(origin, down(), max_distance)
            .and_then(|hit| match hit {
                Some(hit) if !(0.0..=max_distance).contains(&hit.distance) => {
                    Err(ProbeError::DistanceOutOfRange {
                        distance: hit.distance,
                        max_distance,
                    })
                }
                other => Ok(other),
            })
            .map_err(|source| StudMapError::QueryFailure { x, z, source })?;

        Ok(match hit {
            Some(hit) => RawCell::hit(
                max_distance - hit.distance,
                self.config.classifier.classify(&hit.tag),
            ),
            None => RawCell::miss(),
        })
    }

    fn log_summary(&self, sampled: &SampledGrid) {
        debug!(
            "Sampled {}x{} grid: {} hits / {} probes, min height {:.3}",
            self.config.width,
            self.config.depth,
            sampled.hit_count(),
            sampled.cells.len(),
            sampled.min_height
        );
    }
}

impl<P: SurfaceProbe + Sync + ?Sized> GridSampler<'_, P> {
    /// Same sweep as [`GridSampler::sample`], spread over the rayon thread pool.
    ///
    /// Output order and the minimum are identical to the sequential sweep. If several
    /// probes fail, which failure is reported is unspecified.
    ///
    /// # Errors
    /// Returns [`StudMapError::QueryFailure`] if any probe fails
    pub fn sample_parallel(&self) -> Result<SampledGrid, StudMapError> {
        let cells = (0..self.config.cell_count())
            .into_par_iter()
            .map(|index| {
                let (x, z) = self.config.grid_position(index);
                self.sample_cell(x, z)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let min_height = cells
            .par_iter()
            .filter(|c| c.hit)
            .map(|c| c.height)
            .reduce(|| self.config.max_height, f32::min);

        let sampled = SampledGrid { cells, min_height };
        self.log_summary(&sampled);
        Ok(sampled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{SurfaceKind, Vec3};
    use crate::probe::{ProbeHit, ProbeResult};
    use approx::assert_relative_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn two_by_one() -> GridConfig {
        GridConfig {
            width: 2,
            depth: 1,
            scale: 1.0,
            max_height: 10.0,
            ..Default::default()
        }
    }

    /// Hits at distance 9 for x = 0, misses elsewhere
    fn first_column_probe(origin: Vec3, _dir: Vec3, _max: f32) -> ProbeResult {
        Ok((origin.x < 0.0).then(|| ProbeHit::new(9.0, "Ground")))
    }

    #[test]
    fn test_hit_and_miss() {
        let config = two_by_one();
        let sampled = GridSampler::new(&config, &first_column_probe)
            .unwrap()
            .sample()
            .unwrap();

        assert_eq!(sampled.cells.len(), 2);
        assert_relative_eq!(sampled.cells[0].height, 1.0);
        assert_eq!(sampled.cells[0].kind, SurfaceKind::Ground);
        assert_eq!(sampled.cells[1], RawCell::miss());
        assert_relative_eq!(sampled.min_height, 1.0);
        assert_eq!(sampled.hit_count(), 1);
    }

    #[test]
    fn test_misses_do_not_lower_minimum() {
        let config = two_by_one();
        let never = |_: Vec3, _: Vec3, _: f32| -> ProbeResult { Ok(None) };
        let sampled = GridSampler::new(&config, &never).unwrap().sample().unwrap();

        assert!(sampled.cells.iter().all(|c| c.height == 0.0));
        assert_eq!(sampled.min_height, config.max_height);
    }

    #[test]
    fn test_issues_one_probe_per_cell() {
        let config = GridConfig::with_size(7, 5);
        let calls = AtomicUsize::new(0);
        let counting = |_: Vec3, dir: Vec3, max: f32| -> ProbeResult {
            calls.fetch_add(1, Ordering::Relaxed);
            assert_eq!(dir, down());
            assert_eq!(max, 10.0);
            Ok(None)
        };

        let sampled = GridSampler::new(&config, &counting).unwrap().sample().unwrap();
        assert_eq!(sampled.cells.len(), 35);
        assert_eq!(calls.load(Ordering::Relaxed), 35);
    }

    #[test]
    fn test_invalid_config_issues_no_probes() {
        let config = GridConfig::with_size(0, 5);
        let calls = AtomicUsize::new(0);
        let counting = |_: Vec3, _: Vec3, _: f32| -> ProbeResult {
            calls.fetch_add(1, Ordering::Relaxed);
            Ok(None)
        };

        let result = GridSampler::new(&config, &counting);
        assert!(matches!(
            result,
            Err(StudMapError::InvalidConfiguration { parameter: "width", .. })
        ));
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_probe_failure_names_cell() {
        let config = GridConfig::with_size(3, 3);
        let failing = |origin: Vec3, _: Vec3, _: f32| -> ProbeResult {
            if origin.x > 0.0 && origin.z < 0.0 {
                Err(ProbeError::Unavailable("engine not ready".to_string()))
            } else {
                Ok(None)
            }
        };

        let err = GridSampler::new(&config, &failing).unwrap().sample().unwrap_err();
        assert_eq!(
            err,
            StudMapError::QueryFailure {
                x: 2,
                z: 0,
                source: ProbeError::Unavailable("engine not ready".to_string()),
            }
        );
    }

    #[test]
    fn test_out_of_range_distance_is_a_query_failure() {
        let config = two_by_one();
        let too_far = |_: Vec3, _: Vec3, _: f32| -> ProbeResult {
            Ok(Some(ProbeHit::new(12.0, "Ground")))
        };
        let err = GridSampler::new(&config, &too_far).unwrap().sample().unwrap_err();
        assert!(matches!(
            err,
            StudMapError::QueryFailure {
                x: 0,
                z: 0,
                source: ProbeError::DistanceOutOfRange { .. }
            }
        ));

        let nan = |_: Vec3, _: Vec3, _: f32| -> ProbeResult { Ok(Some(ProbeHit::new(f32::NAN, ""))) };
        assert!(GridSampler::new(&config, &nan).unwrap().sample().is_err());
    }

    #[test]
    fn test_unknown_tag_is_default_kind() {
        let config = two_by_one();
        let tree = |_: Vec3, _: Vec3, _: f32| -> ProbeResult { Ok(Some(ProbeHit::new(4.0, "Tree"))) };
        let sampled = GridSampler::new(&config, &tree).unwrap().sample().unwrap();
        assert!(sampled.cells.iter().all(|c| c.hit && c.kind == SurfaceKind::Default));
        assert_relative_eq!(sampled.min_height, 6.0);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let config = GridConfig::with_size(13, 9);
        let ramp = |origin: Vec3, _: Vec3, _: f32| -> ProbeResult {
            let distance = (origin.x + origin.z).rem_euclid(7.0) + 1.0;
            let tag = if distance > 4.0 { "Ground" } else { "Building" };
            Ok((origin.x.abs() > 1.0).then(|| ProbeHit::new(distance, tag)))
        };

        let sampler = GridSampler::new(&config, &ramp).unwrap();
        let sequential = sampler.sample().unwrap();
        let parallel = sampler.sample_parallel().unwrap();
        assert_eq!(sequential, parallel);
    }
}
