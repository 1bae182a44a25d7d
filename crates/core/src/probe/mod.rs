//! Intersection queries against the scene being sampled
//!
//! The sampler only needs to ask one question of the 3D world: "travelling from here in
//! this direction for at most this far, what do I hit first?". [`SurfaceProbe`] is that
//! question. Engine integrations implement it over their physics raycast; tests and the
//! headless demo use [`HeightFieldScene`].

pub mod classify;
pub mod scene;

pub use classify::TagClassifier;
pub use scene::{HeightField, HeightFieldScene, Structure};

use crate::core_types::Vec3;
use std::fmt;

/// First surface struck by a probe
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeHit {
    /// Distance from the probe origin to the surface (world units)
    pub distance: f32,
    /// Tag of the object that was hit, fed to the [`TagClassifier`]
    pub tag: String,
}

impl ProbeHit {
    pub fn new(distance: f32, tag: impl Into<String>) -> Self {
        Self {
            distance,
            tag: tag.into(),
        }
    }
}

/// Failure reported by (or about) an intersection query
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeError {
    /// The query engine could not answer (not loaded, shut down, ...)
    Unavailable(String),
    /// The engine only answers probes along some directions
    UnsupportedDirection(Vec3),
    /// A hit was reported outside `[0, max_distance]` or as a non-finite value
    DistanceOutOfRange {
        /// Reported distance
        distance: f32,
        /// Probe length that was requested
        max_distance: f32,
    },
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::Unavailable(msg) => write!(f, "Intersection query unavailable: {msg}"),
            ProbeError::UnsupportedDirection(dir) => write!(
                f,
                "Unsupported probe direction ({:.3}, {:.3}, {:.3})",
                dir.x, dir.y, dir.z
            ),
            ProbeError::DistanceOutOfRange {
                distance,
                max_distance,
            } => write!(
                f,
                "Hit distance {distance} outside probe range [0, {max_distance}]"
            ),
        }
    }
}

impl std::error::Error for ProbeError {}

/// Answer to a single probe: `Ok(None)` for a miss
pub type ProbeResult = Result<Option<ProbeHit>, ProbeError>;

/// Capability to cast a ray into the scene and report the first hit.
///
/// Returning `Ok(None)` means the ray travelled `max_distance` without touching anything.
/// That is a valid answer, not an error.
pub trait SurfaceProbe {
    /// Cast a ray from `origin` along `direction` for at most `max_distance`
    ///
    /// # Errors
    /// Returns [`ProbeError`] if the query itself could not be carried out
    fn probe(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> ProbeResult;
}

impl<F> SurfaceProbe for F
where
    F: Fn(Vec3, Vec3, f32) -> ProbeResult,
{
    fn probe(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> ProbeResult {
        self(origin, direction, max_distance)
    }
}
