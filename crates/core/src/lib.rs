//! Stud Map Core Library
//!
//! Turns the vertical silhouette of a 3D scene into a grid of column heights that can be
//! rebuilt from equal-height bricks. A rectangular area is swept with downward probes,
//! each hit is classified by the tag of the object it struck, and the resulting heights
//! are snapped to whole multiples of the brick height.
//!
//! ## Pipeline
//!
//! 1. [`GridSampler`] issues one vertical probe per cell through a [`SurfaceProbe`]
//!    and records raw heights plus the lowest surface that was hit.
//! 2. [`HeightQuantizer`] optionally flattens everything against that lowest surface and
//!    then rounds every column to a whole number of bricks.
//! 3. The [`HeightMap`] is returned to the caller, who may persist it as JSON with
//!    [`HeightMap::save`].
//!
//! [`StudMapAnalyser`] wraps the whole run behind a single call.

// Core types and utilities
pub mod core_types;

pub mod analyser;
pub mod debug_volume;
pub mod error;
pub mod export;
pub mod grid;
pub mod probe;

// Re-export core types
pub use core_types::{Rotation, SurfaceKind, Vec3};

pub use analyser::StudMapAnalyser;
pub use debug_volume::{DebugRenderer, SamplingVolume};
pub use error::StudMapError;
pub use export::ExportError;
pub use grid::{
    Anchor, Cell, GridConfig, GridSampler, HeightMap, HeightQuantizer, QuantizedGrid, RawCell,
    SampledGrid, BRICK_HEIGHT,
};
pub use probe::{
    HeightField, HeightFieldScene, ProbeError, ProbeHit, ProbeResult, Structure, SurfaceProbe,
    TagClassifier,
};
