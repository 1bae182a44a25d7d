//! Core types and utilities

pub mod surface;
pub mod vec3;

pub use surface::SurfaceKind;
pub use vec3::{down, Rotation, Vec3};
