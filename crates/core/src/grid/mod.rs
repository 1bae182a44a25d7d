//! Grid sampling and brick quantization

pub mod cell;
pub mod config;
pub mod height_map;
pub mod quantizer;
pub mod sampler;

// Re-export main types
pub use cell::*;
pub use config::*;
pub use height_map::*;
pub use quantizer::*;
pub use sampler::*;
