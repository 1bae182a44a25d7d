//! Surface classification attached to every sampled column.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of surface a probe landed on.
///
/// Downstream brick builders use this to pick colours or part families. Unknown tags
/// map to [`SurfaceKind::Default`], as do probes that hit nothing at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SurfaceKind {
    /// Unclassified surface, or no surface at all
    #[default]
    Default,
    /// Terrain / street level
    Ground,
    /// Man-made structure
    Building,
}

impl SurfaceKind {
    /// All kinds, in declaration order
    pub const ALL: [SurfaceKind; 3] = [
        SurfaceKind::Default,
        SurfaceKind::Ground,
        SurfaceKind::Building,
    ];

    /// Name used for tags and serialized output
    pub fn name(self) -> &'static str {
        match self {
            SurfaceKind::Default => "Default",
            SurfaceKind::Ground => "Ground",
            SurfaceKind::Building => "Building",
        }
    }
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
