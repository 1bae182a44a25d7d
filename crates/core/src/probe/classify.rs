//! Tag to surface-kind classification

use crate::core_types::SurfaceKind;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Lookup table from object tags to surface kinds.
///
/// Tags are matched exactly (case-sensitive). Anything not in the table classifies as
/// [`SurfaceKind::Default`]. The default table knows `"Ground"` and `"Building"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagClassifier {
    rules: FxHashMap<String, SurfaceKind>,
}

impl TagClassifier {
    /// Classifier with no rules; everything is [`SurfaceKind::Default`]
    pub fn empty() -> Self {
        Self {
            rules: FxHashMap::default(),
        }
    }

    /// Add (or replace) the kind assigned to `tag`
    pub fn with_rule(mut self, tag: impl Into<String>, kind: SurfaceKind) -> Self {
        self.rules.insert(tag.into(), kind);
        self
    }

    pub fn classify(&self, tag: &str) -> SurfaceKind {
        self.rules.get(tag).copied().unwrap_or_default()
    }

    /// Number of tag rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for TagClassifier {
    fn default() -> Self {
        Self::empty()
            .with_rule(SurfaceKind::Ground.name(), SurfaceKind::Ground)
            .with_rule(SurfaceKind::Building.name(), SurfaceKind::Building)
    }
}
