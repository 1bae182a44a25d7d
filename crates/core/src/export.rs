//! JSON export of stud maps
//!
//! Maps are written as pretty-printed JSON, one file per map, named `<name>.json`
//! inside an output directory.

use crate::error::StudMapError;
use crate::grid::HeightMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File extension used for exported maps
pub const EXPORT_EXTENSION: &str = "json";

/// Path of the file a map called `name` is exported to
pub fn export_path(dir: impl AsRef<Path>, name: &str) -> PathBuf {
    dir.as_ref().join(format!("{name}.{EXPORT_EXTENSION}"))
}

impl HeightMap {
    /// Serialize to a JSON string
    ///
    /// # Errors
    /// Returns error if the map cannot be serialized
    pub fn to_json(&self) -> Result<String, ExportError> {
        serde_json::to_string_pretty(self).map_err(|e| ExportError::SerializeFailed(e.to_string()))
    }

    /// Parse a map from JSON, checking that cells, dimensions and total agree
    ///
    /// # Errors
    /// Returns error if the text is not a map or the map is inconsistent
    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        let map: Self =
            serde_json::from_str(json).map_err(|e| ExportError::ParseFailed(e.to_string()))?;

        if !map.is_consistent() {
            return Err(ExportError::ParseFailed(format!(
                "{}x{} map with {} cells and total {} disagrees with its cells",
                map.width,
                map.depth,
                map.cells.len(),
                map.total_unit_count
            )));
        }

        Ok(map)
    }

    /// Save map to file
    ///
    /// # Errors
    /// Returns error if file cannot be written or map cannot be serialized
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ExportError> {
        let contents = self.to_json()?;
        fs::write(path, contents).map_err(|e| ExportError::SaveFailed(e.to_string()))?;

        Ok(())
    }

    /// Load map from file
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ExportError> {
        let contents =
            fs::read_to_string(path).map_err(|e| ExportError::LoadFailed(e.to_string()))?;

        Self::from_json(&contents)
    }

    /// Save as `<dir>/<name>.json`, creating `dir` if needed. Returns the written path.
    ///
    /// # Errors
    /// Returns error if the directory or file cannot be written
    pub fn export_to(&self, dir: impl AsRef<Path>, name: &str) -> Result<PathBuf, ExportError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| ExportError::SaveFailed(e.to_string()))?;

        let path = export_path(dir, name);
        self.save(&path)?;

        info!(
            "Exported {}x{} stud map ({} bricks) to {}",
            self.width,
            self.depth,
            self.total_unit_count,
            path.display()
        );
        Ok(path)
    }
}

/// Errors that can occur while exporting or loading a map
#[derive(Debug)]
pub enum ExportError {
    /// Computing the map failed before anything was written
    Compute(StudMapError),
    /// Failed to serialize map
    SerializeFailed(String),
    /// Failed to save file
    SaveFailed(String),
    /// Failed to load file
    LoadFailed(String),
    /// Failed to parse file contents
    ParseFailed(String),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Compute(err) => write!(f, "Failed to compute map: {err}"),
            ExportError::SerializeFailed(msg) => write!(f, "Failed to serialize: {msg}"),
            ExportError::SaveFailed(msg) => write!(f, "Failed to save: {msg}"),
            ExportError::LoadFailed(msg) => write!(f, "Failed to load: {msg}"),
            ExportError::ParseFailed(msg) => write!(f, "Failed to parse: {msg}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Compute(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StudMapError> for ExportError {
    fn from(err: StudMapError) -> Self {
        ExportError::Compute(err)
    }
}
