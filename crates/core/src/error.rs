//! Errors raised while computing a stud map.

use crate::probe::ProbeError;
use std::fmt;

/// Errors that can occur while sampling or quantizing a grid
#[derive(Debug, Clone, PartialEq)]
pub enum StudMapError {
    /// A configuration value is out of range. Reported before any probe is issued.
    InvalidConfiguration {
        /// Name of the offending field (e.g. `"width"`, `"scale"`)
        parameter: &'static str,
        /// Description of the violated constraint
        message: String,
    },
    /// The intersection query failed for one cell. The whole run is abandoned.
    QueryFailure {
        /// Grid column of the failed probe
        x: usize,
        /// Grid row of the failed probe
        z: usize,
        /// Underlying probe error
        source: ProbeError,
    },
}

impl StudMapError {
    /// Error for a real-valued parameter that must be finite and positive
    pub(crate) fn non_positive(parameter: &'static str, value: f32) -> Self {
        StudMapError::InvalidConfiguration {
            parameter,
            message: format!("must be finite and positive, got {value}"),
        }
    }

    /// Error for a grid dimension that must be at least one cell
    pub(crate) fn empty_dimension(parameter: &'static str, value: usize) -> Self {
        StudMapError::InvalidConfiguration {
            parameter,
            message: format!("must be at least 1, got {value}"),
        }
    }

    /// Error for a value that must be finite
    pub(crate) fn non_finite(parameter: &'static str) -> Self {
        StudMapError::InvalidConfiguration {
            parameter,
            message: "must be finite".to_string(),
        }
    }
}

impl fmt::Display for StudMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudMapError::InvalidConfiguration { parameter, message } => {
                write!(f, "Invalid configuration: {parameter} {message}")
            }
            StudMapError::QueryFailure { x, z, source } => {
                write!(f, "Probe query failed at cell ({x}, {z}): {source}")
            }
        }
    }
}

impl std::error::Error for StudMapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StudMapError::InvalidConfiguration { .. } => None,
            StudMapError::QueryFailure { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_invalid_configuration_message() {
        let err = StudMapError::non_positive("scale", -1.0);
        assert_eq!(
            err.to_string(),
            "Invalid configuration: scale must be finite and positive, got -1"
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn test_query_failure_keeps_source() {
        let err = StudMapError::QueryFailure {
            x: 3,
            z: 7,
            source: ProbeError::Unavailable("engine not ready".to_string()),
        };
        assert!(err.to_string().contains("(3, 7)"));
        assert!(err.source().is_some());
    }
}
