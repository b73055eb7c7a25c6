use crate::ephemeris::BodyId;
use serde::Serialize;
use std::collections::TryReserveError;
use std::fmt;
use thiserror::Error;

/// Failures that leave no usable chart record
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Failed to grow chart output buffer: {0}")]
    OutputAllocation(#[from] TryReserveError),
    #[error("Chart output needs {needed} bytes, limit is {limit}")]
    OutputLimit { limit: usize, needed: usize },
    #[error("Failed to format chart output: {0}")]
    Format(#[from] fmt::Error),
    #[error("Failed to encode chart string: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Why a body is missing from the planet list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OmissionReason {
    /// The ephemeris reported an error status
    Failed { status: i32, message: String },
    /// The ephemeris succeeded, but not with the requested ephemeris source
    ModeNotHonored { status: i32, requested: i32 },
}

impl fmt::Display for OmissionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OmissionReason::Failed { status, message } if message.is_empty() => {
                write!(f, "ephemeris failed with status {}", status)
            }
            OmissionReason::Failed { status, message } => {
                write!(f, "ephemeris failed with status {}: {}", status, message)
            }
            OmissionReason::ModeNotHonored { status, requested } => write!(
                f,
                "ephemeris returned flags {:#x} without requested source {:#x}",
                status, requested
            ),
        }
    }
}

/// One entry of the partial-failure report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OmittedBody {
    pub id: BodyId,
    pub reason: OmissionReason,
}

impl fmt::Display for OmittedBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body {}: {}", self.id, self.reason)
    }
}
