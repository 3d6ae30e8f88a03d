use std::path::PathBuf;

use thiserror::Error;

/// Structural precondition failures. A trial constructed from invalid
/// parameters aborts immediately with no partial result; degenerate numeric
/// inputs and resource exhaustion are handled in-band by the simulation and
/// never surface here.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid rocket parameters: {0}")]
    InvalidRocket(String),

    #[error("invalid guidance parameters: {0}")]
    InvalidGuidance(String),

    #[error("invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("failed to read scenario file {path}")]
    ScenarioIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario file {path}")]
    ScenarioParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to write {path}")]
    OutputIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode best configuration")]
    Encode {
        #[source]
        source: serde_yaml::Error,
    },
}
