// Error types for the Enrichr client.
//
// Library code returns `EnrichrError`; the binary wraps it in `anyhow`
// at the top level.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, EnrichrError>;

/// Remote call that can fail during a run. Used to name the failing step
/// in `EnrichrError::Stage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Libraries,
    Submit,
    Confirm,
    Enrich,
    Export,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Stage::Libraries => "Error fetching library names",
            Stage::Submit => "Error analyzing gene list",
            Stage::Confirm => "Error getting gene list",
            Stage::Enrich => "Error fetching enrichment results",
            Stage::Export => "Error downloading enrichment results",
        };
        f.write_str(msg)
    }
}

#[derive(Error, Debug)]
pub enum EnrichrError {
    /// Requested reference library is not known to the server
    #[error("'{name}' is not an Enrichr library name. Hint: run 'enrichr libraries' to view the full list of supported names.")]
    UnknownLibrary { name: String },

    /// A remote call answered with a non-success status
    #[error("{stage}: server responded with HTTP {status}")]
    Stage { stage: Stage, status: u16 },

    /// The add-list response did not carry a list identifier
    #[error("Submission response did not contain a userListId")]
    MissingListId,

    #[error("Network request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File operation on '{}' failed: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read result table: {0}")]
    Csv(#[from] csv::Error),

    #[error("Plotting failed: {0}")]
    Plot(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl EnrichrError {
    pub fn stage(stage: Stage, status: u16) -> Self {
        Self::Stage { stage, status }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn plot(msg: impl Into<String>) -> Self {
        Self::Plot(msg.into())
    }

    /// Stage that failed, if this error came from a non-success response.
    pub fn failed_stage(&self) -> Option<Stage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
