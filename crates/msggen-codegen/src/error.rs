//! Error types for writing generated trees

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Error type for the artifact writer.
#[derive(Error, Debug)]
pub enum OutputError {
    /// Filesystem failure while writing or reading the output tree
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest of a previous run could not be read or written
    #[error("invalid manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Output directory holds files msggen did not generate
    #[error("{0} is not empty and has no msggen manifest (use --force to overwrite)")]
    ForeignDirectory(PathBuf),

    /// `verify` was pointed at a directory without a manifest
    #[error("{0} has no msggen manifest")]
    MissingManifest(PathBuf),

    /// Host and embedded trees would share files
    #[error("output directories overlap: host {host}, embedded {embedded}")]
    OverlappingRoots { host: PathBuf, embedded: PathBuf },

    /// An artifact path would escape the output directory
    #[error("artifact path escapes the output directory: {0}")]
    UnsafePath(PathBuf),
}

impl OutputError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| OutputError::Io { path, source }
    }

    /// Returns an error code suitable for a process exit status
    pub fn error_code(&self) -> u8 {
        match self {
            OutputError::Io { .. } => 8,
            OutputError::Manifest { .. } => 9,
            OutputError::ForeignDirectory(_) => 10,
            OutputError::MissingManifest(_) => 11,
            OutputError::UnsafePath(_) => 12,
            OutputError::OverlappingRoots { .. } => 13,
        }
    }
}
