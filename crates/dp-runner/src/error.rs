//! Error types for dp-runner

use dp_core::CoreError;
use dp_store::StoreError;
use thiserror::Error;

/// Errors raised while collecting inventories or applying change files
#[derive(Error, Debug)]
pub enum RunnerError {
    /// R001: No invocation strategy for this operating system
    #[error("[R001] Unsupported platform '{os}': no client invocation strategy")]
    UnsupportedPlatform { os: String },

    /// R002: The client process could not be started
    #[error("[R002] Failed to start database client for {file}: {source}")]
    ClientLaunch {
        file: String,
        source: std::io::Error,
    },

    /// R003: The client ran and reported failure
    #[error("[R003] Database client failed on {file} ({status})\nstdout: {stdout}\nstderr: {stderr}")]
    ClientFailed {
        file: String,
        status: String,
        stdout: String,
        stderr: String,
    },

    /// R004: The change file path could not be made absolute
    #[error("[R004] Cannot resolve path of {file}: {source}")]
    PathResolution {
        file: String,
        source: std::io::Error,
    },

    /// R005: The file was applied but recording it failed
    #[error("[R005] {file} was applied to the database but could not be recorded; it is invisible to future runs until recorded (dbpatch mark {file}): {source}")]
    RecordFailed {
        file: String,
        #[source]
        source: StoreError,
    },

    /// Ledger error outside of recording
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Inventory or configuration error
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias for RunnerError
pub type RunnerResult<T> = Result<T, RunnerError>;
