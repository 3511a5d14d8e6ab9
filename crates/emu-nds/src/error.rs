//! Error types for backend binding and core operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// No native backend could be bound.
///
/// This is the expected outcome on machines without the hardware-accurate
/// module installed. Callers fall back to the synthetic core.
#[derive(Debug, Error)]
pub enum BindError {
    #[error("native backend not found ({} candidate(s) tried)", candidates.len())]
    NotFound { candidates: Vec<PathBuf> },
}

/// Why a single candidate module could not be bound.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("cannot open module: {0}")]
    Open(#[source] libloading::Error),

    /// The module opened but does not export the whole ABI.
    #[error("missing entry point `{symbol}`")]
    MissingEntryPoint {
        symbol: &'static str,
        #[source]
        source: libloading::Error,
    },
}

/// Errors from core construction and program loading.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The bound module's initialize entry point reported failure.
    #[error("native backend initialization failed (status {status})")]
    InitFailed { status: i32 },

    #[error("cannot read program image {}: {source}", path.display())]
    ProgramUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The path cannot be passed across the ABI as a C string.
    #[error("program path is not valid UTF-8 or contains a NUL byte")]
    InvalidPath,

    #[error("backend rejected program image (status {status})")]
    ProgramRejected { status: i32 },
}
