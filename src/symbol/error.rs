// Thu Oct 15 2026 - Alex

use crate::process::ToolError;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to obtain the raw export list. Always fatal for a run.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Cannot read binary {path}: {source}")]
    BinaryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot read export dump {path}: {source}")]
    DumpUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Export tool failed: {0}")]
    Tool(#[from] ToolError),
}
