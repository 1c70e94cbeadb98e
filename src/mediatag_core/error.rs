use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaggerError {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walker error: {0}")]
    Walkdir(#[from] walkdir::Error),

    #[error("Destination already exists: {0}")]
    DestinationExists(PathBuf),

    // External tool errors
    #[error("Command `{command}` ended with return code {exit_code}")]
    ExternalTool { command: String, exit_code: i32 },

    #[error("External tool not found or not runnable: {0}")]
    ToolNotFound(String),

    #[error("Invalid command line: {0}")]
    InvalidCommandLine(String),

    // Tagging errors
    #[error("File is already indexed: {0}")]
    AlreadyIndexed(PathBuf),

    #[error("Unexpected workflow event: {0}")]
    Workflow(String),

    // User interaction
    #[error("Operator input closed")]
    InputClosed,

    // Generic errors
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Argument error: {0}")]
    Argument(String),
}

/// Result type for mediatag operations.
pub type Result<T> = std::result::Result<T, TaggerError>;

/// Treat a missing file as success for deletions that must be idempotent.
pub(crate) fn ignore_not_found(result: std::io::Result<()>) -> Result<()> {
    match result {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        other => other.map_err(TaggerError::from),
    }
}
