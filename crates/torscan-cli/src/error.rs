use crate::toolkit::ToolkitProcessError;
use thiserror::Error;
use torscan::workflows::prepare::PrepareError;
use torscan::workflows::scan::ScanError;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Prepare(#[from] PrepareError<ToolkitProcessError>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),
}
