pub mod plot;
pub mod text;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Figure rendering failed for '{path}': {message}", path = path.display())]
    Render { path: PathBuf, message: String },
}
