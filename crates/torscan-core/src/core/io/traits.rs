use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// Error raised while extracting a final energy from a simulation log.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: ExtractErrorKind,
    },
}

#[derive(Debug, Error)]
pub enum ExtractErrorKind {
    #[error("Invalid float in energy column {column} (value: '{value}')")]
    InvalidFloat { column: usize, value: String },
    #[error("Marker line has only {found} whitespace-delimited tokens, expected at least {expected}")]
    TooFewTokens { found: usize, expected: usize },
}

/// Defines the interface for extracting the final energy from an external
/// simulation tool's log file.
///
/// Each external tool writes its energies in an undocumented, fixed-format
/// text log; every implementor is a deliberately narrow parser that knows
/// one tool's marker line and token position, and nothing else.
pub trait FinalEnergyLog {
    /// Reads the final energy from a buffered reader.
    ///
    /// Returns `Ok(None)` when the log contains no marker line, which is
    /// how an unfinished or crashed job presents itself.
    ///
    /// # Errors
    ///
    /// Returns an error if the marker line is malformed or I/O fails.
    fn read_final_energy(reader: &mut impl BufRead) -> Result<Option<f64>, ExtractError>;

    /// Reads the final energy from a log file on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, the marker line is
    /// malformed, or I/O fails.
    fn read_final_energy_from_path<P: AsRef<Path>>(path: P) -> Result<Option<f64>, ExtractError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_final_energy(&mut reader)
    }
}

pub(crate) fn parse_energy_token(
    line: &str,
    line_num: usize,
    column: usize,
) -> Result<f64, ExtractError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(token) = tokens.get(column) else {
        return Err(ExtractError::Parse {
            line: line_num,
            kind: ExtractErrorKind::TooFewTokens {
                found: tokens.len(),
                expected: column + 1,
            },
        });
    };
    token.parse().map_err(|_| ExtractError::Parse {
        line: line_num,
        kind: ExtractErrorKind::InvalidFloat {
            column,
            value: (*token).to_string(),
        },
    })
}
