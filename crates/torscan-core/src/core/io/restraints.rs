use crate::core::models::restraint::RestraintRecord;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// Fixed name of the coordinate log holding (reference, actual) dihedral
/// pairs measured after each restrained minimization.
pub const RESTRAINT_LOG_FILENAME: &str = "diheds-from-coor.dat";

#[derive(Debug, Error)]
pub enum RestraintFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: RestraintParseErrorKind,
    },
}

#[derive(Debug, Error)]
pub enum RestraintParseErrorKind {
    #[error("Expected two whitespace-delimited columns, found {found}")]
    WrongColumnCount { found: usize },
    #[error("Invalid angle value '{value}'")]
    InvalidAngle { value: String },
}

/// Reads the restraint coordinate log: one `(reference, actual)` angle pair
/// per line, whitespace-delimited, blank lines ignored.
pub fn read_records(reader: &mut impl BufRead) -> Result<Vec<RestraintRecord>, RestraintFileError> {
    let mut records = Vec::new();
    for (line_num, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let line_num = line_num + 1;
        if line.trim().is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 {
            return Err(RestraintFileError::Parse {
                line: line_num,
                kind: RestraintParseErrorKind::WrongColumnCount { found: parts.len() },
            });
        }
        let reference = parse_angle(parts[0], line_num)?;
        let actual = parse_angle(parts[1], line_num)?;
        records.push(RestraintRecord::new(reference, actual));
    }
    Ok(records)
}

pub fn read_records_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<RestraintRecord>, RestraintFileError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    read_records(&mut reader)
}

fn parse_angle(token: &str, line_num: usize) -> Result<f64, RestraintFileError> {
    token.parse().map_err(|_| RestraintFileError::Parse {
        line: line_num,
        kind: RestraintParseErrorKind::InvalidAngle {
            value: token.to_string(),
        },
    })
}
