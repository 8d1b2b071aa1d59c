use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use thiserror::Error;
use torscan::workflows::prepare::{ConformerToolkit, QmJobSpec};
use tracing::debug;

/// Separator between molecule records in the helper's `read`/`write`
/// streams: a line holding only `--`.
const MOLECULE_SEPARATOR: &str = "\n--\n";

#[derive(Debug, Error)]
pub enum ToolkitProcessError {
    #[error("Failed to run '{program} {operation}': {source}", program = program.display())]
    Spawn {
        program: PathBuf,
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("'{program} {operation}' exited with {status}: {stderr}", program = program.display())]
    OperationFailed {
        program: PathBuf,
        operation: &'static str,
        status: ExitStatus,
        stderr: String,
    },
    #[error("'{operation}' produced non-UTF-8 output")]
    InvalidUtf8 { operation: &'static str },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Chemistry toolkit adapter that shells out to a helper executable.
///
/// Each operation invokes `<program> <operation> [args...]` as a filter:
/// molecule text on stdin, transformed molecule text (or, for
/// `make-input`, the QM job-input text) on stdout. Multiple molecules in
/// one stream are separated by a `--` line.
pub struct ProcessToolkit {
    program: PathBuf,
}

impl ProcessToolkit {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run_filter(
        &self,
        operation: &'static str,
        args: &[&str],
        input: &str,
    ) -> Result<String, ToolkitProcessError> {
        debug!("Running toolkit helper: {} {}", self.program.display(), operation);
        let mut child = Command::new(&self.program)
            .arg(operation)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ToolkitProcessError::Spawn {
                program: self.program.clone(),
                operation,
                source: e,
            })?;

        // Feed stdin from its own thread. Writing the whole stream here
        // while stdout sits undrained deadlocks as soon as the molecule
        // text outgrows the OS pipe buffers.
        let stdin = child.stdin.take();
        let payload = input.to_string();
        let writer = thread::spawn(move || -> io::Result<()> {
            if let Some(mut stdin) = stdin {
                stdin.write_all(payload.as_bytes())?;
            }
            Ok(())
        });

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(ToolkitProcessError::OperationFailed {
                program: self.program.clone(),
                operation,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        // A helper that stops reading before EOF breaks the stdin pipe;
        // with a success status that is not an error.
        if let Ok(Err(e)) = writer.join()
            && e.kind() != io::ErrorKind::BrokenPipe
        {
            return Err(ToolkitProcessError::Io(e));
        }
        String::from_utf8(output.stdout)
            .map_err(|_| ToolkitProcessError::InvalidUtf8 { operation })
    }
}

impl ConformerToolkit for ProcessToolkit {
    type Molecule = String;
    type Error = ToolkitProcessError;

    fn read_molecules(&self, input: &Path) -> Result<Vec<String>, ToolkitProcessError> {
        let raw = std::fs::read_to_string(input)?;
        let stream = self.run_filter("read", &[], &raw)?;
        Ok(stream
            .split(MOLECULE_SEPARATOR)
            .map(str::to_string)
            .filter(|m| !m.trim().is_empty())
            .collect())
    }

    fn assign_atom_names(&self, molecule: &mut String) -> Result<(), ToolkitProcessError> {
        *molecule = self.run_filter("assign-names", &[], molecule)?;
        Ok(())
    }

    fn add_hydrogens(&self, molecule: &mut String) -> Result<(), ToolkitProcessError> {
        *molecule = self.run_filter("add-hydrogens", &[], molecule)?;
        Ok(())
    }

    fn quick_optimize(&self, molecule: &mut String) -> Result<(), ToolkitProcessError> {
        *molecule = self.run_filter("quick-opt", &[], molecule)?;
        Ok(())
    }

    fn write_molecules(
        &self,
        molecules: &[String],
        output: &Path,
    ) -> Result<(), ToolkitProcessError> {
        let stream = molecules.join(MOLECULE_SEPARATOR);
        let formatted = self.run_filter("write", &[], &stream)?;
        std::fs::write(output, formatted)?;
        Ok(())
    }

    fn make_qm_input(
        &self,
        molecule: &String,
        job: &QmJobSpec,
    ) -> Result<String, ToolkitProcessError> {
        self.run_filter(
            "make-input",
            &[
                "--name",
                &job.molecule_name,
                "--method",
                &job.method,
                "--basis",
                &job.basis,
                "--task",
                &job.task,
                "--memory",
                &job.memory,
            ],
            molecule,
        )
    }
}
