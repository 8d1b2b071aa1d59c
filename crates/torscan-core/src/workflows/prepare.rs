//! Conformer-preparation driver.
//!
//! All chemistry (molecule file formats, atom typing, hydrogen addition,
//! geometry optimization, QM input generation) lives behind the
//! [`ConformerToolkit`] seam; this workflow is pure orchestration.

use std::error::Error;
use std::path::{Path, PathBuf};
use thiserror::Error as ThisError;
use tracing::info;

/// Parameters of the QM job whose input file the preparation hands off to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QmJobSpec {
    pub molecule_name: String,
    pub method: String,
    pub basis: String,
    pub task: String,
    pub memory: String,
}

impl Default for QmJobSpec {
    fn default() -> Self {
        Self {
            molecule_name: "molecule".into(),
            method: "mp2".into(),
            basis: "6-31G*".into(),
            task: "opt".into(),
            memory: "2 Gb".into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PrepareConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Where the generated QM job-input text is written.
    pub qm_input_path: PathBuf,
    pub job: QmJobSpec,
}

#[derive(Debug, ThisError)]
pub enum PrepareError<E: Error> {
    #[error("Toolkit operation '{operation}' failed: {source}")]
    Toolkit {
        operation: &'static str,
        #[source]
        source: E,
    },
    #[error("No molecules in input '{path}'", path = path.display())]
    EmptyInput { path: PathBuf },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The operations the external chemistry toolkit must provide.
///
/// `Molecule` is opaque to this crate; only the toolkit knows what is
/// inside it. Every operation error propagates to the caller unmodified,
/// wrapped with the name of the operation that failed.
pub trait ConformerToolkit {
    type Molecule;
    type Error: Error;

    /// Reads all molecules (conformers) from a molecule file.
    fn read_molecules(&self, input: &Path) -> Result<Vec<Self::Molecule>, Self::Error>;

    /// Assigns standardized (Tripos-style) atom names.
    fn assign_atom_names(&self, molecule: &mut Self::Molecule) -> Result<(), Self::Error>;

    /// Adds explicit hydrogens.
    fn add_hydrogens(&self, molecule: &mut Self::Molecule) -> Result<(), Self::Error>;

    /// Runs a quick forcefield geometry pre-optimization.
    fn quick_optimize(&self, molecule: &mut Self::Molecule) -> Result<(), Self::Error>;

    /// Writes the molecules to a molecule file.
    fn write_molecules(
        &self,
        molecules: &[Self::Molecule],
        output: &Path,
    ) -> Result<(), Self::Error>;

    /// Produces the textual QM job input for one molecule.
    fn make_qm_input(
        &self,
        molecule: &Self::Molecule,
        job: &QmJobSpec,
    ) -> Result<String, Self::Error>;
}

/// Reads, standardizes, pre-optimizes, and writes every molecule of the
/// input file, then generates the QM job input from the last molecule.
///
/// Returns the number of molecules processed.
pub fn run<T: ConformerToolkit>(
    toolkit: &T,
    config: &PrepareConfig,
) -> Result<usize, PrepareError<T::Error>> {
    info!("Reading molecules from {}", config.input.display());
    let mut molecules = toolkit
        .read_molecules(&config.input)
        .map_err(|e| toolkit_err("read-molecules", e))?;
    if molecules.is_empty() {
        return Err(PrepareError::EmptyInput {
            path: config.input.clone(),
        });
    }

    for molecule in &mut molecules {
        toolkit
            .assign_atom_names(molecule)
            .map_err(|e| toolkit_err("assign-atom-names", e))?;
        toolkit
            .add_hydrogens(molecule)
            .map_err(|e| toolkit_err("add-hydrogens", e))?;
        toolkit
            .quick_optimize(molecule)
            .map_err(|e| toolkit_err("quick-optimize", e))?;
    }

    info!(
        "Writing {} optimized molecule(s) to {}",
        molecules.len(),
        config.output.display()
    );
    toolkit
        .write_molecules(&molecules, &config.output)
        .map_err(|e| toolkit_err("write-molecules", e))?;

    let last = molecules.last().ok_or_else(|| PrepareError::EmptyInput {
        path: config.input.clone(),
    })?;
    let input_text = toolkit
        .make_qm_input(last, &config.job)
        .map_err(|e| toolkit_err("make-qm-input", e))?;
    std::fs::write(&config.qm_input_path, input_text)?;
    info!("QM job input written to {}", config.qm_input_path.display());

    Ok(molecules.len())
}

fn toolkit_err<E: Error>(operation: &'static str, source: E) -> PrepareError<E> {
    PrepareError::Toolkit { operation, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io;

    struct MockToolkit {
        operations: RefCell<Vec<String>>,
        fail_on: Option<&'static str>,
    }

    impl MockToolkit {
        fn new() -> Self {
            Self {
                operations: RefCell::new(Vec::new()),
                fail_on: None,
            }
        }

        fn failing_at(operation: &'static str) -> Self {
            Self {
                operations: RefCell::new(Vec::new()),
                fail_on: Some(operation),
            }
        }

        fn record(&self, operation: &str) -> Result<(), io::Error> {
            self.operations.borrow_mut().push(operation.to_string());
            if self.fail_on == Some(operation.split(' ').next().unwrap_or(operation)) {
                return Err(io::Error::other("toolkit exploded"));
            }
            Ok(())
        }
    }

    impl ConformerToolkit for MockToolkit {
        type Molecule = String;
        type Error = io::Error;

        fn read_molecules(&self, _input: &Path) -> Result<Vec<String>, io::Error> {
            self.record("read")?;
            Ok(vec!["mol-a".into(), "mol-b".into()])
        }

        fn assign_atom_names(&self, molecule: &mut String) -> Result<(), io::Error> {
            self.record(&format!("names {molecule}"))
        }

        fn add_hydrogens(&self, molecule: &mut String) -> Result<(), io::Error> {
            self.record(&format!("hydrogens {molecule}"))
        }

        fn quick_optimize(&self, molecule: &mut String) -> Result<(), io::Error> {
            self.record(&format!("optimize {molecule}"))?;
            molecule.push_str("-opt");
            Ok(())
        }

        fn write_molecules(&self, molecules: &[String], output: &Path) -> Result<(), io::Error> {
            self.record("write")?;
            std::fs::write(output, molecules.join("\n"))
        }

        fn make_qm_input(&self, molecule: &String, job: &QmJobSpec) -> Result<String, io::Error> {
            self.record("input")?;
            Ok(format!(
                "molecule {} {{ {} }}\nset basis {}\n{}('{}')\n",
                job.molecule_name, molecule, job.basis, job.task, job.method
            ))
        }
    }

    fn config(dir: &Path) -> PrepareConfig {
        PrepareConfig {
            input: dir.join("in.mol2"),
            output: dir.join("out.mol2"),
            qm_input_path: dir.join("input.dat"),
            job: QmJobSpec {
                molecule_name: "chloroGBI".into(),
                ..QmJobSpec::default()
            },
        }
    }

    #[test]
    fn processes_every_molecule_in_order_and_writes_both_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let toolkit = MockToolkit::new();

        let count = run(&toolkit, &config(dir.path())).unwrap();
        assert_eq!(count, 2);

        let operations = toolkit.operations.borrow();
        assert_eq!(
            *operations,
            vec![
                "read",
                "names mol-a",
                "hydrogens mol-a",
                "optimize mol-a",
                "names mol-b",
                "hydrogens mol-b",
                "optimize mol-b",
                "write",
                "input",
            ]
        );

        let written = std::fs::read_to_string(dir.path().join("out.mol2")).unwrap();
        assert_eq!(written, "mol-a-opt\nmol-b-opt");

        let qm_input = std::fs::read_to_string(dir.path().join("input.dat")).unwrap();
        assert!(qm_input.contains("chloroGBI"));
        assert!(qm_input.contains("set basis 6-31G*"));
        assert!(qm_input.contains("mol-b-opt"), "input comes from the last molecule");
    }

    #[test]
    fn toolkit_failure_propagates_with_the_operation_name() {
        let dir = tempfile::tempdir().unwrap();
        let toolkit = MockToolkit::failing_at("optimize");

        let result = run(&toolkit, &config(dir.path()));

        assert!(matches!(
            result,
            Err(PrepareError::Toolkit {
                operation: "quick-optimize",
                ..
            })
        ));
    }

    struct EmptyToolkit;

    impl ConformerToolkit for EmptyToolkit {
        type Molecule = String;
        type Error = io::Error;

        fn read_molecules(&self, _input: &Path) -> Result<Vec<String>, io::Error> {
            Ok(Vec::new())
        }
        fn assign_atom_names(&self, _m: &mut String) -> Result<(), io::Error> {
            Ok(())
        }
        fn add_hydrogens(&self, _m: &mut String) -> Result<(), io::Error> {
            Ok(())
        }
        fn quick_optimize(&self, _m: &mut String) -> Result<(), io::Error> {
            Ok(())
        }
        fn write_molecules(&self, _m: &[String], _o: &Path) -> Result<(), io::Error> {
            Ok(())
        }
        fn make_qm_input(&self, _m: &String, _j: &QmJobSpec) -> Result<String, io::Error> {
            Ok(String::new())
        }
    }

    #[test]
    fn empty_input_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(&EmptyToolkit, &config(dir.path()));
        assert!(matches!(result, Err(PrepareError::EmptyInput { .. })));
    }
}
