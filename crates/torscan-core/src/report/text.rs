//! Combined tab-delimited results report (`summary.dat`).

use super::ReportError;
use crate::core::catalog::CachePolicy;
use std::io::Write;
use std::path::Path;
use tracing::warn;

/// Fixed name of the combined results report.
pub const REPORT_FILENAME: &str = "summary.dat";

/// QM rows of the report: reference angle, total energy in Hartree, and
/// relative energy in kcal/mol. Vectors are parallel.
#[derive(Debug, Clone)]
pub struct QmSection {
    pub angles: Vec<f64>,
    pub total: Vec<f64>,
    pub relative: Vec<f64>,
}

/// MM rows of the report, all energies in kcal/mol. `correction` is present
/// only when a restraint force constant was supplied.
#[derive(Debug, Clone)]
pub struct MmSection {
    pub angles: Vec<f64>,
    pub total: Vec<f64>,
    pub relative: Vec<f64>,
    pub correction: Option<MmCorrection>,
}

/// Per-row restraint bookkeeping: the measured dihedral angle, the harmonic
/// penalty, and the total with the penalty removed.
#[derive(Debug, Clone)]
pub struct MmCorrection {
    pub actual_angles: Vec<f64>,
    pub restraint: Vec<f64>,
    pub corrected: Vec<f64>,
}

/// Writes the combined report, honoring the cache policy: under
/// [`CachePolicy::Reuse`] an existing report is left alone with a warning.
///
/// Returns `true` if the report was written.
pub fn write_report(
    path: &Path,
    qm: Option<&QmSection>,
    mm: Option<&MmSection>,
    policy: CachePolicy,
) -> Result<bool, ReportError> {
    if policy == CachePolicy::Reuse && path.exists() {
        warn!(
            "{} already exists; skipping the combined results report",
            path.display()
        );
        return Ok(false);
    }

    let mut file = std::fs::File::create(path)?;
    if let Some(section) = qm {
        write_qm_section(&mut file, section)?;
    }
    if let Some(section) = mm {
        if qm.is_some() {
            writeln!(file)?;
        }
        write_mm_section(&mut file, section)?;
    }
    Ok(true)
}

fn write_qm_section(w: &mut impl Write, section: &QmSection) -> std::io::Result<()> {
    writeln!(w, "\tRESULTS FOR QM DIHEDRAL SCAN")?;
    writeln!(w, "\t----------------------------")?;
    writeln!(w, "angle_ref\ttotE(Har)\trelE(kc/mol)")?;
    for i in 0..section.angles.len() {
        writeln!(
            w,
            "\t{:.1}\t{:.7}\t{:.3}",
            section.angles[i], section.total[i], section.relative[i]
        )?;
    }
    Ok(())
}

fn write_mm_section(w: &mut impl Write, section: &MmSection) -> std::io::Result<()> {
    writeln!(w, "\tRESULTS FOR MM DIHEDRAL SCAN")?;
    writeln!(w, "\t----------------------------")?;
    match &section.correction {
        Some(correction) => {
            writeln!(
                w,
                "angle_ref\tangle_act\ttotalE\trestrE\t(tot-restr)\trelE(kc/mol)"
            )?;
            for i in 0..section.angles.len() {
                writeln!(
                    w,
                    "\t{:.1}\t{:.2}\t{:.3}\t{:.3}\t{:.3}\t{:.3}",
                    section.angles[i],
                    correction.actual_angles[i],
                    section.total[i],
                    correction.restraint[i],
                    correction.corrected[i],
                    section.relative[i]
                )?;
            }
        }
        None => {
            writeln!(w, "angle_ref\ttotalE\trelE(kc/mol)")?;
            for i in 0..section.angles.len() {
                writeln!(
                    w,
                    "\t{:.1}\t{:.3}\t{:.3}",
                    section.angles[i], section.total[i], section.relative[i]
                )?;
            }
        }
    }
    Ok(())
}
