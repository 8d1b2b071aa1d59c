use crate::core::analysis::relative::{
    AnalysisError, HARTREE_TO_KCAL_MOL, RelativeProfile, relative_energies,
    relative_energies_corrected,
};
use crate::core::analysis::restraint::{RestraintProfile, restraint_profile};
use crate::core::catalog::{CachePolicy, CatalogError, ScanLayout, catalog_scan};
use crate::core::io::mm::NamdLog;
use crate::core::io::qm::Psi4Log;
use crate::core::io::restraints::{
    RESTRAINT_LOG_FILENAME, RestraintFileError, read_records_from_path,
};
use crate::core::io::summary::{MM_SUMMARY_FILENAME, QM_SUMMARY_FILENAME};
use crate::core::models::scan::ScanSeries;
use crate::core::progress::{Progress, ProgressReporter};
use crate::report::plot::{FigureSeries, scatter_figure};
use crate::report::text::{MmCorrection, MmSection, QmSection, REPORT_FILENAME, write_report};
use crate::report::ReportError;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

pub const QM_FIGURE_FILENAME: &str = "plot_relDihed-qm.svg";
pub const MM_FIGURE_FILENAME: &str = "plot_relDihed-mm.svg";
pub const COMBINED_FIGURE_FILENAME: &str = "plot_relDihed.svg";

const MM_SERIES_LABEL: &str = "MM (NAMD, CGenFF)";
const QM_SERIES_LABEL: &str = "QM (Psi4, MP2/6-31G*)";

#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("Failed to read restraint log: {0}")]
    Restraints(#[from] RestraintFileError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error(transparent)]
    Report(#[from] ReportError),
}

#[derive(Debug, Clone)]
pub struct QmScanConfig {
    pub root: PathBuf,
    pub filename: String,
    pub theory: String,
}

#[derive(Debug, Clone)]
pub struct MmScanConfig {
    pub root: PathBuf,
    pub filename: String,
    /// Harmonic force constant of the dihedral restraint, in
    /// kcal/(mol·deg²). When present, the restraint energy is subtracted
    /// from each MM total before relative energies are taken. Left unset
    /// by default: the MM engine may already exclude the restraint term
    /// from its reported potential energy, in which case subtracting it
    /// again distorts the profile.
    pub force_constant: Option<f64>,
}

/// Full configuration of one scan-processing run. Immutable once built;
/// every pipeline stage receives what it needs explicitly.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub qm: Option<QmScanConfig>,
    pub mm: Option<MmScanConfig>,
    /// Where summary caches, figures, and the combined report land.
    pub output_dir: PathBuf,
    pub cache_policy: CachePolicy,
    pub save_figures: bool,
    pub write_report: bool,
}

/// Catalogued and analyzed results for one method.
#[derive(Debug, Clone)]
pub struct MethodResult {
    pub series: ScanSeries,
    pub profile: RelativeProfile,
    /// Restraint bookkeeping, present only for MM runs with a force
    /// constant configured.
    pub restraints: Option<RestraintProfile>,
}

#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub qm: Option<MethodResult>,
    pub mm: Option<MethodResult>,
}

/// Processes the configured scans: catalogue, analyze, and render.
pub fn run(config: &ScanConfig, reporter: &ProgressReporter) -> Result<ScanResult, ScanError> {
    let mut result = ScanResult::default();

    if let Some(qm_config) = &config.qm {
        result.qm = Some(run_qm(qm_config, config, reporter)?);
    }
    if let Some(mm_config) = &config.mm {
        result.mm = Some(run_mm(mm_config, config, reporter)?);
    }

    if config.save_figures
        && let (Some(qm), Some(mm)) = (&result.qm, &result.mm)
    {
        reporter.report(Progress::PhaseStart {
            name: "Rendering combined figure",
        });
        let mm_series =
            FigureSeries::new(MM_SERIES_LABEL, &mm.profile.angles, &mm.profile.relative);
        let qm_series =
            FigureSeries::new(QM_SERIES_LABEL, &qm.profile.angles, &qm.profile.relative);
        scatter_figure(
            &config.output_dir.join(COMBINED_FIGURE_FILENAME),
            "Dihedral Scan",
            &mm_series,
            Some(&qm_series),
        )?;
        reporter.report(Progress::PhaseFinish);
    }

    if config.write_report {
        let qm_section = result.qm.as_ref().map(qm_section);
        let mm_section = result.mm.as_ref().map(mm_section);
        let path = config.output_dir.join(REPORT_FILENAME);
        if write_report(
            &path,
            qm_section.as_ref(),
            mm_section.as_ref(),
            config.cache_policy,
        )? {
            info!("Combined results written to {}", path.display());
        }
    }

    Ok(result)
}

fn run_qm(
    qm: &QmScanConfig,
    config: &ScanConfig,
    reporter: &ProgressReporter,
) -> Result<MethodResult, ScanError> {
    reporter.report(Progress::PhaseStart {
        name: "Cataloguing QM scan",
    });
    info!("Cataloguing QM scan under {}", qm.root.display());

    let layout = ScanLayout::with_theory(&qm.root, &qm.filename, &qm.theory);
    let cache = config.output_dir.join(QM_SUMMARY_FILENAME);
    let series = catalog_scan::<Psi4Log>(&layout, &cache, config.cache_policy, reporter)?;
    let profile = relative_energies(&series, HARTREE_TO_KCAL_MOL)?;
    reporter.report(Progress::PhaseFinish);

    if config.save_figures {
        let figure = FigureSeries::new(QM_SERIES_LABEL, &profile.angles, &profile.relative);
        scatter_figure(
            &config.output_dir.join(QM_FIGURE_FILENAME),
            "Dihedral Scan - QM",
            &figure,
            None,
        )?;
    }

    info!(
        "QM scan: {} of {} angles have a final energy",
        profile.angles.len(),
        series.len()
    );
    Ok(MethodResult {
        series,
        profile,
        restraints: None,
    })
}

fn run_mm(
    mm: &MmScanConfig,
    config: &ScanConfig,
    reporter: &ProgressReporter,
) -> Result<MethodResult, ScanError> {
    reporter.report(Progress::PhaseStart {
        name: "Cataloguing MM scan",
    });
    info!("Cataloguing MM scan under {}", mm.root.display());

    let layout = ScanLayout::flat(&mm.root, &mm.filename);
    let cache = config.output_dir.join(MM_SUMMARY_FILENAME);
    let series = catalog_scan::<NamdLog>(&layout, &cache, config.cache_policy, reporter)?;

    let restraints = match mm.force_constant {
        Some(force_constant) => {
            let log = mm.root.join(RESTRAINT_LOG_FILENAME);
            info!(
                "Subtracting harmonic restraint energies (k = {}) from {}",
                force_constant,
                log.display()
            );
            let records = read_records_from_path(&log)?;
            Some(restraint_profile(&records, force_constant))
        }
        None => None,
    };
    let profile = relative_energies_corrected(
        &series,
        restraints.as_ref().map(|r| r.energies.as_slice()),
        1.0,
    )?;
    reporter.report(Progress::PhaseFinish);

    if config.save_figures {
        let figure = FigureSeries::new(MM_SERIES_LABEL, &profile.angles, &profile.relative);
        scatter_figure(
            &config.output_dir.join(MM_FIGURE_FILENAME),
            "Dihedral Scan - MM",
            &figure,
            None,
        )?;
    }

    info!(
        "MM scan: {} of {} angles have a final energy",
        profile.angles.len(),
        series.len()
    );
    Ok(MethodResult {
        series,
        profile,
        restraints,
    })
}

fn qm_section(result: &MethodResult) -> QmSection {
    QmSection {
        angles: result.profile.angles.clone(),
        total: result.profile.energies.clone(),
        relative: result.profile.relative.clone(),
    }
}

fn mm_section(result: &MethodResult) -> MmSection {
    let correction = result.restraints.as_ref().map(|restraints| {
        let actual_angles = result
            .profile
            .retained
            .iter()
            .map(|&i| restraints.actual_angles[i])
            .collect();
        let restraint: Vec<f64> = result
            .profile
            .retained
            .iter()
            .map(|&i| restraints.energies[i])
            .collect();
        MmCorrection {
            actual_angles,
            restraint,
            corrected: result.profile.energies.clone(),
        }
    });

    // With a correction in play, profile energies already have the
    // restraint removed; the report's total column wants the raw values.
    let total = result
        .profile
        .retained
        .iter()
        .filter_map(|&i| result.series.points()[i].energy)
        .collect();

    MmSection {
        angles: result.profile.angles.clone(),
        total,
        relative: result.profile.relative.clone(),
        correction,
    }
}
