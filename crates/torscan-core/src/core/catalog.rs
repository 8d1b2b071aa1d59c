use crate::core::io::summary::{self, SummaryError};
use crate::core::io::traits::{ExtractError, FinalEnergyLog};
use crate::core::models::scan::{ScanPoint, ScanSeries};
use crate::core::progress::{Progress, ProgressReporter};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Governs reuse of an existing summary cache file.
///
/// Cataloguing a scan walks every angle directory and is the only
/// non-trivial cost in the pipeline, so results are cached to a flat
/// summary file. A bare existence check silently shadows fresh source
/// directories, which is why the policy is an explicit part of the
/// caller's contract rather than an internal default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Read an existing summary file back verbatim, leaving the source
    /// logs untouched. A warning is emitted since the cache may be stale.
    #[default]
    Reuse,
    /// Recompute from the source logs and overwrite the summary file.
    Refresh,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to list scan root '{path}': {source}")]
    ListDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to extract energy from '{path}': {source}")]
    Extract {
        path: PathBuf,
        #[source]
        source: ExtractError,
    },
    #[error(transparent)]
    Summary(#[from] SummaryError),
}

/// Where one scan's per-angle result files live.
///
/// Each scanned angle has its own integer-named subdirectory under `root`,
/// holding one result file, with an optional theory-level subdirectory in
/// between for QM jobs: `<root>/<angle>/[<theory>/]<filename>`.
#[derive(Debug, Clone)]
pub struct ScanLayout {
    pub root: PathBuf,
    pub filename: String,
    pub theory: Option<String>,
}

impl ScanLayout {
    pub fn flat(root: impl Into<PathBuf>, filename: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            filename: filename.into(),
            theory: None,
        }
    }

    pub fn with_theory(
        root: impl Into<PathBuf>,
        filename: impl Into<String>,
        theory: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            filename: filename.into(),
            theory: Some(theory.into()),
        }
    }

    fn result_file(&self, angle_dir: &Path) -> PathBuf {
        match &self.theory {
            Some(theory) => angle_dir.join(theory).join(&self.filename),
            None => angle_dir.join(&self.filename),
        }
    }
}

/// Catalogues every angle of a scan into an ordered series.
///
/// Angle directories are visited in ascending numeric order regardless of
/// filesystem listing order. A directory without the expected result file
/// is skipped; a result file without a final energy keeps its slot with a
/// missing energy. Results are written to `cache_path` unless an existing
/// cache is reused under [`CachePolicy::Reuse`].
pub fn catalog_scan<L: FinalEnergyLog>(
    layout: &ScanLayout,
    cache_path: &Path,
    policy: CachePolicy,
    reporter: &ProgressReporter,
) -> Result<ScanSeries, CatalogError> {
    if policy == CachePolicy::Reuse && cache_path.exists() {
        warn!(
            "{} already exists; reading catalogued energies from the summary file \
             instead of the scan directories",
            cache_path.display()
        );
        return Ok(summary::read(cache_path)?);
    }

    let dirs = angle_directories(&layout.root)?;
    reporter.report(Progress::CatalogStart {
        angle_count: dirs.len() as u64,
    });

    let mut points = Vec::with_capacity(dirs.len());
    for (angle, dir) in dirs {
        let file = layout.result_file(&dir);
        if !file.is_file() {
            debug!("No result file at {}; skipping angle {}", file.display(), angle);
            reporter.report(Progress::AngleCatalogued);
            continue;
        }
        let energy =
            L::read_final_energy_from_path(&file).map_err(|e| CatalogError::Extract {
                path: file.clone(),
                source: e,
            })?;
        if energy.is_none() {
            debug!("No final energy in {}", file.display());
        }
        points.push(ScanPoint {
            angle: f64::from(angle),
            energy,
        });
        reporter.report(Progress::AngleCatalogued);
    }
    reporter.report(Progress::CatalogFinish);

    let series = ScanSeries::new(points);
    summary::write(cache_path, &series)?;
    Ok(series)
}

/// Lists the integer-named subdirectories of a scan root in ascending
/// numeric order. Non-numeric entries (job scripts, the restraint log)
/// are ignored.
fn angle_directories(root: &Path) -> Result<Vec<(i32, PathBuf)>, CatalogError> {
    let entries = std::fs::read_dir(root).map_err(|e| CatalogError::ListDir {
        path: root.to_path_buf(),
        source: e,
    })?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CatalogError::ListDir {
            path: root.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        if let Some(angle) = entry.file_name().to_str().and_then(|n| n.parse().ok()) {
            dirs.push((angle, path));
        }
    }
    dirs.sort_unstable_by_key(|&(angle, _)| angle);
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::qm::Psi4Log;
    use std::fs;

    fn write_qm_job(root: &Path, angle: &str, theory: &str, energy: Option<f64>) {
        let dir = root.join(angle).join(theory);
        fs::create_dir_all(&dir).unwrap();
        let content = match energy {
            Some(e) => format!("Optimizer: converged\nFinal energy is {:.7}\n", e),
            None => "Optimizer: failed\n".to_string(),
        };
        fs::write(dir.join("output.dat"), content).unwrap();
    }

    #[test]
    fn angles_come_out_sorted_regardless_of_creation_order() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("scan");
        for angle in ["300", "0", "120", "60"] {
            write_qm_job(&root, angle, "mp2-631Gd", Some(-100.0));
        }
        fs::write(root.join("submit.sh"), "#!/bin/sh\n").unwrap();

        let layout = ScanLayout::with_theory(&root, "output.dat", "mp2-631Gd");
        let cache = tmp.path().join("summary-qm.dat");
        let series =
            catalog_scan::<Psi4Log>(&layout, &cache, CachePolicy::Refresh, &ProgressReporter::new())
                .unwrap();

        assert_eq!(series.angles(), vec![0.0, 60.0, 120.0, 300.0]);
        assert_eq!(series.angles().len(), series.energies().len());
    }

    #[test]
    fn missing_marker_keeps_the_slot_with_no_energy() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("scan");
        write_qm_job(&root, "0", "mp2-631Gd", Some(-100.0));
        write_qm_job(&root, "30", "mp2-631Gd", None);

        let layout = ScanLayout::with_theory(&root, "output.dat", "mp2-631Gd");
        let cache = tmp.path().join("summary-qm.dat");
        let series =
            catalog_scan::<Psi4Log>(&layout, &cache, CachePolicy::Refresh, &ProgressReporter::new())
                .unwrap();

        assert_eq!(series.energies(), vec![Some(-100.0), None]);
    }

    #[test]
    fn missing_result_file_skips_the_angle() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("scan");
        write_qm_job(&root, "0", "mp2-631Gd", Some(-100.0));
        fs::create_dir_all(root.join("30").join("mp2-631Gd")).unwrap();

        let layout = ScanLayout::with_theory(&root, "output.dat", "mp2-631Gd");
        let cache = tmp.path().join("summary-qm.dat");
        let series =
            catalog_scan::<Psi4Log>(&layout, &cache, CachePolicy::Refresh, &ProgressReporter::new())
                .unwrap();

        assert_eq!(series.angles(), vec![0.0]);
    }

    #[test]
    fn cataloguing_reports_one_event_per_angle_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("scan");
        write_qm_job(&root, "0", "mp2-631Gd", Some(-100.0));
        write_qm_job(&root, "30", "mp2-631Gd", Some(-99.9));
        fs::create_dir_all(root.join("60").join("mp2-631Gd")).unwrap();

        let events = std::sync::Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|p| {
            events.lock().unwrap().push(format!("{p:?}"));
        }));

        let layout = ScanLayout::with_theory(&root, "output.dat", "mp2-631Gd");
        let cache = tmp.path().join("summary-qm.dat");
        catalog_scan::<Psi4Log>(&layout, &cache, CachePolicy::Refresh, &reporter).unwrap();

        let events = events.lock().unwrap();
        assert_eq!(events[0], "CatalogStart { angle_count: 3 }");
        assert_eq!(
            events.iter().filter(|e| e.as_str() == "AngleCatalogued").count(),
            3,
            "skipped angles still advance the catalogue"
        );
        assert_eq!(events.last().unwrap(), "CatalogFinish");
    }

    #[test]
    fn reuse_policy_reads_cache_without_touching_sources() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("scan");
        write_qm_job(&root, "0", "mp2-631Gd", Some(-100.0));

        let layout = ScanLayout::with_theory(&root, "output.dat", "mp2-631Gd");
        let cache = tmp.path().join("summary-qm.dat");
        catalog_scan::<Psi4Log>(&layout, &cache, CachePolicy::Refresh, &ProgressReporter::new())
            .unwrap();

        // The sources are gone; only the cache can answer now.
        fs::remove_dir_all(&root).unwrap();
        let series =
            catalog_scan::<Psi4Log>(&layout, &cache, CachePolicy::Reuse, &ProgressReporter::new())
                .unwrap();

        assert_eq!(series.angles(), vec![0.0]);
        assert_eq!(series.energies(), vec![Some(-100.0)]);
    }

    #[test]
    fn refresh_policy_overwrites_a_stale_cache() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("scan");
        write_qm_job(&root, "0", "mp2-631Gd", Some(-100.0));

        let cache = tmp.path().join("summary-qm.dat");
        fs::write(&cache, "0\t-42.0\n").unwrap();

        let layout = ScanLayout::with_theory(&root, "output.dat", "mp2-631Gd");
        let series =
            catalog_scan::<Psi4Log>(&layout, &cache, CachePolicy::Refresh, &ProgressReporter::new())
                .unwrap();

        assert_eq!(series.energies(), vec![Some(-100.0)]);
    }
}
