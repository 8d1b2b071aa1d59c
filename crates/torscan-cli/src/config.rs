use crate::cli::ScanArgs;
use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use torscan::core::catalog::CachePolicy;
use torscan::workflows::scan::{MmScanConfig, QmScanConfig, ScanConfig};
use tracing::debug;

const DEFAULT_QM_FILE: &str = "output.dat";
const DEFAULT_THEORY: &str = "mp2-631Gd";
const DEFAULT_MM_FILE: &str = "minimize.log";

/// Scan settings as they appear in a TOML configuration file. Every field
/// is optional; command-line flags override whatever the file provides.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct PartialScanConfig {
    pub qm_dir: Option<PathBuf>,
    pub qm_file: Option<String>,
    pub theory: Option<String>,
    pub mm_dir: Option<PathBuf>,
    pub mm_file: Option<String>,
    pub force_constant: Option<f64>,
    pub output_dir: Option<PathBuf>,
}

impl PartialScanConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            CliError::Config(format!("Invalid TOML in '{}': {}", path.display(), e))
        })?;
        debug!("Loaded scan configuration from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Merges file values with command-line arguments into the final scan
    /// configuration. `--qm-only` / `--mm-only` silence the other method;
    /// no further cross-validation of flag combinations is done.
    pub fn merge_with_args(&self, args: &ScanArgs) -> ScanConfig {
        let qm_dir = args.qm_dir.clone().or_else(|| self.qm_dir.clone());
        let mm_dir = args.mm_dir.clone().or_else(|| self.mm_dir.clone());

        let qm = (!args.mm_only)
            .then_some(qm_dir)
            .flatten()
            .map(|root| QmScanConfig {
                root,
                filename: args
                    .qm_file
                    .clone()
                    .or_else(|| self.qm_file.clone())
                    .unwrap_or_else(|| DEFAULT_QM_FILE.to_string()),
                theory: args
                    .theory
                    .clone()
                    .or_else(|| self.theory.clone())
                    .unwrap_or_else(|| DEFAULT_THEORY.to_string()),
            });

        let mm = (!args.qm_only)
            .then_some(mm_dir)
            .flatten()
            .map(|root| MmScanConfig {
                root,
                filename: args
                    .mm_file
                    .clone()
                    .or_else(|| self.mm_file.clone())
                    .unwrap_or_else(|| DEFAULT_MM_FILE.to_string()),
                force_constant: args.force_constant.or(self.force_constant),
            });

        ScanConfig {
            qm,
            mm,
            output_dir: args
                .output_dir
                .clone()
                .or_else(|| self.output_dir.clone())
                .unwrap_or_else(|| PathBuf::from(".")),
            cache_policy: if args.force_refresh {
                CachePolicy::Refresh
            } else {
                CachePolicy::Reuse
            },
            save_figures: args.save,
            write_report: !args.no_report,
        }
    }
}
