use crate::cli::ScanArgs;
use crate::config::PartialScanConfig;
use crate::error::{CliError, Result};
use crate::progress::CliProgressHandler;
use torscan::core::progress::ProgressReporter;
use torscan::workflows::scan::{self, MethodResult, ScanResult};
use tracing::info;

pub fn run(args: ScanArgs) -> Result<()> {
    let partial = match &args.config {
        Some(path) => PartialScanConfig::from_file(path)?,
        None => PartialScanConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let config = partial.merge_with_args(&args);

    if config.qm.is_none() && config.mm.is_none() {
        return Err(CliError::Argument(
            "nothing to do: give --qm-dir and/or --mm-dir (or a config file that sets them)"
                .to_string(),
        ));
    }

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.callback());

    info!("Invoking the scan-processing workflow...");
    let result = scan::run(&config, &reporter)?;

    if args.show {
        show_tables(&result);
    }
    summarize(&result, &config);
    Ok(())
}

fn show_tables(result: &ScanResult) {
    if let Some(qm) = &result.qm {
        print_profile("QM dihedral scan", qm);
    }
    if let Some(mm) = &result.mm {
        print_profile("MM dihedral scan", mm);
    }
}

fn print_profile(label: &str, result: &MethodResult) {
    println!("\n{label}");
    println!("{:>12}  {:>16}", "angle (deg)", "rel E (kcal/mol)");
    for (angle, rel) in result.profile.angles.iter().zip(&result.profile.relative) {
        println!("{:>12.1}  {:>16.3}", angle, rel);
    }
}

fn summarize(result: &ScanResult, config: &torscan::workflows::scan::ScanConfig) {
    for (name, method) in [("QM", &result.qm), ("MM", &result.mm)] {
        if let Some(method) = method {
            println!(
                "✓ {} scan: {} of {} angles catalogued with a final energy.",
                name,
                method.profile.angles.len(),
                method.series.len()
            );
        }
    }
    if config.save_figures {
        println!("✓ Figures written to {}", config.output_dir.display());
    }
}
