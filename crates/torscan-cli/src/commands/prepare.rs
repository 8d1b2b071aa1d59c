use crate::cli::PrepareArgs;
use crate::error::Result;
use crate::toolkit::ProcessToolkit;
use torscan::workflows::prepare::{self, PrepareConfig, QmJobSpec};
use tracing::info;

pub fn run(args: PrepareArgs) -> Result<()> {
    let toolkit = ProcessToolkit::new(&args.toolkit);
    let config = PrepareConfig {
        input: args.input.clone(),
        output: args.output.clone(),
        qm_input_path: args.qm_input.clone(),
        job: QmJobSpec {
            molecule_name: args.name.clone(),
            method: args.method.clone(),
            basis: args.basis.clone(),
            task: args.task.clone(),
            memory: args.memory.clone(),
        },
    };

    info!(
        "Preparing conformers from {} via helper {}",
        args.input.display(),
        args.toolkit.display()
    );
    let count = prepare::run(&toolkit, &config)?;

    println!(
        "✓ {} molecule(s) optimized and written to: {}",
        count,
        args.output.display()
    );
    println!("✓ QM job input written to: {}", args.qm_input.display());
    Ok(())
}
