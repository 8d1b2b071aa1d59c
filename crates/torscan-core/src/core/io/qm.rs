use crate::core::io::traits::{ExtractError, FinalEnergyLog, parse_energy_token};
use std::io::BufRead;

/// Psi4 geometry-optimization output.
///
/// The optimizer reports its result on a line containing `Final energy`,
/// with the value in Hartree as the 4th whitespace-delimited token
/// (`Final energy is  -100.123456`). The first such line wins.
pub struct Psi4Log;

const MARKER: &str = "Final energy";
const ENERGY_COLUMN: usize = 3;

impl FinalEnergyLog for Psi4Log {
    fn read_final_energy(reader: &mut impl BufRead) -> Result<Option<f64>, ExtractError> {
        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            if line.contains(MARKER) {
                let energy = parse_energy_token(&line, line_num + 1, ENERGY_COLUMN)?;
                return Ok(Some(energy));
            }
        }
        Ok(None)
    }
}
