use crate::core::io::traits::{ExtractError, FinalEnergyLog, parse_energy_token};
use std::io::BufRead;

/// NAMD minimization log.
///
/// NAMD prints a fixed-format `ENERGY:` record every few steps; the most
/// recent record holds the converged result, so the file is scanned from
/// the end. The potential energy is the 14th whitespace-delimited token of
/// that record.
pub struct NamdLog;

const MARKER: &str = "ENERGY:";
const POTENTIAL_COLUMN: usize = 13;

impl FinalEnergyLog for NamdLog {
    fn read_final_energy(reader: &mut impl BufRead) -> Result<Option<f64>, ExtractError> {
        let lines: Vec<String> = reader.lines().collect::<Result<_, _>>()?;
        for (line_num, line) in lines.iter().enumerate().rev() {
            if line.starts_with(MARKER) {
                let energy = parse_energy_token(line, line_num + 1, POTENTIAL_COLUMN)?;
                return Ok(Some(energy));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn energy_record(step: u32, potential: f64) -> String {
        // Columns: ENERGY: TS BOND ANGLE DIHED IMPRP ELECT VDW BOUNDARY
        // MISC KINETIC TOTAL TEMP POTENTIAL TOTAL3 TEMPAVG
        format!(
            "ENERGY: {:>7} 1.0 2.0 3.0 4.0 5.0 6.0 7.0 8.0 9.0 10.0 11.0 {} 13.0 14.0\n",
            step, potential
        )
    }

    #[test]
    fn last_energy_record_wins() {
        let mut log = String::from("Info: NAMD 2.13 for Linux-x86_64\n");
        log.push_str(&energy_record(0, -1000.0));
        log.push_str("minimizing...\n");
        log.push_str(&energy_record(100, -1234.5678));

        let energy = NamdLog::read_final_energy(&mut Cursor::new(log)).unwrap();
        assert_eq!(energy, Some(-1234.5678));
    }

    #[test]
    fn marker_must_start_the_line() {
        let log = "note: ENERGY: 0 1 2 3 4 5 6 7 8 9 10 11 12 13 14\n";
        let energy = NamdLog::read_final_energy(&mut Cursor::new(log)).unwrap();
        assert_eq!(energy, None);
    }

    #[test]
    fn log_without_energy_record_yields_none() {
        let log = "Info: startup\nInfo: shutdown\n";
        let energy = NamdLog::read_final_energy(&mut Cursor::new(log)).unwrap();
        assert_eq!(energy, None);
    }
}
