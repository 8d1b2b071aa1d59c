use crate::core::models::scan::ScanSeries;
use thiserror::Error;

/// Hartree to kcal/mol.
pub const HARTREE_TO_KCAL_MOL: f64 = 627.5095;

#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("No computed energies in the scan; nothing to take a minimum over")]
    NoComputedEnergies,
    #[error("Restraint profile has {restraints} entries but the scan has {points} points")]
    RestraintLengthMismatch { restraints: usize, points: usize },
}

/// A scan profiled relative to its own minimum.
///
/// `angles`, `energies`, and `relative` are parallel; points without a
/// computed energy are dropped before the minimum is taken. `energies`
/// holds the retained values in the scan's native unit (post restraint
/// subtraction, if any); `relative` is in the caller's target unit.
#[derive(Debug, Clone, PartialEq)]
pub struct RelativeProfile {
    pub angles: Vec<f64>,
    pub energies: Vec<f64>,
    pub relative: Vec<f64>,
    /// Index of each retained point in the source series, for callers that
    /// need to line the profile back up with per-point data.
    pub retained: Vec<usize>,
}

/// Converts raw scan energies to energies relative to the scan minimum,
/// scaling the deltas by `unit_factor` (use [`HARTREE_TO_KCAL_MOL`] for QM
/// scans, `1.0` for MM scans).
pub fn relative_energies(
    series: &ScanSeries,
    unit_factor: f64,
) -> Result<RelativeProfile, AnalysisError> {
    relative_energies_corrected(series, None, unit_factor)
}

/// Like [`relative_energies`], but first subtracts a per-angle restraint
/// energy (full scan length) from each computed energy.
pub fn relative_energies_corrected(
    series: &ScanSeries,
    restraint_energies: Option<&[f64]>,
    unit_factor: f64,
) -> Result<RelativeProfile, AnalysisError> {
    if let Some(restraints) = restraint_energies
        && restraints.len() != series.len()
    {
        return Err(AnalysisError::RestraintLengthMismatch {
            restraints: restraints.len(),
            points: series.len(),
        });
    }

    let mut angles = Vec::new();
    let mut energies = Vec::new();
    let mut retained = Vec::new();
    for (i, point) in series.iter().enumerate() {
        // Exact zero is the legacy missing-value sentinel of the summary
        // format and is filtered the same as an absent energy.
        let Some(energy) = point.energy.filter(|&e| e != 0.0) else {
            continue;
        };
        let corrected = match restraint_energies {
            Some(restraints) => energy - restraints[i],
            None => energy,
        };
        angles.push(point.angle);
        energies.push(corrected);
        retained.push(i);
    }

    let min = energies
        .iter()
        .copied()
        .min_by(f64::total_cmp)
        .ok_or(AnalysisError::NoComputedEnergies)?;

    let relative = energies.iter().map(|e| unit_factor * (e - min)).collect();
    Ok(RelativeProfile {
        angles,
        energies,
        relative,
        retained,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::scan::ScanPoint;
    use approx::assert_relative_eq;

    fn series(points: &[(f64, Option<f64>)]) -> ScanSeries {
        points
            .iter()
            .map(|&(angle, energy)| ScanPoint { angle, energy })
            .collect()
    }

    #[test]
    fn missing_and_zero_entries_are_dropped_before_the_minimum() {
        let series = series(&[
            (0.0, Some(-10.0)),
            (30.0, Some(-10.0)),
            (60.0, Some(-9.5)),
            (90.0, Some(0.0)),
        ]);

        let profile = relative_energies(&series, 1.0).unwrap();

        assert_eq!(profile.angles, vec![0.0, 30.0, 60.0]);
        assert_eq!(profile.relative, vec![0.0, 0.0, 0.5]);
        assert_eq!(profile.retained, vec![0, 1, 2]);
    }

    #[test]
    fn hartree_deltas_convert_to_kcal_per_mol() {
        let series = series(&[(0.0, Some(-100.0)), (30.0, Some(-100.001593))]);

        let profile = relative_energies(&series, HARTREE_TO_KCAL_MOL).unwrap();

        assert_relative_eq!(profile.relative[0], 1.0, epsilon = 1e-3);
        assert_relative_eq!(profile.relative[1], 0.0);
    }

    #[test]
    fn restraint_energies_are_subtracted_before_the_minimum() {
        let series = series(&[(0.0, Some(-10.0)), (30.0, Some(-9.0))]);
        let restraints = [0.0, 2.0];

        let profile = relative_energies_corrected(&series, Some(&restraints), 1.0).unwrap();

        // -9 - 2 = -11 becomes the minimum.
        assert_eq!(profile.energies, vec![-10.0, -11.0]);
        assert_eq!(profile.relative, vec![1.0, 0.0]);
    }

    #[test]
    fn restraint_profile_must_span_the_whole_scan() {
        let series = series(&[(0.0, Some(-10.0)), (30.0, Some(-9.0))]);
        let result = relative_energies_corrected(&series, Some(&[0.0]), 1.0);
        assert_eq!(
            result,
            Err(AnalysisError::RestraintLengthMismatch {
                restraints: 1,
                points: 2,
            })
        );
    }

    #[test]
    fn all_missing_is_an_error_not_a_panic() {
        let series = series(&[(0.0, None), (30.0, Some(0.0))]);
        let result = relative_energies(&series, 1.0);
        assert_eq!(result, Err(AnalysisError::NoComputedEnergies));
    }
}
