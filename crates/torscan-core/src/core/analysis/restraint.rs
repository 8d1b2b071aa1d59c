use crate::core::models::restraint::RestraintRecord;

// A first angle within this many degrees of the 0/360 boundary is treated
// as continuous with a reference of zero and left alone.
const BOUNDARY_TOLERANCE_DEG: f64 = 5.0;

/// Restraint correction for one scan: the normalized actual angles and the
/// harmonic penalty energy that held each of them in place.
#[derive(Debug, Clone, PartialEq)]
pub struct RestraintProfile {
    pub actual_angles: Vec<f64>,
    pub energies: Vec<f64>,
}

impl RestraintProfile {
    pub fn len(&self) -> usize {
        self.energies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energies.is_empty()
    }
}

/// Computes the harmonic restraint energy `E = k·(actual − reference)²`
/// for every angle of a scan, after normalizing the measured angles.
///
/// Normalization wraps negative angles into the positive range
/// (`−10 → 350`). The first angle of the scan then gets a continuity
/// correction: if its circular distance from 0° exceeds 5°, it is shifted
/// down by a full turn so the scan starts continuous with its reference
/// instead of wrapped (`300 → −60`, while `358` stays put).
pub fn restraint_profile(records: &[RestraintRecord], force_constant: f64) -> RestraintProfile {
    let actual_angles = normalize_actual_angles(records.iter().map(|r| r.actual));
    let energies = actual_angles
        .iter()
        .zip(records)
        .map(|(&actual, record)| force_constant * (actual - record.reference).powi(2))
        .collect();

    RestraintProfile {
        actual_angles,
        energies,
    }
}

fn normalize_actual_angles(actuals: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut angles: Vec<f64> = actuals
        .map(|a| if a < 0.0 { a + 360.0 } else { a })
        .collect();

    if let Some(first) = angles.first_mut()
        && circular_distance_from_zero(*first) > BOUNDARY_TOLERANCE_DEG
    {
        *first -= 360.0;
    }
    angles
}

fn circular_distance_from_zero(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    wrapped.min(360.0 - wrapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn records(pairs: &[(f64, f64)]) -> Vec<RestraintRecord> {
        pairs
            .iter()
            .map(|&(reference, actual)| RestraintRecord::new(reference, actual))
            .collect()
    }

    #[test]
    fn negative_angles_wrap_into_positive_range() {
        let profile = restraint_profile(&records(&[(0.0, 2.0), (350.0, -10.0)]), 1.0);
        assert_eq!(profile.actual_angles[1], 350.0);
    }

    #[test]
    fn first_angle_near_the_boundary_is_not_shifted() {
        let profile = restraint_profile(&records(&[(0.0, 358.0), (5.0, 4.9)]), 1.0);
        assert_eq!(profile.actual_angles[0], 358.0);
    }

    #[test]
    fn first_angle_far_from_zero_is_unwrapped_by_a_full_turn() {
        let profile = restraint_profile(&records(&[(-60.0, 300.0), (-55.0, 304.8)]), 1.0);
        assert_eq!(profile.actual_angles[0], -60.0);
    }

    #[test]
    fn wrapped_negative_first_angle_unwraps_back() {
        // -10 wraps to 350, which is 10 degrees from the boundary, so the
        // continuity correction restores -10.
        let profile = restraint_profile(&records(&[(0.0, -10.0)]), 1.0);
        assert_eq!(profile.actual_angles[0], -10.0);
    }

    #[test]
    fn harmonic_energy_uses_corrected_actual_angles() {
        let profile = restraint_profile(&records(&[(0.0, 2.0), (5.0, 4.0)]), 300.0);
        assert_relative_eq!(profile.energies[0], 300.0 * 4.0);
        assert_relative_eq!(profile.energies[1], 300.0 * 1.0);
    }

    #[test]
    fn exact_match_costs_nothing() {
        let profile = restraint_profile(&records(&[(0.0, 0.0), (90.0, 90.0)]), 300.0);
        assert_eq!(profile.energies, vec![0.0, 0.0]);
    }
}
