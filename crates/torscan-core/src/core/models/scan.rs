/// A single point of a dihedral scan.
///
/// The angle is the *reference* dihedral angle in degrees, taken from the
/// angle-encoding directory name of the originating job. `energy` is `None`
/// when the job's log never produced a final energy (crashed or unfinished
/// optimization); downstream analysis skips such points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanPoint {
    pub angle: f64,
    pub energy: Option<f64>,
}

/// An ordered series of scan points, sorted by ascending reference angle.
///
/// Sorting happens on construction, so the order of the underlying
/// filesystem listing never leaks into the series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanSeries {
    points: Vec<ScanPoint>,
}

impl ScanSeries {
    pub fn new(mut points: Vec<ScanPoint>) -> Self {
        points.sort_by(|a, b| a.angle.total_cmp(&b.angle));
        Self { points }
    }

    pub fn points(&self) -> &[ScanPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Reference angles, parallel to [`Self::energies`].
    pub fn angles(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.angle).collect()
    }

    /// Raw energies, parallel to [`Self::angles`].
    pub fn energies(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.energy).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScanPoint> {
        self.points.iter()
    }
}

impl FromIterator<ScanPoint> for ScanSeries {
    fn from_iter<T: IntoIterator<Item = ScanPoint>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
