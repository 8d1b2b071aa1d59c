/// One row of the minimization coordinate log: the reference dihedral angle
/// the restraint was centered on, and the angle actually measured after
/// minimization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestraintRecord {
    pub reference: f64,
    pub actual: f64,
}

impl RestraintRecord {
    pub fn new(reference: f64, actual: f64) -> Self {
        Self { reference, actual }
    }
}
