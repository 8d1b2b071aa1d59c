pub mod mm;
pub mod qm;
pub mod restraints;
pub mod summary;
pub mod traits;
