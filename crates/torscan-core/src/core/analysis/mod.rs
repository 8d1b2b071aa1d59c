pub mod relative;
pub mod restraint;
