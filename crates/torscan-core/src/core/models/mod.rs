pub mod restraint;
pub mod scan;
