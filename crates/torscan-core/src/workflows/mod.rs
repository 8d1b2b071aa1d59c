pub mod prepare;
pub mod scan;
