pub mod analysis;
pub mod catalog;
pub mod io;
pub mod models;
pub mod progress;
