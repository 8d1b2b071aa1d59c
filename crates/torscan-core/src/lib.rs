//! # TorScan Core Library
//!
//! A library for extracting, normalizing, and visualizing energies from
//! computational-chemistry dihedral-angle scans, supporting Psi4-style logs
//! for the quantum-mechanics side and NAMD-style logs for the
//! molecular-mechanics side.
//!
//! ## Architectural Philosophy
//!
//! The library is split into three layers with a strict direction of
//! dependency, so that each piece stays independently testable.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`ScanSeries`,
//!   `RestraintRecord`), narrow per-tool log-line parsers (`io::qm`,
//!   `io::mm`), the angle-directory cataloguer, and the pure numeric
//!   transforms (`analysis::restraint`, `analysis::relative`).
//!
//! - **[`report`]: Presentation.** Scatter-figure rendering and the
//!   combined text report, fed only by already-analyzed series.
//!
//! - **[`workflows`]: The Public API.** Ties the layers together into the
//!   complete scan-processing and conformer-preparation procedures driven
//!   by explicit, immutable configuration objects.

pub mod core;
pub mod report;
pub mod workflows;
