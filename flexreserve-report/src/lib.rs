//! Flexion reserve reports
//!
//! Turns an [`flexreserve_core::Assessment`] into a clinical report in French
//! or English, exported as JSON, YAML, CSV, Markdown or printable HTML.

#![warn(clippy::all, clippy::pedantic)]

pub mod exporter;
pub mod labels;
pub mod report;

// Re-export main types for convenience
pub use exporter::ReportExporter;
pub use labels::{Labels, Language};
pub use report::ClinicalReport;

/// Result type for report operations
pub type Result<T> = std::result::Result<T, flexreserve_core::Error>;
