//! Constants module for the flexion reserve core
//!
//! Clinical thresholds, scan domains and the conventional ranges used to
//! flag unusual input parameters.

pub mod clinical_thresholds;

pub use clinical_thresholds::ClinicalThresholds;
