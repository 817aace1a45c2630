//! Data models for the flexion reserve core
//!
//! Pure value types: patient geometry, the derived neck vector, and the
//! input/output contract of a single evaluation.

pub mod evaluation;
pub mod geometry;

pub use evaluation::{CriticalAngle, DislocationRisk, EvaluationInput, EvaluationOutput, Interpretation};
pub use geometry::{FrontalTilt, JointGeometry, NeckVector};
