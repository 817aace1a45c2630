//! Flexion reserve analysis
//!
//! Data flows strictly upward through these modules: clinical parameters →
//! neck vector → impingement angle → critical angle → reserve and
//! classification.

pub mod classifier;
pub mod impingement;
pub mod neck_axis;
pub mod pipeline;
pub mod solver;
