//! Reserve margin and clinical interpretation

use crate::models::evaluation::{CriticalAngle, Interpretation};
use crate::ModelConfig;

/// Reserve margin: reported critical angle minus measured angle
pub fn reserve_margin(critical_angle_deg: f64, measured_angle_deg: f64) -> f64 {
    critical_angle_deg - measured_angle_deg
}

/// Map a scan result, reserve margin and corrected β to an interpretation.
///
/// Rules are checked in order and the first match wins; a negative margin
/// with a high corrected β is still `Exceeded`.
pub fn classify(
    critical: CriticalAngle,
    reserve_margin_deg: f64,
    corrected_beta_deg: f64,
    config: &ModelConfig,
) -> Interpretation {
    if !critical.is_found() {
        Interpretation::InfiniteReserve
    } else if reserve_margin_deg < 0.0 {
        Interpretation::Exceeded
    } else if corrected_beta_deg >= config.beta_conflict_deg {
        Interpretation::Reached
    } else if reserve_margin_deg < config.limited_reserve_deg {
        Interpretation::Limited
    } else {
        Interpretation::Sufficient
    }
}
