//! Clinical thresholds and conventional parameter ranges
//!
//! The thresholds are the defaults of `ModelConfig`; the conventional ranges
//! only drive warnings, the model itself accepts any finite value.

use serde::{Deserialize, Serialize};

/// Default thresholds and domains of the flexion reserve model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClinicalThresholds;

impl ClinicalThresholds {
    /// Corrected β at or below which the neck impinges on the cup rim
    pub const BETA_CONFLICT_DEG: f64 = 10.0;
    /// Reserve under which a conflict-free case is only "limited"
    pub const LIMITED_RESERVE_DEG: f64 = 5.0;
    /// Resolution of the critical-angle scan
    pub const SCAN_STEP_DEG: f64 = 0.1;
    /// Finest scan resolution accepted from a configuration
    pub const MIN_SCAN_STEP_DEG: f64 = 0.001;
    /// Decimals a scan step may carry; candidates are reported with as many
    pub const MAX_STEP_DECIMALS: i32 = 6;

    /// Exclusive upper bound of the pelvic flexion scan (δ)
    pub const PELVIC_FLEXION_LIMIT_DEG: f64 = 90.0;
    /// Exclusive upper bound of the hip flexion scan (α)
    pub const HIP_FLEXION_LIMIT_DEG: f64 = 130.0;

    /// Conventional frontal tilt range (adduction negative, abduction positive)
    pub const GAMMA_RANGE_DEG: (f64, f64) = (-45.0, 45.0);
    /// Physiological femoral torsion range
    pub const TORSION_RANGE_DEG: (f64, f64) = (-30.0, 30.0);
    /// Conventional cup anteversion range
    pub const ANTEVERSION_RANGE_DEG: (f64, f64) = (0.0, 60.0);

    /// Smallest |sin(ccd)| for which the neck length is considered defined
    pub const GEOMETRY_EPSILON: f64 = 1e-9;

    /// Whether a value lies inside an inclusive conventional range
    pub fn within(range: (f64, f64), value: f64) -> bool {
        value >= range.0 && value <= range.1
    }

    /// Names of the parameters that fall outside their conventional range
    pub fn unconventional_parameters(gamma_deg: f64, tf_deg: f64, av_deg: f64) -> Vec<&'static str> {
        let mut flagged = Vec::new();
        if !Self::within(Self::GAMMA_RANGE_DEG, gamma_deg) {
            flagged.push("gamma_deg");
        }
        if !Self::within(Self::TORSION_RANGE_DEG, tf_deg) {
            flagged.push("tf_deg");
        }
        if !Self::within(Self::ANTEVERSION_RANGE_DEG, av_deg) {
            flagged.push("anteversion_deg");
        }
        flagged
    }
}
