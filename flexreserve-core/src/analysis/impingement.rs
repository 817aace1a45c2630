//! Impingement angle β from the neck vector's (x,z) projection

use crate::analysis::neck_axis::neck_vector;
use crate::models::geometry::{FrontalTilt, JointGeometry};
use crate::{Error, Result};

/// β in degrees: arccos(ux / |(ux, uz)|).
///
/// cos β is not clamped: a value outside [-1, 1] is reported as
/// [`Error::OutOfDomainCosine`].
pub fn impingement_angle(ux: f64, uz: f64) -> Result<f64> {
    let projected_norm = ux.hypot(uz);
    if projected_norm == 0.0 || !projected_norm.is_finite() {
        return Err(Error::DegenerateProjection { ux, uz });
    }

    let cos_beta = ux / projected_norm;
    if !(-1.0..=1.0).contains(&cos_beta) {
        return Err(Error::OutOfDomainCosine { cos_beta });
    }

    Ok(cos_beta.acos().to_degrees())
}

/// β corrected by the cup anteversion
pub fn corrected(beta_deg: f64, av_deg: f64) -> f64 {
    beta_deg + av_deg
}

/// β for a geometry, tilt and flexion angle
pub fn beta_at(geometry: &JointGeometry, tilt: FrontalTilt, flexion_deg: f64) -> Result<f64> {
    let v = neck_vector(geometry, tilt, flexion_deg)?;
    impingement_angle(v.ux, v.uz)
}
