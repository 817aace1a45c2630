//! Critical flexion angle search
//!
//! The corrected β curve is not monotonic in the flexion angle (it usually
//! falls to a minimum and rises again), so the search is a forward linear
//! scan from 0° that stops at the first crossing. Bisection would find an
//! arbitrary root, not the first one.

use serde::{Deserialize, Serialize};

use crate::analysis::impingement::{beta_at, corrected};
use crate::models::evaluation::CriticalAngle;
use crate::models::geometry::{FrontalTilt, JointGeometry};
use crate::{FlexionMode, ModelConfig, Result};

/// Round half away from zero to a number of decimals
pub fn round_to_decimals(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Number of scan candidates in [0, upper): ceil(upper / step)
fn candidate_count(mode: FlexionMode, config: &ModelConfig) -> usize {
    let count = (mode.domain_upper_deg() / config.scan_step_deg).ceil();
    count as usize
}

fn candidates(mode: FlexionMode, config: &ModelConfig) -> impl Iterator<Item = f64> {
    let step = config.scan_step_deg;
    (0..candidate_count(mode, config)).map(move |i| i as f64 * step)
}

/// Smallest scanned flexion angle at which β + AV drops to the conflict
/// threshold.
///
/// Any geometric failure at a candidate aborts the scan.
pub fn critical_angle(
    geometry: &JointGeometry,
    tilt: FrontalTilt,
    av_deg: f64,
    mode: FlexionMode,
    config: &ModelConfig,
) -> Result<CriticalAngle> {
    config.validate()?;
    let decimals = config.reported_decimals();

    for flexion_deg in candidates(mode, config) {
        let beta = beta_at(geometry, tilt, flexion_deg)?;
        if corrected(beta, av_deg) <= config.beta_conflict_deg {
            let angle_deg = round_to_decimals(flexion_deg, decimals);
            tracing::debug!(
                %mode,
                gamma_deg = tilt.gamma_deg,
                av_deg,
                angle_deg,
                "critical flexion found"
            );
            return Ok(CriticalAngle::Found { angle_deg });
        }
    }

    tracing::debug!(%mode, gamma_deg = tilt.gamma_deg, av_deg, "no impingement in scanned domain");
    Ok(CriticalAngle::NotFound)
}

/// One point of the scanned corrected-β curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileSample {
    pub flexion_deg: f64,
    pub beta_deg: f64,
    pub corrected_beta_deg: f64,
}

/// Every candidate of the scan with its β, without stopping at the crossing
pub fn corrected_beta_profile(
    geometry: &JointGeometry,
    tilt: FrontalTilt,
    av_deg: f64,
    mode: FlexionMode,
    config: &ModelConfig,
) -> Result<Vec<ProfileSample>> {
    config.validate()?;
    let decimals = config.reported_decimals();

    candidates(mode, config)
        .map(|flexion_deg| {
            let beta_deg = beta_at(geometry, tilt, flexion_deg)?;
            Ok(ProfileSample {
                flexion_deg: round_to_decimals(flexion_deg, decimals),
                beta_deg,
                corrected_beta_deg: corrected(beta_deg, av_deg),
            })
        })
        .collect()
}
