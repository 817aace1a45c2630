//! Femoral neck axis model
//!
//! Sign convention: θ = π − (ccd + γ), so abduction (γ > 0) opens the
//! effective neck-shaft angle. The same convention is used for pelvic and hip
//! flexion; flexion rotates the neck about the x axis, torsion tilts it
//! towards z.

use std::f64::consts::PI;

use crate::constants::ClinicalThresholds;
use crate::models::geometry::{FrontalTilt, JointGeometry, NeckVector};
use crate::{Error, Result};

/// Neck length estimated from offset and CCD angle: offset / sin(ccd)
pub fn neck_length_mm(geometry: &JointGeometry) -> Result<f64> {
    let sin_ccd = geometry.ccd_deg.to_radians().sin();
    if sin_ccd.abs() < ClinicalThresholds::GEOMETRY_EPSILON {
        return Err(Error::InvalidGeometry {
            ccd_deg: geometry.ccd_deg,
            offset_mm: geometry.offset_mm,
            reason: "sin(ccd) is zero, neck length undefined".to_string(),
        });
    }

    let length = geometry.offset_mm / sin_ccd;
    if !length.is_finite() {
        return Err(Error::InvalidGeometry {
            ccd_deg: geometry.ccd_deg,
            offset_mm: geometry.offset_mm,
            reason: format!("neck length is not finite ({length})"),
        });
    }
    Ok(length)
}

/// Femoral neck vector for a geometry, frontal tilt and flexion angle
pub fn neck_vector(geometry: &JointGeometry, tilt: FrontalTilt, flexion_deg: f64) -> Result<NeckVector> {
    let length = neck_length_mm(geometry)?;

    let theta = PI - (geometry.ccd_deg + tilt.gamma_deg).to_radians();
    let delta = flexion_deg.to_radians();
    let tf = geometry.tf_deg.to_radians();

    let ux = theta.sin() * length;
    let uy = (-delta.cos() * theta.cos() * length) - (delta.sin() * tf.sin() * length);
    let uz = (-delta.sin() * theta.cos() * length) + (delta.cos() * tf.sin() * length);

    Ok(NeckVector { ux, uy, uz })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(ccd: f64, tf: f64, offset: f64) -> JointGeometry {
        JointGeometry { ccd_deg: ccd, tf_deg: tf, offset_mm: offset }
    }

    #[test]
    fn test_finite_for_clinical_grid() {
        for ccd in [90.0, 130.0, 150.0] {
            for offset in [30.0, 40.0, 50.0] {
                let v = neck_vector(&geometry(ccd, 20.0, offset), FrontalTilt::NEUTRAL, 20.0).unwrap();
                assert!(v.is_finite(), "ccd={ccd} offset={offset} gave {v:?}");
            }
        }
    }

    #[test]
    fn test_neck_length() {
        let length = neck_length_mm(&geometry(90.0, 0.0, 40.0)).unwrap();
        assert!((length - 40.0).abs() < 1e-12);

        let length = neck_length_mm(&geometry(130.0, 20.0, 40.0)).unwrap();
        assert!((length - 40.0 / 130f64.to_radians().sin()).abs() < 1e-12);
    }

    #[test]
    fn test_undefined_neck_length_is_an_error() {
        // Bypasses JointGeometry::new on purpose
        for ccd in [0.0, 180.0] {
            let result = neck_vector(&geometry(ccd, 20.0, 40.0), FrontalTilt::NEUTRAL, 0.0);
            assert!(matches!(result, Err(Error::InvalidGeometry { .. })));
        }
    }

    #[test]
    fn test_zero_flexion_components() {
        // δ = 0: uy = −cos θ·L, uz = sin tf·L
        let g = geometry(130.0, 20.0, 40.0);
        let length = neck_length_mm(&g).unwrap();
        let v = neck_vector(&g, FrontalTilt::NEUTRAL, 0.0).unwrap();
        let theta = PI - 130f64.to_radians();

        assert!((v.ux - theta.sin() * length).abs() < 1e-12);
        assert!((v.uy + theta.cos() * length).abs() < 1e-12);
        assert!((v.uz - 20f64.to_radians().sin() * length).abs() < 1e-12);
    }

    #[test]
    fn test_gamma_adds_to_ccd() {
        // γ enters θ together with the CCD angle; only the length differs
        let tilted = neck_vector(&geometry(130.0, 20.0, 40.0), FrontalTilt::new(10.0), 30.0).unwrap();
        let wider = neck_vector(&geometry(140.0, 20.0, 40.0), FrontalTilt::NEUTRAL, 30.0).unwrap();
        let scale = neck_length_mm(&geometry(130.0, 20.0, 40.0)).unwrap()
            / neck_length_mm(&geometry(140.0, 20.0, 40.0)).unwrap();

        assert!((tilted.ux - wider.ux * scale).abs() < 1e-9);
        assert!((tilted.uy - wider.uy * scale).abs() < 1e-9);
        assert!((tilted.uz - wider.uz * scale).abs() < 1e-9);
    }

    #[test]
    fn test_flexion_preserves_norm() {
        // Flexion is a rotation in the (y,z) plane
        let g = geometry(130.0, 20.0, 40.0);
        let at_rest = neck_vector(&g, FrontalTilt::NEUTRAL, 0.0).unwrap();
        for flexion in [10.0, 45.0, 89.9, 120.0] {
            let flexed = neck_vector(&g, FrontalTilt::NEUTRAL, flexion).unwrap();
            assert!((flexed.norm() - at_rest.norm()).abs() < 1e-9);
            assert_eq!(flexed.ux, at_rest.ux);
        }
    }
}
