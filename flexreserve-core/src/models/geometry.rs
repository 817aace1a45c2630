//! Femoral geometry, frontal tilt and the derived neck vector

use serde::{Deserialize, Serialize};

use crate::constants::ClinicalThresholds;
use crate::{Error, Result};

/// Femoral geometry of the operated hip
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointGeometry {
    /// Neck-shaft (CCD) angle in degrees
    pub ccd_deg: f64,
    /// Femoral torsion in degrees
    pub tf_deg: f64,
    /// Femoral offset in millimetres
    pub offset_mm: f64,
}

impl JointGeometry {
    /// Build a validated geometry.
    ///
    /// Fails with [`Error::InvalidGeometry`] when a value is not finite, the
    /// offset is not positive, or sin(ccd) vanishes (CCD of 0° or 180°).
    pub fn new(ccd_deg: f64, tf_deg: f64, offset_mm: f64) -> Result<Self> {
        let geometry = Self { ccd_deg, tf_deg, offset_mm };
        geometry.validate()?;
        Ok(geometry)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| Error::InvalidGeometry {
            ccd_deg: self.ccd_deg,
            offset_mm: self.offset_mm,
            reason: reason.to_string(),
        };

        if !self.ccd_deg.is_finite() || !self.tf_deg.is_finite() || !self.offset_mm.is_finite() {
            return Err(invalid("geometry values must be finite"));
        }
        if self.offset_mm <= 0.0 {
            return Err(invalid("offset must be positive"));
        }
        if self.ccd_deg.to_radians().sin().abs() < ClinicalThresholds::GEOMETRY_EPSILON {
            return Err(invalid("sin(ccd) is zero, neck length undefined"));
        }
        Ok(())
    }
}

/// Frontal-plane tilt γ: positive is abduction, negative is adduction
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrontalTilt {
    pub gamma_deg: f64,
}

impl FrontalTilt {
    pub const NEUTRAL: Self = Self { gamma_deg: 0.0 };

    pub const fn new(gamma_deg: f64) -> Self {
        Self { gamma_deg }
    }

    /// Combine separate abduction and adduction amounts (both non-negative)
    pub fn from_abduction_adduction(abduction_deg: f64, adduction_deg: f64) -> Self {
        Self::new(abduction_deg - adduction_deg)
    }

    pub fn is_abduction(self) -> bool {
        self.gamma_deg > 0.0
    }

    pub fn is_adduction(self) -> bool {
        self.gamma_deg < 0.0
    }

    pub fn is_conventional(self) -> bool {
        ClinicalThresholds::within(ClinicalThresholds::GAMMA_RANGE_DEG, self.gamma_deg)
    }
}

impl From<f64> for FrontalTilt {
    fn from(gamma_deg: f64) -> Self {
        Self::new(gamma_deg)
    }
}

/// Femoral neck axis scaled by the estimated neck length
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeckVector {
    pub ux: f64,
    pub uy: f64,
    pub uz: f64,
}

impl NeckVector {
    pub fn is_finite(&self) -> bool {
        self.ux.is_finite() && self.uy.is_finite() && self.uz.is_finite()
    }

    pub fn norm(&self) -> f64 {
        (self.ux * self.ux + self.uy * self.uy + self.uz * self.uz).sqrt()
    }
}
