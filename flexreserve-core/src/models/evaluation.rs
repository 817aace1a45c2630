//! Input/output contract of a single flexion reserve evaluation

use serde::{Deserialize, Serialize};

use crate::analysis::solver::round_to_decimals;
use crate::models::geometry::{FrontalTilt, JointGeometry};
use crate::{Error, FlexionMode, ModelConfig, Result};

/// Clinical parameters of one evaluation request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationInput {
    pub ccd_deg: f64,
    pub tf_deg: f64,
    pub offset_mm: f64,
    /// Frontal tilt: positive abduction, negative adduction
    pub gamma_deg: f64,
    /// Cup anteversion
    pub anteversion_deg: f64,
    pub version_standing_deg: f64,
    pub version_sitting_deg: f64,
    /// Measured hip flexion, required in hip mode
    pub alpha_measured_deg: Option<f64>,
    pub mode: FlexionMode,
}

impl Default for EvaluationInput {
    fn default() -> Self {
        Self {
            ccd_deg: 130.0,
            tf_deg: 20.0,
            offset_mm: 40.0,
            gamma_deg: 0.0,
            anteversion_deg: 25.0,
            version_standing_deg: 15.0,
            version_sitting_deg: 35.0,
            alpha_measured_deg: Some(90.0),
            mode: FlexionMode::Pelvic,
        }
    }
}

impl EvaluationInput {
    pub fn geometry(&self) -> Result<JointGeometry> {
        JointGeometry::new(self.ccd_deg, self.tf_deg, self.offset_mm)
    }

    pub const fn tilt(&self) -> FrontalTilt {
        FrontalTilt::new(self.gamma_deg)
    }

    /// Copy of this input with another mode
    pub fn with_mode(mut self, mode: FlexionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Copy of this input with another frontal tilt
    pub fn with_gamma(mut self, gamma_deg: f64) -> Self {
        self.gamma_deg = gamma_deg;
        self
    }

    /// Pelvic mobility (sitting − standing version) or measured hip flexion
    pub fn measured_angle_deg(&self) -> Result<f64> {
        match self.mode {
            FlexionMode::Pelvic => Ok(self.version_sitting_deg - self.version_standing_deg),
            FlexionMode::Hip => self.alpha_measured_deg.ok_or_else(|| {
                Error::InvalidInput("alpha_measured_deg is required in hip mode".to_string())
            }),
        }
    }

    /// Reject non-finite scalars before any computation
    pub fn validate(&self) -> Result<()> {
        let scalars = [
            ("gamma_deg", self.gamma_deg),
            ("anteversion_deg", self.anteversion_deg),
            ("version_standing_deg", self.version_standing_deg),
            ("version_sitting_deg", self.version_sitting_deg),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(Error::InvalidInput(format!("{name} must be finite, got {value}")));
            }
        }
        if let Some(alpha) = self.alpha_measured_deg {
            if !alpha.is_finite() {
                return Err(Error::InvalidInput(format!(
                    "alpha_measured_deg must be finite, got {alpha}"
                )));
            }
        }
        self.geometry()?;
        self.measured_angle_deg()?;
        Ok(())
    }
}

/// Outcome of the critical-angle scan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CriticalAngle {
    /// First scanned angle at which the corrected β reaches the threshold
    Found { angle_deg: f64 },
    /// No impingement anywhere in the scanned domain
    NotFound,
}

impl CriticalAngle {
    pub const fn angle_deg(self) -> Option<f64> {
        match self {
            CriticalAngle::Found { angle_deg } => Some(angle_deg),
            CriticalAngle::NotFound => None,
        }
    }

    pub const fn is_found(self) -> bool {
        matches!(self, CriticalAngle::Found { .. })
    }

    /// Value reported for `NotFound`: the last candidate of the scan
    /// (89.9° pelvic, 129.9° hip with the default step)
    pub fn sentinel_deg(mode: FlexionMode, config: &ModelConfig) -> f64 {
        round_to_decimals(
            mode.domain_upper_deg() - config.scan_step_deg,
            config.reported_decimals(),
        )
    }

    /// Numeric value for tables and exports
    pub fn reported_deg(self, mode: FlexionMode, config: &ModelConfig) -> f64 {
        self.angle_deg()
            .unwrap_or_else(|| Self::sentinel_deg(mode, config))
    }

    pub const fn dislocation_risk(self) -> DislocationRisk {
        match self {
            CriticalAngle::Found { .. } => DislocationRisk::Limited,
            CriticalAngle::NotFound => DislocationRisk::None,
        }
    }
}

/// Clinical interpretation of a flexion reserve, in decreasing priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Interpretation {
    /// No impingement in the scanned domain
    InfiniteReserve,
    /// Measured motion already beyond the critical angle
    Exceeded,
    /// Corrected β at the measured angle is at or above the threshold
    Reached,
    /// No conflict, reserve below the limited-reserve margin
    Limited,
    /// No conflict, comfortable reserve
    Sufficient,
}

impl Interpretation {
    pub const ALL: [Interpretation; 5] = [
        Interpretation::InfiniteReserve,
        Interpretation::Exceeded,
        Interpretation::Reached,
        Interpretation::Limited,
        Interpretation::Sufficient,
    ];

    pub const fn is_conflict(self) -> bool {
        matches!(self, Interpretation::Exceeded | Interpretation::Reached)
    }

    pub const fn code(self) -> &'static str {
        match self {
            Interpretation::InfiniteReserve => "INFINITE_RESERVE",
            Interpretation::Exceeded => "EXCEEDED",
            Interpretation::Reached => "REACHED",
            Interpretation::Limited => "LIMITED",
            Interpretation::Sufficient => "SUFFICIENT",
        }
    }
}

impl std::fmt::Display for Interpretation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Interpretation::InfiniteReserve => "No conflict — infinite reserve",
            Interpretation::Exceeded => "Conflict — critical flexion exceeded",
            Interpretation::Reached => "Conflict — critical flexion reached",
            Interpretation::Limited => "No conflict — limited reserve",
            Interpretation::Sufficient => "No conflict — sufficient reserve",
        };
        write!(f, "{}", label)
    }
}

/// Dislocation risk summary shown for hip flexion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DislocationRisk {
    None,
    Limited,
}

/// Result of a single evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationOutput {
    pub mode: FlexionMode,
    pub gamma_deg: f64,
    pub measured_angle_deg: f64,
    pub critical_angle: CriticalAngle,
    /// Critical angle as reported, the sentinel when nothing was found
    pub critical_angle_deg: f64,
    pub reserve_margin_deg: f64,
    pub corrected_beta_deg: f64,
    pub interpretation: Interpretation,
}

impl EvaluationOutput {
    /// True when no impingement exists in range; the margin is then
    /// measured against the sentinel and carries no clinical meaning
    pub const fn has_infinite_reserve(&self) -> bool {
        !self.critical_angle.is_found()
    }

    pub const fn dislocation_risk(&self) -> DislocationRisk {
        self.critical_angle.dislocation_risk()
    }
}
