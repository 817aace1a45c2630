//! Flexion reserve core - hip impingement model
//!
//! This crate computes the flexion reserve of a hip after arthroplasty:
//! - `analysis::neck_axis` builds the femoral neck vector from joint angles
//! - `analysis::impingement` derives the impingement angle β from its projection
//! - `analysis::solver` scans pelvic or hip flexion for the critical angle
//! - `analysis::classifier` maps the reserve to a clinical interpretation
//! - `analysis::pipeline` chains them into a single evaluation
//!
//! Every evaluation is a pure function of its inputs.

#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
#![allow(
    clippy::multiple_crate_versions,
    clippy::module_name_repetitions,
)]

pub mod analysis;
pub mod constants;
pub mod models;

pub use analysis::{
    classifier::{classify, reserve_margin},
    impingement::{beta_at, corrected, impingement_angle},
    neck_axis::{neck_length_mm, neck_vector},
    pipeline::{assess, evaluate, Assessment, FlexionReserveEvaluator, GammaComparison},
    solver::{corrected_beta_profile, critical_angle, ProfileSample},
};
pub use constants::ClinicalThresholds;
pub use models::{
    evaluation::{CriticalAngle, DislocationRisk, EvaluationInput, EvaluationOutput, Interpretation},
    geometry::{FrontalTilt, JointGeometry, NeckVector},
};

/// Result type used throughout the flexion reserve core
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for flexion reserve evaluation
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Geometry for which the neck length is undefined
    #[error("Invalid geometry: {reason} (ccd={ccd_deg}°, offset={offset_mm} mm)")]
    InvalidGeometry {
        ccd_deg: f64,
        offset_mm: f64,
        reason: String,
    },

    /// Neck vector lies on the y-axis, β is undefined
    #[error("Degenerate projection: neck vector has no (x,z) component (ux={ux}, uz={uz})")]
    DegenerateProjection { ux: f64, uz: f64 },

    /// cos β fell outside [-1, 1]
    #[error("cos β out of domain: {cos_beta}")]
    OutOfDomainCosine { cos_beta: f64 },

    /// Clinical input rejected before evaluation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Report could not be rendered or serialized
    #[error("Report error: {0}")]
    Report(String),

    /// Utility error
    #[error("Utility error: {0}")]
    Util(#[from] flexreserve_utils::UtilError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which flexion parameter the critical-angle scan runs over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum FlexionMode {
    /// Pelvic (trunk) flexion δ, scanned over [0°, 90°)
    Pelvic,
    /// Hip (leg) flexion α, scanned over [0°, 130°)
    Hip,
}

impl FlexionMode {
    /// Exclusive upper bound of the scanned domain in degrees
    pub const fn domain_upper_deg(self) -> f64 {
        match self {
            FlexionMode::Pelvic => ClinicalThresholds::PELVIC_FLEXION_LIMIT_DEG,
            FlexionMode::Hip => ClinicalThresholds::HIP_FLEXION_LIMIT_DEG,
        }
    }

    /// Symbol used in clinical notation
    pub const fn symbol(self) -> &'static str {
        match self {
            FlexionMode::Pelvic => "δ",
            FlexionMode::Hip => "α",
        }
    }
}

impl std::fmt::Display for FlexionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlexionMode::Pelvic => write!(f, "pelvic"),
            FlexionMode::Hip => write!(f, "hip"),
        }
    }
}

impl std::str::FromStr for FlexionMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pelvic" | "pelvis" | "trunk" => Ok(FlexionMode::Pelvic),
            "hip" | "leg" => Ok(FlexionMode::Hip),
            _ => Err(format!("Invalid flexion mode: '{s}'. Valid options: pelvic, hip")),
        }
    }
}

/// Tunable parameters of the model.
///
/// Passed explicitly into the solver and the classifier so alternative
/// clinical thresholds can be tried without global state.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Corrected β at or below which impingement is predicted
    pub beta_conflict_deg: f64,
    /// Reserve below which a non-conflicting case is reported as limited
    pub limited_reserve_deg: f64,
    /// Resolution of the critical-angle scan
    pub scan_step_deg: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            beta_conflict_deg: ClinicalThresholds::BETA_CONFLICT_DEG,
            limited_reserve_deg: ClinicalThresholds::LIMITED_RESERVE_DEG,
            scan_step_deg: ClinicalThresholds::SCAN_STEP_DEG,
        }
    }
}

impl ModelConfig {
    /// Reject configurations the scan cannot run with
    pub fn validate(&self) -> Result<()> {
        if !self.beta_conflict_deg.is_finite() {
            return Err(Error::Config(format!(
                "beta_conflict_deg must be finite, got {}", self.beta_conflict_deg
            )));
        }
        if !self.limited_reserve_deg.is_finite() {
            return Err(Error::Config(format!(
                "limited_reserve_deg must be finite, got {}", self.limited_reserve_deg
            )));
        }
        if !self.scan_step_deg.is_finite() || self.scan_step_deg <= 0.0 {
            return Err(Error::Config(format!(
                "scan_step_deg must be a positive number, got {}", self.scan_step_deg
            )));
        }
        if self.scan_step_deg < ClinicalThresholds::MIN_SCAN_STEP_DEG {
            return Err(Error::Config(format!(
                "scan_step_deg {} is finer than the minimum {}",
                self.scan_step_deg,
                ClinicalThresholds::MIN_SCAN_STEP_DEG
            )));
        }
        if self.step_decimals().is_none() {
            return Err(Error::Config(format!(
                "scan_step_deg {} needs more than {} decimals",
                self.scan_step_deg,
                ClinicalThresholds::MAX_STEP_DECIMALS
            )));
        }
        if self.scan_step_deg >= ClinicalThresholds::PELVIC_FLEXION_LIMIT_DEG {
            return Err(Error::Config(format!(
                "scan_step_deg {} leaves nothing to scan", self.scan_step_deg
            )));
        }
        Ok(())
    }

    /// Load from a TOML/JSON/YAML file; missing keys keep their defaults
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let config: Self = flexreserve_utils::ConfigBuilder::new()
            .load_file(path)?
            .build();
        config.validate()?;
        Ok(config)
    }

    /// Number of decimals the reported critical angle is rounded to: the
    /// decimals of the step itself, so every reported value is a candidate
    pub fn reported_decimals(&self) -> i32 {
        self.step_decimals()
            .unwrap_or(ClinicalThresholds::MAX_STEP_DECIMALS)
    }

    /// Smallest d such that step·10^d is an integer (0.1 -> 1, 0.25 -> 2, 1.0 -> 0)
    fn step_decimals(&self) -> Option<i32> {
        (0..=ClinicalThresholds::MAX_STEP_DECIMALS).find(|&decimals| {
            let scaled = self.scan_step_deg * 10f64.powi(decimals);
            (scaled - scaled.round()).abs() <= 1e-9 * scaled.max(1.0)
        })
    }
}
