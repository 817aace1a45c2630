//! Evaluation pipeline
//!
//! Chains neck axis → impingement angle → critical-angle scan → classifier
//! for one set of clinical parameters, and builds the with/without γ
//! comparison shown to clinicians.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::classifier::{classify, reserve_margin};
use crate::analysis::impingement::{beta_at, corrected};
use crate::analysis::solver::critical_angle;
use crate::constants::ClinicalThresholds;
use crate::models::evaluation::{EvaluationInput, EvaluationOutput};
use crate::{FlexionMode, ModelConfig, Result};

/// Evaluates flexion reserve with a fixed model configuration
#[derive(Debug, Clone, Default)]
pub struct FlexionReserveEvaluator {
    config: ModelConfig,
}

impl FlexionReserveEvaluator {
    pub fn new(config: ModelConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub const fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Run one evaluation; either every value is produced or the input is
    /// rejected with an error
    pub fn evaluate(&self, input: &EvaluationInput) -> Result<EvaluationOutput> {
        input.validate()?;
        let geometry = input.geometry()?;
        let tilt = input.tilt();
        let measured_angle_deg = input.measured_angle_deg()?;

        let flagged = ClinicalThresholds::unconventional_parameters(
            input.gamma_deg,
            input.tf_deg,
            input.anteversion_deg,
        );
        if !flagged.is_empty() {
            tracing::warn!(parameters = ?flagged, "parameters outside their conventional clinical range");
        }

        let critical = critical_angle(&geometry, tilt, input.anteversion_deg, input.mode, &self.config)?;
        let critical_angle_deg = critical.reported_deg(input.mode, &self.config);
        let reserve_margin_deg = reserve_margin(critical_angle_deg, measured_angle_deg);

        let beta = beta_at(&geometry, tilt, measured_angle_deg)?;
        let corrected_beta_deg = corrected(beta, input.anteversion_deg);

        let interpretation = classify(critical, reserve_margin_deg, corrected_beta_deg, &self.config);

        tracing::debug!(
            mode = %input.mode,
            measured_angle_deg,
            critical_angle_deg,
            reserve_margin_deg,
            corrected_beta_deg,
            interpretation = interpretation.code(),
            "evaluation complete"
        );

        Ok(EvaluationOutput {
            mode: input.mode,
            gamma_deg: input.gamma_deg,
            measured_angle_deg,
            critical_angle: critical,
            critical_angle_deg,
            reserve_margin_deg,
            corrected_beta_deg,
            interpretation,
        })
    }

    /// Pelvic and hip evaluations, each without γ and with the requested γ.
    ///
    /// Hip flexion is skipped when no measured α is given. The scenarios are
    /// independent and run in parallel.
    pub fn assess(&self, input: &EvaluationInput) -> Result<Assessment> {
        let mut modes = vec![FlexionMode::Pelvic];
        if input.alpha_measured_deg.is_some() {
            modes.push(FlexionMode::Hip);
        }

        let scenarios: Vec<EvaluationInput> = modes
            .iter()
            .flat_map(|&mode| {
                let base = input.with_mode(mode);
                [base.with_gamma(0.0), base]
            })
            .collect();

        let outputs = scenarios
            .into_par_iter()
            .map(|scenario| self.evaluate(&scenario))
            .collect::<Result<Vec<_>>>()?;

        let mut pairs = outputs.chunks_exact(2).map(|pair| GammaComparison {
            without_gamma: pair[0],
            with_gamma: pair[1],
        });

        let pelvic = pairs.next().ok_or_else(|| {
            crate::Error::InvalidInput("pelvic scenarios missing from assessment".to_string())
        })?;
        let hip = pairs.next();

        Ok(Assessment {
            gamma_deg: input.gamma_deg,
            pelvic,
            hip,
        })
    }
}

/// Same evaluation with γ = 0 and with the patient's γ
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GammaComparison {
    pub without_gamma: EvaluationOutput,
    pub with_gamma: EvaluationOutput,
}

impl GammaComparison {
    /// Change of the critical angle caused by the frontal tilt, when both
    /// scans found one
    pub fn critical_shift_deg(&self) -> Option<f64> {
        let with = self.with_gamma.critical_angle.angle_deg()?;
        let without = self.without_gamma.critical_angle.angle_deg()?;
        Some(with - without)
    }

    pub fn outputs(&self) -> [&EvaluationOutput; 2] {
        [&self.without_gamma, &self.with_gamma]
    }
}

/// Full clinical assessment of one patient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub gamma_deg: f64,
    /// Trunk (pelvic) flexion
    pub pelvic: GammaComparison,
    /// Leg (hip) flexion, absent without a measured α
    pub hip: Option<GammaComparison>,
}

impl Assessment {
    pub fn outputs(&self) -> impl Iterator<Item = &EvaluationOutput> {
        self.pelvic
            .outputs()
            .into_iter()
            .chain(self.hip.iter().flat_map(GammaComparison::outputs))
    }

    /// Whether any scenario found no impingement in range
    pub fn any_infinite_reserve(&self) -> bool {
        self.outputs().any(EvaluationOutput::has_infinite_reserve)
    }
}

/// Evaluate with the default model configuration
pub fn evaluate(input: &EvaluationInput) -> Result<EvaluationOutput> {
    FlexionReserveEvaluator::default().evaluate(input)
}

/// Assess with the default model configuration
pub fn assess(input: &EvaluationInput) -> Result<Assessment> {
    FlexionReserveEvaluator::default().assess(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluation::{CriticalAngle, DislocationRisk, Interpretation};
    use crate::Error;

    fn approx(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    #[test]
    fn test_reference_case_regression() {
        // standing 15, sitting 35, AV 25, TF 20, CCD 130, offset 40, γ 0
        let output = evaluate(&EvaluationInput::default()).unwrap();

        assert_eq!(output.measured_angle_deg, 20.0);
        assert_eq!(output.critical_angle, CriticalAngle::NotFound);
        assert_eq!(output.critical_angle_deg, 89.9);
        assert!(approx(output.reserve_margin_deg, 69.9, 1e-9));
        assert!(approx(output.corrected_beta_deg, 32.5512, 1e-3));
        assert_eq!(output.interpretation, Interpretation::InfiniteReserve);
        assert!(output.has_infinite_reserve());
    }

    #[test]
    fn test_reference_case_hip() {
        let input = EvaluationInput::default().with_mode(FlexionMode::Hip);
        let output = evaluate(&input).unwrap();

        assert_eq!(output.measured_angle_deg, 90.0);
        assert_eq!(output.critical_angle_deg, 129.9);
        assert!(approx(output.reserve_margin_deg, 39.9, 1e-9));
        assert!(approx(output.corrected_beta_deg, 65.0, 1e-3));
        assert_eq!(output.interpretation, Interpretation::InfiniteReserve);
        assert_eq!(output.dislocation_risk(), DislocationRisk::None);
    }

    #[test]
    fn test_reached_case() {
        // AV 5: critical 22.8°, margin 2.8°, corrected β at 20° ≈ 12.55°
        let input = EvaluationInput { anteversion_deg: 5.0, ..EvaluationInput::default() };
        let output = evaluate(&input).unwrap();

        assert_eq!(output.critical_angle, CriticalAngle::Found { angle_deg: 22.8 });
        assert!(approx(output.reserve_margin_deg, 2.8, 1e-9));
        assert!(approx(output.corrected_beta_deg, 12.5512, 1e-3));
        assert_eq!(output.interpretation, Interpretation::Reached);
    }

    #[test]
    fn test_exceeded_case() {
        // AV 0: critical 17.4° < measured 20°
        let input = EvaluationInput { anteversion_deg: 0.0, ..EvaluationInput::default() };
        let output = evaluate(&input).unwrap();

        assert_eq!(output.critical_angle_deg, 17.4);
        assert!(approx(output.reserve_margin_deg, -2.6, 1e-9));
        assert_eq!(output.interpretation, Interpretation::Exceeded);
    }

    #[test]
    fn test_limited_case() {
        // Measured exactly at the critical angle: margin 0, corrected β < 10
        let input = EvaluationInput {
            anteversion_deg: 0.0,
            version_standing_deg: 0.0,
            version_sitting_deg: 17.4,
            ..EvaluationInput::default()
        };
        let output = evaluate(&input).unwrap();

        assert_eq!(output.reserve_margin_deg, 0.0);
        assert!(output.corrected_beta_deg < 10.0);
        assert_eq!(output.interpretation, Interpretation::Limited);
    }

    #[test]
    fn test_conflict_before_crossing_with_custom_config() {
        // Below the first crossing the corrected β is still above the
        // threshold, so a positive margin alone does not mean no conflict
        let config = ModelConfig { beta_conflict_deg: 12.0, ..ModelConfig::default() };
        let evaluator = FlexionReserveEvaluator::new(config).unwrap();
        let input = EvaluationInput {
            anteversion_deg: 0.0,
            version_standing_deg: 0.0,
            version_sitting_deg: 5.0,
            ..EvaluationInput::default()
        };
        let output = evaluator.evaluate(&input).unwrap();

        assert!(output.critical_angle.is_found());
        assert!(output.reserve_margin_deg > 5.0);
        assert_eq!(output.interpretation, Interpretation::Reached);
    }

    #[test]
    fn test_invalid_inputs_rejected_before_classification() {
        let geometry = EvaluationInput { ccd_deg: 180.0, ..EvaluationInput::default() };
        assert!(matches!(evaluate(&geometry), Err(Error::InvalidGeometry { .. })));

        let hip_without_alpha = EvaluationInput {
            alpha_measured_deg: None,
            mode: FlexionMode::Hip,
            ..EvaluationInput::default()
        };
        assert!(matches!(evaluate(&hip_without_alpha), Err(Error::InvalidInput(_))));

        let nan_version = EvaluationInput { version_sitting_deg: f64::NAN, ..EvaluationInput::default() };
        assert!(matches!(evaluate(&nan_version), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ModelConfig { scan_step_deg: 0.0, ..ModelConfig::default() };
        assert!(matches!(FlexionReserveEvaluator::new(config), Err(Error::Config(_))));
    }

    #[test]
    fn test_assessment_structure() {
        let input = EvaluationInput {
            anteversion_deg: 0.0,
            gamma_deg: 10.0,
            ..EvaluationInput::default()
        };
        let assessment = assess(&input).unwrap();

        assert_eq!(assessment.pelvic.without_gamma.gamma_deg, 0.0);
        assert_eq!(assessment.pelvic.with_gamma.gamma_deg, 10.0);
        assert_eq!(assessment.pelvic.without_gamma.critical_angle_deg, 17.4);
        assert_eq!(assessment.pelvic.with_gamma.critical_angle_deg, 16.3);
        assert!(approx(assessment.pelvic.critical_shift_deg().unwrap(), -1.1, 1e-9));

        let hip = assessment.hip.unwrap();
        assert_eq!(hip.without_gamma.mode, FlexionMode::Hip);
        assert_eq!(hip.with_gamma.measured_angle_deg, 90.0);
        assert_eq!(assessment.outputs().count(), 4);
        assert!(!assessment.any_infinite_reserve());
    }

    #[test]
    fn test_assessment_matches_sequential_evaluation() {
        let input = EvaluationInput { gamma_deg: -15.0, anteversion_deg: 3.0, ..EvaluationInput::default() };
        let assessment = assess(&input).unwrap();

        let sequential = evaluate(&input).unwrap();
        assert_eq!(assessment.pelvic.with_gamma, sequential);
        let neutral = evaluate(&input.with_gamma(0.0)).unwrap();
        assert_eq!(assessment.pelvic.without_gamma, neutral);
    }

    #[test]
    fn test_assessment_without_alpha_skips_hip() {
        let input = EvaluationInput { alpha_measured_deg: None, ..EvaluationInput::default() };
        let assessment = assess(&input).unwrap();

        assert!(assessment.hip.is_none());
        assert_eq!(assessment.outputs().count(), 2);
        assert!(assessment.any_infinite_reserve());
    }
}
