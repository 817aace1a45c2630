//! Clinical report data

use chrono::{DateTime, Utc};
use flexreserve_core::{Assessment, EvaluationInput, EvaluationOutput, FlexionReserveEvaluator};
use serde::{Deserialize, Serialize};

use crate::labels::Language;
use crate::Result;

/// Assessment of one patient together with what is needed to present it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalReport {
    pub patient_name: String,
    pub generated_at: DateTime<Utc>,
    pub language: Language,
    pub input: EvaluationInput,
    pub assessment: Assessment,
}

impl ClinicalReport {
    pub fn new(
        patient_name: impl Into<String>,
        language: Language,
        input: EvaluationInput,
        assessment: Assessment,
    ) -> Self {
        Self {
            patient_name: patient_name.into(),
            generated_at: Utc::now(),
            language,
            input,
            assessment,
        }
    }

    /// Assess `input` and wrap the result in a report
    pub fn generate(
        patient_name: impl Into<String>,
        language: Language,
        input: &EvaluationInput,
        evaluator: &FlexionReserveEvaluator,
    ) -> Result<Self> {
        let assessment = evaluator.assess(input)?;
        Ok(Self::new(patient_name, language, *input, assessment))
    }

    /// Critical angles reported at the end of the scan, one per mode, in
    /// report order
    pub fn infinite_reserve_sentinels(&self) -> Vec<f64> {
        let mut sentinels: Vec<f64> = Vec::new();
        for output in self.assessment.outputs().filter(|o| o.has_infinite_reserve()) {
            if !sentinels.contains(&output.critical_angle_deg) {
                sentinels.push(output.critical_angle_deg);
            }
        }
        sentinels
    }

    /// Every scenario in report order: pelvic first, then hip
    pub fn outputs(&self) -> impl Iterator<Item = &EvaluationOutput> {
        self.assessment.outputs()
    }
}
