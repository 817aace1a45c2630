//! Report wording in French and English

use flexreserve_core::{DislocationRisk, FlexionMode, Interpretation};
use serde::{Deserialize, Serialize};

/// Language a report is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Language {
    #[default]
    #[cfg_attr(feature = "clap", value(name = "fr"))]
    French,
    #[cfg_attr(feature = "clap", value(name = "en"))]
    English,
}

impl Language {
    pub const fn labels(self) -> &'static Labels {
        match self {
            Language::French => &FRENCH,
            Language::English => &ENGLISH,
        }
    }

    /// Value for the HTML `lang` attribute
    pub const fn code(self) -> &'static str {
        match self {
            Language::French => "fr",
            Language::English => "en",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fr" | "french" | "français" | "francais" => Ok(Language::French),
            "en" | "english" | "anglais" => Ok(Language::English),
            _ => Err(format!("Invalid language: '{s}'. Valid options: fr, en")),
        }
    }
}

/// Every user-facing string of a report
#[derive(Debug)]
pub struct Labels {
    pub title: &'static str,
    pub patient_name: &'static str,
    pub generated_at: &'static str,
    pub parameters: &'static str,
    pub parameter: &'static str,
    pub value: &'static str,
    pub ccd: &'static str,
    pub tf: &'static str,
    pub offset: &'static str,
    pub gamma: &'static str,
    pub anteversion: &'static str,
    pub version_standing: &'static str,
    pub version_sitting: &'static str,
    pub condition: &'static str,
    pub mobility: &'static str,
    pub critical_pelvic: &'static str,
    pub alpha_measured: &'static str,
    pub critical_hip: &'static str,
    pub reserve: &'static str,
    pub beta: &'static str,
    pub interpretation: &'static str,
    pub dislocation_risk: &'static str,
    pub results_pelvic: &'static str,
    pub results_hip: &'static str,
    pub without_gamma: &'static str,
    with_gamma_prefix: &'static str,
    pub risk_none: &'static str,
    pub risk_limited: &'static str,
    pub infinite_reserve: &'static str,
    pub exceeded: &'static str,
    pub reached: &'static str,
    pub limited: &'static str,
    pub sufficient: &'static str,
    warning_head: &'static str,
    warning_tail: &'static str,
}

pub static FRENCH: Labels = Labels {
    title: "Analyse clinique de la réserve de flexion",
    patient_name: "Nom du patient",
    generated_at: "Date du rapport",
    parameters: "Paramètres",
    parameter: "Paramètre",
    value: "Valeur",
    ccd: "Angle CCD (°)",
    tf: "Torsion fémorale (TF °)",
    offset: "Offset fémoral (mm)",
    gamma: "Abduction/adduction (γ °)",
    anteversion: "Antéversion cotyle (AV °)",
    version_standing: "Version debout (°)",
    version_sitting: "Version assis (°)",
    condition: "Condition",
    mobility: "Mobilité pelvienne (°)",
    critical_pelvic: "Flexion maximale tolérée (°)",
    alpha_measured: "Flexion de hanche mesurée (°)",
    critical_hip: "Flexion maximale théorique avant conflit (°)",
    reserve: "Réserve de flexion (°)",
    beta: "Inclinaison col fémoral (°)",
    interpretation: "Interprétation",
    dislocation_risk: "Risque de luxation",
    results_pelvic: "Résultats flexion pelvienne",
    results_hip: "Résultats flexion jambe",
    without_gamma: "Sans adduction/abduction (γ = 0°)",
    with_gamma_prefix: "Avec adduction/abduction",
    risk_none: "Pas de risque de luxation : réserve infinie",
    risk_limited: "Risque de luxation : réserve limitée",
    infinite_reserve: "Pas de conflit : réserve infinie",
    exceeded: "Conflit : flexion critique dépassée",
    reached: "Conflit : flexion critique atteinte",
    limited: "Pas de conflit : réserve limitée",
    sufficient: "Pas de conflit : réserve suffisante",
    warning_head: "⚠️ **Attention clinique** : une flexion maximale tolérée égale à",
    warning_tail: "signifie qu'aucun conflit n'est détecté sur toute la plage analysée. \
        La réserve est alors considérée comme infinie : la flexion est libre et \
        il n'existe aucune limite fonctionnelle.",
};

pub static ENGLISH: Labels = Labels {
    title: "Clinical analysis of flexion reserve",
    patient_name: "Patient name",
    generated_at: "Report date",
    parameters: "Parameters",
    parameter: "Parameter",
    value: "Value",
    ccd: "CCD angle (°)",
    tf: "Femoral torsion (TF °)",
    offset: "Femoral offset (mm)",
    gamma: "Abduction/adduction (γ °)",
    anteversion: "Cup anteversion (AV °)",
    version_standing: "Standing version (°)",
    version_sitting: "Sitting version (°)",
    condition: "Condition",
    mobility: "Pelvic mobility (°)",
    critical_pelvic: "Max tolerated pelvic flexion (°)",
    alpha_measured: "Measured hip flexion (°)",
    critical_hip: "Maximum theoretical flexion before impingement (°)",
    reserve: "Flexion reserve (°)",
    beta: "Femoral neck inclination (°)",
    interpretation: "Interpretation",
    dislocation_risk: "Dislocation risk",
    results_pelvic: "Pelvic flexion results",
    results_hip: "Leg flexion results",
    without_gamma: "Without adduction/abduction (γ = 0°)",
    with_gamma_prefix: "With adduction/abduction",
    risk_none: "No dislocation risk: infinite reserve",
    risk_limited: "Dislocation risk: limited reserve",
    infinite_reserve: "No conflict: infinite reserve",
    exceeded: "Conflict: critical flexion exceeded",
    reached: "Conflict: critical flexion reached",
    limited: "No conflict: limited reserve",
    sufficient: "No conflict: sufficient reserve",
    warning_head: "⚠️ **Clinical warning**: a maximum tolerated flexion equal to",
    warning_tail: "means that no conflict is detected anywhere in the scanned range. \
        The flexion reserve is then considered infinite: flexion is free and \
        there is no functional limitation.",
};

impl Labels {
    pub const fn interpretation_label(&self, interpretation: Interpretation) -> &'static str {
        match interpretation {
            Interpretation::InfiniteReserve => self.infinite_reserve,
            Interpretation::Exceeded => self.exceeded,
            Interpretation::Reached => self.reached,
            Interpretation::Limited => self.limited,
            Interpretation::Sufficient => self.sufficient,
        }
    }

    pub const fn risk_label(&self, risk: DislocationRisk) -> &'static str {
        match risk {
            DislocationRisk::None => self.risk_none,
            DislocationRisk::Limited => self.risk_limited,
        }
    }

    pub const fn critical(&self, mode: FlexionMode) -> &'static str {
        match mode {
            FlexionMode::Pelvic => self.critical_pelvic,
            FlexionMode::Hip => self.critical_hip,
        }
    }

    pub const fn measured(&self, mode: FlexionMode) -> &'static str {
        match mode {
            FlexionMode::Pelvic => self.mobility,
            FlexionMode::Hip => self.alpha_measured,
        }
    }

    /// Condition of a scenario: neutral or with the patient's γ
    pub fn condition_for(&self, gamma_deg: f64) -> String {
        if gamma_deg == 0.0 {
            self.without_gamma.to_string()
        } else {
            format!("{} (γ = {gamma_deg:.1}°)", self.with_gamma_prefix)
        }
    }

    /// Clinical warning about critical angles reported at the end of the scan
    pub fn infinite_reserve_warning(&self, sentinels_deg: &[f64]) -> String {
        let values = sentinels_deg
            .iter()
            .map(|value| format!("{value}°"))
            .collect::<Vec<_>>()
            .join(" / ");
        format!("{} {values} {}", self.warning_head, self.warning_tail)
    }
}
