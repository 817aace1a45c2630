//! Report export formats

use flexreserve_core::{Error, EvaluationOutput, FlexionMode, GammaComparison, ProfileSample};

use crate::labels::{Labels, Language};
use crate::report::ClinicalReport;
use crate::Result;

/// Exports clinical reports in various formats
pub struct ReportExporter;

impl ReportExporter {
    /// Export the report to JSON
    pub fn to_json(report: &ClinicalReport) -> Result<String> {
        serde_json::to_string_pretty(report).map_err(Error::Json)
    }

    /// Export the report to YAML
    pub fn to_yaml(report: &ClinicalReport) -> Result<String> {
        serde_yaml::to_string(report)
            .map_err(|e| Error::Report(format!("YAML serialization failed: {e}")))
    }

    /// One CSV row per pelvic scenario, headers in the report language
    pub fn to_csv(report: &ClinicalReport) -> String {
        let labels = report.language.labels();
        let mut csv = csv_line(&[
            labels.condition,
            labels.mobility,
            labels.critical_pelvic,
            labels.reserve,
            labels.beta,
            labels.interpretation,
            labels.patient_name,
        ]);

        for output in report.assessment.pelvic.outputs() {
            csv.push_str(&csv_line(&[
                &labels.condition_for(output.gamma_deg),
                &format!("{:.1}", output.measured_angle_deg),
                &format!("{:.1}", output.critical_angle_deg),
                &format!("{:.1}", output.reserve_margin_deg),
                &format!("{:.2}", output.corrected_beta_deg),
                labels.interpretation_label(output.interpretation),
                &report.patient_name,
            ]));
        }
        csv
    }

    /// Export the report to a Markdown document
    pub fn to_markdown(report: &ClinicalReport) -> String {
        let labels = report.language.labels();
        let input = &report.input;
        let mut markdown = String::new();

        markdown.push_str(&format!("# {}\n\n", labels.title));
        markdown.push_str(&format!(
            "**{}:** {}  \n",
            labels.patient_name,
            escape_markdown(&report.patient_name)
        ));
        markdown.push_str(&format!(
            "**{}:** {}\n\n",
            labels.generated_at,
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        markdown.push_str(&format!("## {}\n\n", labels.parameters));
        markdown.push_str(&format!("| {} | {} |\n", labels.parameter, labels.value));
        markdown.push_str("|---|---|\n");
        let mut parameters = vec![
            (labels.ccd, input.ccd_deg),
            (labels.tf, input.tf_deg),
            (labels.offset, input.offset_mm),
            (labels.gamma, input.gamma_deg),
            (labels.anteversion, input.anteversion_deg),
            (labels.version_standing, input.version_standing_deg),
            (labels.version_sitting, input.version_sitting_deg),
        ];
        if let Some(alpha) = input.alpha_measured_deg {
            parameters.push((labels.alpha_measured, alpha));
        }
        for (name, value) in parameters {
            markdown.push_str(&format!("| {name} | {value:.1} |\n"));
        }
        markdown.push('\n');

        push_pelvic_section(&mut markdown, labels, &report.assessment.pelvic);
        if let Some(hip) = &report.assessment.hip {
            push_hip_section(&mut markdown, labels, hip);
        }

        let sentinels = report.infinite_reserve_sentinels();
        if !sentinels.is_empty() {
            markdown.push_str(&format!("> {}\n", labels.infinite_reserve_warning(&sentinels)));
        }

        markdown
    }

    /// Printable HTML page rendered from the Markdown report
    pub fn to_html(report: &ClinicalReport) -> String {
        let mut options = comrak::Options::default();
        options.extension.table = true;
        let body = comrak::markdown_to_html(&Self::to_markdown(report), &options);

        format!(
            "<!DOCTYPE html>\n<html lang=\"{lang}\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>{title}</title>\n<style>{style}</style>\n</head>\n<body>\n{body}</body>\n</html>\n",
            lang = report.language.code(),
            title = escape_html(report.language.labels().title),
            style = PRINT_STYLE,
        )
    }

    /// Single evaluation as plain text lines
    pub fn evaluation_to_text(output: &EvaluationOutput, language: Language) -> String {
        let labels = language.labels();
        let mut text = format!("{}: {}\n", labels.condition, labels.condition_for(output.gamma_deg));
        text.push_str(&format!("{}: {:.1}°\n", labels.measured(output.mode), output.measured_angle_deg));
        text.push_str(&format!("{}: {:.1}°\n", labels.critical(output.mode), output.critical_angle_deg));
        text.push_str(&format!("{}: {:.1}°\n", labels.reserve, output.reserve_margin_deg));
        text.push_str(&format!("{}: {:.1}°\n", labels.beta, output.corrected_beta_deg));
        text.push_str(&format!(
            "{}: {}\n",
            labels.interpretation,
            labels.interpretation_label(output.interpretation)
        ));
        if output.mode == FlexionMode::Hip {
            text.push_str(&format!("{}: {}\n", labels.dislocation_risk, labels.risk_label(output.dislocation_risk())));
        }
        text
    }

    /// Scanned corrected-β curve as CSV
    pub fn profile_to_csv(samples: &[ProfileSample], mode: FlexionMode) -> String {
        let mut csv = format!("{}_deg,beta_deg,corrected_beta_deg\n", mode_column(mode));
        for sample in samples {
            csv.push_str(&format!(
                "{:.2},{:.4},{:.4}\n",
                sample.flexion_deg, sample.beta_deg, sample.corrected_beta_deg
            ));
        }
        csv
    }
}

const PRINT_STYLE: &str = "body{font-family:sans-serif;max-width:50em;margin:2em auto}\
table{border-collapse:collapse;margin-bottom:1.5em}\
th,td{border:1px solid #999;padding:.3em .6em;text-align:left}\
blockquote{border-left:4px solid #d9822b;margin:0;padding:.5em 1em;background:#fdf3e7}";

const fn mode_column(mode: FlexionMode) -> &'static str {
    match mode {
        FlexionMode::Pelvic => "delta",
        FlexionMode::Hip => "alpha",
    }
}

fn push_pelvic_section(markdown: &mut String, labels: &Labels, comparison: &GammaComparison) {
    markdown.push_str(&format!("## {}\n\n", labels.results_pelvic));
    markdown.push_str(&format!(
        "| {} | {} | {} | {} | {} | {} |\n|---|---|---|---|---|---|\n",
        labels.condition,
        labels.mobility,
        labels.critical_pelvic,
        labels.reserve,
        labels.beta,
        labels.interpretation
    ));
    for output in comparison.outputs() {
        markdown.push_str(&format!(
            "| {} | {:.1} | {:.1} | {:.1} | {:.1} | {} |\n",
            labels.condition_for(output.gamma_deg),
            output.measured_angle_deg,
            output.critical_angle_deg,
            output.reserve_margin_deg,
            output.corrected_beta_deg,
            labels.interpretation_label(output.interpretation)
        ));
    }
    markdown.push('\n');
}

fn push_hip_section(markdown: &mut String, labels: &Labels, comparison: &GammaComparison) {
    markdown.push_str(&format!("## {}\n\n", labels.results_hip));
    markdown.push_str(&format!(
        "| {} | {} | {} | {} | {} |\n|---|---|---|---|---|\n",
        labels.condition,
        labels.alpha_measured,
        labels.critical_hip,
        labels.reserve,
        labels.dislocation_risk
    ));
    for output in comparison.outputs() {
        markdown.push_str(&format!(
            "| {} | {:.1} | {:.1} | {:.1} | {} |\n",
            labels.condition_for(output.gamma_deg),
            output.measured_angle_deg,
            output.critical_angle_deg,
            output.reserve_margin_deg,
            labels.risk_label(output.dislocation_risk())
        ));
    }
    markdown.push('\n');
}

/// RFC 4180 line: fields containing a comma, quote or line break are quoted
fn csv_line(fields: &[&str]) -> String {
    let mut line = fields
        .iter()
        .map(|field| {
            if field.contains([',', '"', '\n', '\r']) {
                format!("\"{}\"", field.replace('"', "\"\""))
            } else {
                (*field).to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(",");
    line.push_str("\r\n");
    line
}

fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '_' | '`' | '[' | ']' | '<' | '>' | '|' | '#') {
            escaped.push('\\');
        }
        if c == '\n' || c == '\r' {
            escaped.push(' ');
        } else {
            escaped.push(c);
        }
    }
    escaped
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use flexreserve_core::{
        corrected_beta_profile, EvaluationInput, FlexionReserveEvaluator, FrontalTilt, JointGeometry,
        ModelConfig,
    };
    use proptest::prelude::*;

    fn report_for(input: &EvaluationInput, language: Language, patient: &str) -> ClinicalReport {
        ClinicalReport::generate(patient, language, input, &FlexionReserveEvaluator::default()).unwrap()
    }

    fn reference_report(language: Language) -> ClinicalReport {
        report_for(&EvaluationInput::default(), language, "Patient X")
    }

    #[test]
    fn test_json_export() {
        let report = reference_report(Language::English);
        let json = ReportExporter::to_json(&report).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["patient_name"], "Patient X");
        assert_eq!(value["language"], "english");
        assert_eq!(value["assessment"]["pelvic"]["with_gamma"]["interpretation"], "INFINITE_RESERVE");
        assert_eq!(
            value["assessment"]["pelvic"]["with_gamma"]["critical_angle"]["status"],
            "not_found"
        );

        let back: ClinicalReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.patient_name, report.patient_name);
        assert_eq!(back.generated_at, report.generated_at);
        assert_eq!(back.assessment.hip.unwrap().with_gamma.critical_angle_deg, 129.9);
    }

    #[test]
    fn test_yaml_export() {
        let yaml = ReportExporter::to_yaml(&reference_report(Language::French)).unwrap();
        assert!(yaml.contains("patient_name: Patient X"));
        assert!(yaml.contains("critical_angle_deg: 129.9"));
    }

    #[test]
    fn test_csv_export() {
        let csv = ReportExporter::to_csv(&reference_report(Language::French));
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Condition,Mobilité pelvienne (°),Flexion maximale tolérée (°),Réserve de flexion (°),\
             Inclinaison col fémoral (°),Interprétation,Nom du patient"
        );
        assert_eq!(
            lines[1],
            "Sans adduction/abduction (γ = 0°),20.0,89.9,69.9,32.55,Pas de conflit : réserve infinie,Patient X"
        );
        assert!(lines[2].starts_with("Sans adduction/abduction (γ = 0°),20.0,89.9,"));
    }

    #[test]
    fn test_csv_quotes_patient_names() {
        let report = report_for(&EvaluationInput::default(), Language::English, "Doe, \"Jane\"");
        let csv = ReportExporter::to_csv(&report);
        assert!(csv.lines().nth(1).unwrap().ends_with(",\"Doe, \"\"Jane\"\"\""));
    }

    #[test]
    fn test_markdown_sections() {
        let markdown = ReportExporter::to_markdown(&reference_report(Language::English));

        assert!(markdown.starts_with("# Clinical analysis of flexion reserve\n"));
        assert!(markdown.contains("## Parameters"));
        assert!(markdown.contains("| CCD angle (°) | 130.0 |"));
        assert!(markdown.contains("## Pelvic flexion results"));
        assert!(markdown.contains(
            "| Without adduction/abduction (γ = 0°) | 20.0 | 89.9 | 69.9 | 32.6 | No conflict: infinite reserve |"
        ));
        assert!(markdown.contains("## Leg flexion results"));
        assert!(markdown.contains("No dislocation risk: infinite reserve"));
        assert!(markdown.contains("> ⚠️ **Clinical warning**"));
        assert!(markdown.contains("89.9° / 129.9°"));
    }

    #[test]
    fn test_markdown_without_hip_or_warning() {
        let input = EvaluationInput {
            anteversion_deg: 0.0,
            gamma_deg: 10.0,
            alpha_measured_deg: None,
            ..EvaluationInput::default()
        };
        let markdown = ReportExporter::to_markdown(&report_for(&input, Language::French, "Y"));

        assert!(markdown.contains("## Résultats flexion pelvienne"));
        assert!(markdown.contains("Avec adduction/abduction (γ = 10.0°)"));
        assert!(markdown.contains("Conflit : flexion critique dépassée"));
        assert!(!markdown.contains("Résultats flexion jambe"));
        assert!(!markdown.contains("Attention clinique"));
    }

    #[test]
    fn test_html_export() {
        let report = report_for(&EvaluationInput::default(), Language::French, "<script>alert(1)</script>");
        let html = ReportExporter::to_html(&report);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<html lang=\"fr\">"));
        assert!(html.contains("<table>"));
        assert!(html.contains("<h2>Résultats flexion pelvienne</h2>"));
        assert!(html.contains("<blockquote>"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_evaluation_text() {
        let output = flexreserve_core::evaluate(&EvaluationInput::default().with_mode(FlexionMode::Hip)).unwrap();
        let text = ReportExporter::evaluation_to_text(&output, Language::English);

        assert!(text.contains("Measured hip flexion (°): 90.0°"));
        assert!(text.contains("Maximum theoretical flexion before impingement (°): 129.9°"));
        assert!(text.contains("Dislocation risk: No dislocation risk: infinite reserve"));
    }

    #[test]
    fn test_profile_csv() {
        let geometry = JointGeometry::new(130.0, 20.0, 40.0).unwrap();
        let samples = corrected_beta_profile(
            &geometry,
            FrontalTilt::NEUTRAL,
            0.0,
            FlexionMode::Pelvic,
            &ModelConfig::default(),
        )
        .unwrap();
        let csv = ReportExporter::profile_to_csv(&samples, FlexionMode::Pelvic);

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "delta_deg,beta_deg,corrected_beta_deg");
        assert_eq!(lines.len(), 901);
        assert!(lines[201].starts_with("20.00,7.551"));
    }

    proptest! {
        #[test]
        fn csv_line_has_one_record(fields in proptest::collection::vec(".*", 1..6)) {
            let refs: Vec<&str> = fields.iter().map(String::as_str).collect();
            let line = csv_line(&refs);
            prop_assert!(line.ends_with("\r\n"));
            // Quote characters always come in pairs
            prop_assert_eq!(line.matches('"').count() % 2, 0);
        }
    }
}
