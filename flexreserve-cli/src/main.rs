//! Flexion reserve CLI entry point
//!
//! `evaluate` runs one flexion mode, `assess` builds the full clinical report
//! (pelvic and hip, with and without γ), `profile` dumps the scanned
//! corrected-β curve.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use flexreserve_core::{
    corrected_beta_profile, Error, EvaluationInput, FlexionMode, FlexionReserveEvaluator, FrontalTilt,
    ModelConfig, Result,
};
use flexreserve_report::{ClinicalReport, Language, ReportExporter};
use flexreserve_utils::{basic_config, ConfigBuilder, LogLevel};

#[derive(Parser)]
#[command(name = "flexreserve")]
#[command(about = "Hip flexion reserve and impingement risk after total hip arthroplasty")]
#[command(version)]
struct Cli {
    /// Model configuration file (TOML, JSON or YAML)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Log verbosity (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the flexion reserve for one flexion mode
    Evaluate {
        #[command(flatten)]
        clinical: ClinicalArgs,

        /// Flexion mode, overrides the input file
        #[arg(short = 'm', long, value_enum)]
        mode: Option<FlexionMode>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value_t = EvaluateFormat::Text)]
        format: EvaluateFormat,

        /// Language of the text output
        #[arg(short = 'l', long, value_enum, default_value_t = Language::English)]
        lang: Language,
    },

    /// Full clinical assessment: pelvic and hip flexion, with and without γ
    Assess {
        #[command(flatten)]
        clinical: ClinicalArgs,

        /// Report format
        #[arg(short = 'f', long, value_enum, default_value_t = ReportFormat::Markdown)]
        format: ReportFormat,

        /// Report language
        #[arg(short = 'l', long, value_enum, default_value_t = Language::French)]
        lang: Language,

        /// Patient name printed on the report
        #[arg(short = 'p', long, default_value = "Patient X")]
        patient: String,

        /// Write the report to a file instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Print the scanned corrected-β curve as CSV
    Profile {
        #[command(flatten)]
        clinical: ClinicalArgs,

        /// Flexion mode, overrides the input file
        #[arg(short = 'm', long, value_enum)]
        mode: Option<FlexionMode>,

        /// Write the CSV to a file instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum EvaluateFormat {
    Json,
    Yaml,
    Text,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportFormat {
    Json,
    Yaml,
    Csv,
    Markdown,
    Html,
}

/// Clinical parameters; flags override values read from `--input`
#[derive(Args)]
struct ClinicalArgs {
    /// Clinical parameters file (TOML, JSON or YAML)
    #[arg(short = 'i', long)]
    input: Option<PathBuf>,

    /// CCD angle (°)
    #[arg(long, allow_negative_numbers = true)]
    ccd: Option<f64>,

    /// Femoral torsion TF (°)
    #[arg(long, allow_negative_numbers = true)]
    tf: Option<f64>,

    /// Femoral offset (mm)
    #[arg(long, allow_negative_numbers = true)]
    offset: Option<f64>,

    /// Frontal tilt γ (°): positive abduction, negative adduction
    #[arg(short = 'g', long, allow_negative_numbers = true, conflicts_with_all = ["abduction", "adduction"])]
    gamma: Option<f64>,

    /// Abduction (°, non-negative), combined with --adduction into γ
    #[arg(long, allow_negative_numbers = true, value_parser = non_negative_degrees)]
    abduction: Option<f64>,

    /// Adduction (°, non-negative), combined with --abduction into γ
    #[arg(long, allow_negative_numbers = true, value_parser = non_negative_degrees)]
    adduction: Option<f64>,

    /// Cup anteversion AV (°)
    #[arg(long, visible_alias = "av", allow_negative_numbers = true)]
    anteversion: Option<f64>,

    /// Pelvic version standing (°)
    #[arg(long, allow_negative_numbers = true)]
    standing: Option<f64>,

    /// Pelvic version sitting (°)
    #[arg(long, allow_negative_numbers = true)]
    sitting: Option<f64>,

    /// Measured hip flexion α (°)
    #[arg(long, allow_negative_numbers = true)]
    alpha: Option<f64>,
}

impl ClinicalArgs {
    fn resolve(&self) -> Result<EvaluationInput> {
        let mut input: EvaluationInput = ConfigBuilder::new()
            .load_optional(self.input.as_deref())?
            .build();

        let overrides = [
            (self.ccd, &mut input.ccd_deg),
            (self.tf, &mut input.tf_deg),
            (self.offset, &mut input.offset_mm),
            (self.gamma, &mut input.gamma_deg),
            (self.anteversion, &mut input.anteversion_deg),
            (self.standing, &mut input.version_standing_deg),
            (self.sitting, &mut input.version_sitting_deg),
        ];
        for (value, field) in overrides {
            if let Some(value) = value {
                *field = value;
            }
        }

        if self.abduction.is_some() || self.adduction.is_some() {
            let tilt = FrontalTilt::from_abduction_adduction(
                self.abduction.unwrap_or(0.0),
                self.adduction.unwrap_or(0.0),
            );
            input.gamma_deg = tilt.gamma_deg;
        }
        if self.alpha.is_some() {
            input.alpha_measured_deg = self.alpha;
        }

        Ok(input)
    }
}

/// Abduction and adduction are magnitudes; the sign of γ comes from which
/// flag carries the value
fn non_negative_degrees(value: &str) -> std::result::Result<f64, String> {
    let degrees: f64 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if degrees.is_finite() && degrees >= 0.0 {
        Ok(degrees)
    } else {
        Err(format!("expected a non-negative angle in degrees, got {value}"))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // Initialize logging
    basic_config(Some(cli.log_level))?;

    let evaluator = load_evaluator(cli.config.as_deref())?;

    match cli.command {
        Commands::Evaluate { clinical, mode, format, lang } => {
            let mut input = clinical.resolve()?;
            if let Some(mode) = mode {
                input.mode = mode;
            }
            tracing::info!(mode = %input.mode, "evaluating flexion reserve");

            let output = evaluator.evaluate(&input)?;
            let rendered = match format {
                EvaluateFormat::Json => serde_json::to_string_pretty(&output)?,
                EvaluateFormat::Yaml => serde_yaml::to_string(&output)
                    .map_err(|e| Error::Report(format!("YAML serialization failed: {e}")))?,
                EvaluateFormat::Text => ReportExporter::evaluation_to_text(&output, lang),
            };
            println!("{}", rendered.trim_end());
        }
        Commands::Assess { clinical, format, lang, patient, output } => {
            let input = clinical.resolve()?;
            tracing::info!(patient = %patient, language = %lang, "building clinical report");

            let report = ClinicalReport::generate(patient, lang, &input, &evaluator)?;
            let rendered = match format {
                ReportFormat::Json => ReportExporter::to_json(&report)?,
                ReportFormat::Yaml => ReportExporter::to_yaml(&report)?,
                ReportFormat::Csv => ReportExporter::to_csv(&report),
                ReportFormat::Markdown => ReportExporter::to_markdown(&report),
                ReportFormat::Html => ReportExporter::to_html(&report),
            };
            emit(output.as_deref(), &rendered)?;
        }
        Commands::Profile { clinical, mode, output } => {
            let mut input = clinical.resolve()?;
            if let Some(mode) = mode {
                input.mode = mode;
            }

            let samples = corrected_beta_profile(
                &input.geometry()?,
                input.tilt(),
                input.anteversion_deg,
                input.mode,
                evaluator.config(),
            )?;
            emit(output.as_deref(), &ReportExporter::profile_to_csv(&samples, input.mode))?;
        }
    }

    Ok(())
}

fn load_evaluator(config: Option<&Path>) -> Result<FlexionReserveEvaluator> {
    let model = match config {
        Some(path) => ModelConfig::from_file(path)?,
        None => ModelConfig::default(),
    };
    tracing::debug!(?model, "model configuration");
    FlexionReserveEvaluator::new(model)
}

fn emit(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)?;
            eprintln!("Saved to: {}", path.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}
