use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, ValueEnum};
use physio_core::{RiskResult, ScreeningConfig};
use physio_intake::{parse_assessment_str, Assessment, SubmissionRow};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "physio-cli",
    about = "Đánh giá nguy cơ thể lực từ file JSON kết quả đo."
)]
struct Args {
    /// Đường dẫn tới file JSON assessment.
    #[arg(short, long)]
    input: PathBuf,

    /// Định dạng in kết quả.
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// File JSON ghi đè các ngưỡng sàng lọc.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// In thêm dòng gửi lên bảng kết quả.
    #[arg(long)]
    submission: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let data = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Không đọc được file {:?}", args.input))?;
    let assessment = parse_assessment_str(&data)
        .with_context(|| format!("File {:?} không phải assessment hợp lệ", args.input))?;

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ScreeningConfig::default(),
    };
    debug!(?config, "screening config");

    let result = assessment.evaluate_with(&config);

    match args.format {
        Format::Text => print!("{}", render_text(&assessment, &result)),
        Format::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    if args.submission {
        let row = SubmissionRow::new(&assessment, &result, Utc::now());
        println!("{}", serde_json::to_string_pretty(&row)?);
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: &Path) -> anyhow::Result<ScreeningConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Không đọc được config {:?}", path))?;
    serde_json::from_str(&text).with_context(|| format!("Config {:?} không hợp lệ", path))
}

fn render_text(assessment: &Assessment, result: &RiskResult) -> String {
    let mut out = String::new();
    let adopted = &result.adopted;
    let flag = |on: bool| if on { "YES" } else { "-" };

    let _ = writeln!(
        out,
        "Subject: {} ({} yrs, {:?}) | Basis: {}",
        assessment.patient.name,
        assessment.patient.age,
        assessment.patient.gender,
        result.age_group_label
    );
    let _ = writeln!(
        out,
        "Adopted: grip {} kg (R {} / L {}), CS-30 {}, balance {} s, FFD {} cm",
        adopted.grip,
        adopted.grip_right,
        adopted.grip_left,
        adopted.sit_to_stand,
        adopted.balance,
        adopted.flexion
    );
    let _ = writeln!(
        out,
        "Sarcopenia: {} | Locomo: {} | Fall: {} | Flexibility low: {}",
        flag(result.is_sarcopenia_risk),
        flag(result.is_locomo_risk),
        flag(result.is_fall_risk),
        flag(result.is_flexibility_low)
    );
    for point in &result.profile {
        let _ = writeln!(
            out,
            "  {:<16} {:>5.1} / {} (ref {})",
            point.label, point.score, point.scale_max, point.reference_average
        );
    }
    if result.messages.is_empty() {
        let _ = writeln!(out, "No advisories.");
    } else {
        for message in &result.messages {
            let _ = writeln!(out, "* {message}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "patient": { "company": "ACME", "name": "Taro", "age": 65, "gender": "male" },
        "gripStrength": { "right": { "first": 30, "second": 32 }, "left": { "first": 28, "second": 29 } },
        "cs30": { "first": 12, "second": 16 },
        "balanceTime": { "first": 1.5, "second": 1.8 },
        "ffd": { "first": 8, "second": 3 }
    }"#;

    #[test]
    fn test_parse_args_defaults() {
        let args = Args::parse_from(["physio-cli", "--input", "a.json"]);
        assert_eq!(args.format, Format::Text);
        assert!(!args.submission);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_parse_args_json_submission() {
        let args = Args::parse_from([
            "physio-cli",
            "-i",
            "a.json",
            "--format",
            "json",
            "--submission",
        ]);
        assert_eq!(args.format, Format::Json);
        assert!(args.submission);
    }

    #[test]
    fn test_render_text_lists_flags_and_messages() {
        let assessment = parse_assessment_str(DOCUMENT).unwrap();
        let result = assessment.evaluate();
        let text = render_text(&assessment, &result);

        assert!(text.contains("Basis: 60代以上"));
        assert!(text.contains("Fall: YES"));
        assert!(text.contains("Sarcopenia: -"));
        assert!(text.contains("【転倒高リスク】"));
        assert_eq!(text.matches("(ref 60)").count(), 4);
    }

    #[test]
    fn test_partial_config_file_keeps_defaults() {
        let config: ScreeningConfig =
            serde_json::from_str(r#"{ "grip_cutoff_male": 30.0 }"#).unwrap();
        assert_eq!(config.grip_cutoff_male, 30.0);
        assert_eq!(config.grip_cutoff_female, 18.0);
    }
}
