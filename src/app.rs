//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - generates datasets and fits models
//! - scores single requests and batches
//! - prints reports and writes optional exports

use std::path::Path;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{BatchArgs, Command, FitArgs, GenerateArgs, InspectArgs, ScoreArgs};
use crate::config::{LOG_ENV, ScoringConfig, coercion_mode, load_dotenv, model_error};
use crate::domain::RawValue;
use crate::error::{AppError, EXIT_INPUT};
use crate::fit::{FitOptions, fit_model};
use crate::io::{
    AssessmentResponse, ModelArtifact, ScoredRow, read_artifact, read_business_json, read_dataset_csv,
    read_inputs_csv, write_artifact, write_assessments_csv, write_dataset_csv,
};
use crate::models::ModelBundle;

pub mod pipeline;

use pipeline::ScoringPipeline;

/// Entry point for the `bizscore` binary.
pub fn run() -> Result<(), AppError> {
    load_dotenv();
    init_tracing();

    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Generate(args) => handle_generate(args),
        Command::Fit(args) => handle_fit(args),
        Command::Score(args) => handle_score(args),
        Command::Batch(args) => handle_batch(args),
        Command::Inspect(args) => handle_inspect(args),
    }
}

/// Logs go to stderr; stdout carries reports and JSON only.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // A second init (e.g. from tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_generate(args: GenerateArgs) -> Result<(), AppError> {
    let records = crate::data::generate_dataset(args.count, args.seed)?;
    write_dataset_csv(&args.out, &records)?;
    println!("Wrote {} records to {}", records.len(), args.out.display());
    Ok(())
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let data = read_dataset_csv(&args.data, coercion_mode(args.strict_booleans))?;
    for e in &data.row_errors {
        tracing::warn!(line = e.line, id = e.id.as_deref().unwrap_or("-"), "{}", e.message);
    }

    let opts = FitOptions {
        seed: args.seed,
        ..FitOptions::default()
    };
    let outcome = fit_model(&data.records, &opts)?;
    write_artifact(&args.out, &outcome.to_artifact())?;

    println!("{}", crate::report::format_fit_summary(&data, &outcome, &args.out));
    Ok(())
}

fn handle_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = ScoringConfig::from(&args.model);
    let pipeline = ScoringPipeline::new(config.load_model()?.snapshot(), config.coercion_mode);

    let raw: Vec<RawValue> = match (&args.input, &args.values) {
        (Some(path), _) => read_business_json(path)?.to_raw_values(),
        (None, Some(values)) => values.iter().map(|v| RawValue::from(v.as_str())).collect(),
        (None, None) => return Err(AppError::new(EXIT_INPUT, "Provide --input or --values.")),
    };

    let assessment = pipeline.assess(&raw)?;

    if args.json {
        let response = AssessmentResponse::from(&assessment);
        let text = serde_json::to_string_pretty(&response)
            .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to serialize response: {e}")))?;
        println!("{text}");
    } else {
        println!("{}", crate::report::format_assessment(&assessment));
    }
    Ok(())
}

fn handle_batch(args: BatchArgs) -> Result<(), AppError> {
    let config = ScoringConfig::from(&args.model);
    let pipeline = ScoringPipeline::new(config.load_model()?.snapshot(), config.coercion_mode);

    let inputs = read_inputs_csv(&args.input)?;
    for e in &inputs.row_errors {
        tracing::warn!(line = e.line, "{}", e.message);
    }

    let values: Vec<Vec<RawValue>> = inputs.rows.iter().map(|r| r.values.clone()).collect();
    let results = pipeline.assess_batch(&values);
    let scored: Vec<ScoredRow> = inputs
        .rows
        .into_iter()
        .zip(results)
        .map(|(row, outcome)| ScoredRow { id: row.id, outcome })
        .collect();

    let summary = crate::report::summarize_batch(&scored);
    tracing::info!(
        total = summary.total,
        scored = summary.scored,
        rejected = summary.rejected,
        "batch scored"
    );

    if let Some(path) = &args.export {
        write_assessments_csv(path, &scored)?;
    }

    println!("{}", crate::report::format_batch_summary(&summary));
    if args.top > 0 && summary.scored > 0 {
        let rankings = crate::report::rank_by_score(&scored, args.top);
        println!("{}", crate::report::format_rankings(&rankings));
    }
    Ok(())
}

fn handle_inspect(args: InspectArgs) -> Result<(), AppError> {
    let artifact = load_checked_artifact(&args.model)?;
    println!("{}", crate::report::format_artifact_summary(&artifact, &args.model));
    Ok(())
}

/// Read an artifact and run the same validation the scorer applies.
fn load_checked_artifact(path: &Path) -> Result<ModelArtifact, AppError> {
    let artifact = read_artifact(path).map_err(|e| model_error(path, e))?;
    ModelBundle::from_artifact(&artifact).map_err(|e| model_error(path, e))?;
    Ok(artifact)
}
