//! Command-line parsing for the business credit scorer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the scoring/fitting code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::DEFAULT_MODEL_PATH;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "bizscore", version, about = "Business credit scoring (logistic-calibrated linear model)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a synthetic labelled business dataset (CSV).
    Generate(GenerateArgs),
    /// Fit scaler + linear model on a labelled dataset and write a model artifact.
    Fit(FitArgs),
    /// Score one business from a JSON file or positional values.
    Score(ScoreArgs),
    /// Score every row of a CSV file in parallel.
    Batch(BatchArgs),
    /// Validate a model artifact and print its parameters.
    Inspect(InspectArgs),
}

#[derive(Debug, Args, Clone)]
pub struct GenerateArgs {
    /// Number of businesses to generate.
    #[arg(short = 'n', long, default_value_t = 1000)]
    pub count: usize,

    /// Random seed (same seed, same dataset).
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Output CSV path.
    #[arg(short, long, default_value = "business_dataset.csv")]
    pub out: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// Labelled dataset CSV.
    #[arg(short, long)]
    pub data: PathBuf,

    /// Where to write the model artifact (JSON).
    #[arg(short, long, default_value = DEFAULT_MODEL_PATH)]
    pub out: PathBuf,

    /// Seed for the train / validation / test split.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Reject boolean cells outside true/false, 1/0, yes/no.
    #[arg(long, env = "BIZSCORE_STRICT_BOOLEANS")]
    pub strict_booleans: bool,
}

/// Options shared by every command that scores against a saved model.
#[derive(Debug, Args, Clone)]
pub struct ModelArgs {
    /// Model artifact (JSON) written by `bizscore fit`.
    #[arg(short, long, env = "BIZSCORE_MODEL", default_value = DEFAULT_MODEL_PATH)]
    pub model: PathBuf,

    /// Reject boolean cells outside true/false, 1/0, yes/no.
    #[arg(long, env = "BIZSCORE_STRICT_BOOLEANS")]
    pub strict_booleans: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// JSON object keyed by feature name.
    #[arg(short, long, conflicts_with = "values", required_unless_present = "values")]
    pub input: Option<PathBuf>,

    /// Ten comma-separated values in feature order.
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, num_args = 1..)]
    pub values: Option<Vec<String>>,

    /// Print the JSON response instead of the text report.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct BatchArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// CSV with one business per row (optional `id` column).
    #[arg(short, long)]
    pub input: PathBuf,

    /// Write per-row assessments to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Show top-N strongest and weakest rows.
    #[arg(long, default_value_t = 5)]
    pub top: usize,
}

#[derive(Debug, Args, Clone)]
pub struct InspectArgs {
    /// Model artifact (JSON).
    #[arg(short, long, env = "BIZSCORE_MODEL", default_value = DEFAULT_MODEL_PATH)]
    pub model: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn score_values_accept_negative_numbers() {
        let cli = Cli::try_parse_from([
            "bizscore",
            "score",
            "--model",
            "m.json",
            "--values",
            "5,37,26,0.39,0.05,true,87,-0.14,3,true",
        ])
        .unwrap();
        let Command::Score(args) = cli.command else {
            panic!("expected score command");
        };
        let values = args.values.unwrap();
        assert_eq!(values.len(), 10);
        assert_eq!(values[7], "-0.14");
        assert_eq!(args.model.model, PathBuf::from("m.json"));
    }

    #[test]
    fn score_needs_exactly_one_input_source() {
        assert!(Cli::try_parse_from(["bizscore", "score"]).is_err());
        let both = Cli::try_parse_from([
            "bizscore",
            "score",
            "--input",
            "a.json",
            "--values",
            "1,2",
        ]);
        assert!(both.is_err());
    }
}
