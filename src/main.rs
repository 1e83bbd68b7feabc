use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use response_quality::{
    read_text, score_with_config, ScoreError, ScorePercentages, ScoringConfig, WeightOverrides,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "response-quality",
    about = "Score LLM responses for coherence, length fit, vocabulary, repetition and readability",
    version
)]
struct Cli {
    /// Response files to score (reads stdin if none provided)
    files: Vec<PathBuf>,

    /// File holding the prompt the responses answer
    #[arg(long, conflicts_with = "prompt_text")]
    prompt: Option<PathBuf>,

    /// Prompt given inline
    #[arg(long)]
    prompt_text: Option<String>,

    /// JSON object with partial weight overrides
    #[arg(long)]
    weights: Option<PathBuf>,

    /// JSON scoring configuration
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Pretty-printed result per input
    Json,
    /// Header plus one row of percentages per input
    Csv,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

// Logs go to stderr so stdout stays machine-readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn run(cli: &Cli) -> Result<(), ScoreError> {
    let mut config = match &cli.config {
        Some(path) => ScoringConfig::from_path(path)?,
        None => ScoringConfig::default(),
    };
    if let Some(path) = &cli.weights {
        config.weights = config.weights.merged(&WeightOverrides::from_path(path)?);
    }

    let prompt = match (&cli.prompt, &cli.prompt_text) {
        (Some(path), _) => read_text(path)?,
        (None, Some(text)) => text.clone(),
        (None, None) => String::new(),
    };

    let mut inputs = Vec::new();
    if cli.files.is_empty() {
        inputs.push(("<stdin>".to_string(), read_stdin()?));
    } else {
        for path in &cli.files {
            inputs.push((path.display().to_string(), read_text(path)?));
        }
    }

    if cli.format == Format::Csv {
        println!("input,{}", ScorePercentages::csv_header());
    }
    for (label, response) in &inputs {
        let result = score_with_config(response, &prompt, &config);
        debug!(input = %label, overall = result.overall_score, "scored input");
        match cli.format {
            Format::Json => println!("{}", serde_json::to_string_pretty(&result)?),
            Format::Csv => println!("{label},{}", result.percentages().to_csv_row()),
        }
    }
    Ok(())
}

fn read_stdin() -> Result<String, ScoreError> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .map_err(|source| ScoreError::Io {
            path: PathBuf::from("<stdin>"),
            source,
        })?;
    Ok(input)
}
