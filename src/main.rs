use anyhow::{bail, Context};
use clap::Parser;
use patterngen::config::{AppConfig, ReportFormat};
use patterngen::data::{FeatureSource, SimpleFeatureSource, TextConnector};
use patterngen::engines::evaluation::RuleMatcher;
use patterngen::PatternSearch;
use std::path::PathBuf;

/// Infers token patterns that match a set of sample sentences
#[derive(Parser)]
#[command(name = "patterngen")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Sample texts
    samples: Vec<String>,

    /// File with one sample per line
    #[arg(short, long)]
    samples_file: Option<PathBuf>,

    /// Configuration file path (TOML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Append the execution report to this file
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Report format
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => ReportFormat::Json,
            OutputFormat::Csv => ReportFormat::Csv,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(seed) = cli.seed {
        config.ge.seed = Some(seed);
    }
    if let Some(report) = cli.report {
        config.io.report_path = Some(report);
    }
    if let Some(format) = cli.format {
        config.io.report_format = format.into();
    }

    let mut samples = cli.samples;
    if let Some(path) = &cli.samples_file {
        samples.extend(TextConnector::load(path)?);
    }
    if samples.is_empty() {
        bail!("No samples given: pass them as arguments or with --samples-file");
    }

    let source = SimpleFeatureSource::new();
    let matcher = RuleMatcher::with_custom_attributes(source.custom_attributes());
    let outcome = PatternSearch::new(&config, &source, &matcher)
        .find_patterns(&samples)
        .context("Pattern search failed")?;

    match outcome.best() {
        Some(best) => {
            println!("{}", serde_json::to_string_pretty(best.phenotype())?);
            println!("Fitness: {:.4}", best.fitness());
        }
        None => println!("No pattern found"),
    }

    let stats = &outcome.stats;
    println!(
        "SR: {:.4}  MBF: {:.4}  AES: {:.2}  Mean time: {:.3}s",
        stats.success_rate(),
        stats.mbf(),
        stats.aes(),
        stats.mean_time()
    );

    Ok(())
}
