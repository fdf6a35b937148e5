//! Command line entry point for the Glicko rating tools
//!
//! Rates one period of games described in a JSON file, or scores how evenly
//! matched two competitors are, using the configured rating system.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glicko::config::{AppConfig, SystemKind};
use glicko::{Rating, RatingSystem};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Glicko and Glicko-2 rating calculator
#[derive(Parser)]
#[command(
    name = "glicko",
    version,
    about = "Compute Glicko and Glicko-2 skill ratings from match outcomes"
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Rating system override
    #[arg(long, value_name = "SYSTEM", help = "Rating system: glicko or glicko2")]
    system: Option<SystemKind>,

    /// Glicko-2 system constant override
    #[arg(long, value_name = "TAU", help = "Override the Glicko-2 tau constant")]
    tau: Option<f64>,

    /// Dry run mode (validate config and exit)
    #[arg(long, help = "Validate configuration and exit")]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Rate one period of games read from a JSON file
    Rate {
        /// Period file with the rating and its series of games
        file: PathBuf,
    },
    /// Score how evenly matched two competitors are
    Quality {
        mu1: f64,
        sigma1: f64,
        mu2: f64,
        sigma2: f64,
    },
}

/// One rating period as read from disk
#[derive(Debug, Deserialize)]
struct PeriodFile {
    rating: Rating,
    series: Vec<Game>,
    #[serde(default)]
    rated_at: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Game {
    score: f64,
    opponent: Rating,
}

#[derive(Debug, Serialize)]
struct QualityReport {
    system: SystemKind,
    quality: f64,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load configuration and apply CLI overrides
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::from_env()?,
    };

    if let Some(log_level) = &args.log_level {
        config.logging.level = log_level.clone();
    }
    if let Some(system) = args.system {
        config.system = system;
    }
    if let Some(tau) = args.tau {
        config.glicko2.tau = tau;
    }

    glicko::config::validate_config(&config)?;
    Ok(config)
}

fn rate_period(system: &dyn RatingSystem, path: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read period file {}", path.display()))?;
    let period: PeriodFile = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse period file {}", path.display()))?;

    let series: Vec<(f64, Rating)> = period
        .series
        .into_iter()
        .map(|game| (game.score, game.opponent))
        .collect();

    debug!("Rating {} against {} opponents", period.rating, series.len());
    let new_rating = system.rate(&period.rating, &series, period.rated_at)?;
    info!("New rating: {}", new_rating);

    println!("{}", serde_json::to_string_pretty(&new_rating)?);
    Ok(())
}

fn score_pairing(
    config: &AppConfig,
    system: &dyn RatingSystem,
    ratings: [(f64, f64); 2],
) -> Result<()> {
    let default = system.default_rating();
    let [(mu1, sigma1), (mu2, sigma2)] = ratings;
    let rating1 = Rating::new(mu1, sigma1, default.volatility(), None)?;
    let rating2 = Rating::new(mu2, sigma2, default.volatility(), None)?;

    let report = QualityReport {
        system: config.system,
        quality: system.quality_1vs1(&rating1, &rating2),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.logging.level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!(
        "glicko {} using {} (period {}s)",
        glicko::VERSION,
        config.system,
        match config.system {
            SystemKind::Glicko => config.glicko.period_seconds,
            SystemKind::Glicko2 => config.glicko2.period_seconds,
        }
    );

    if args.dry_run {
        info!("Configuration validation successful");
        return Ok(());
    }

    let system = config.build_system()?;

    match &args.command {
        Some(Command::Rate { file }) => rate_period(system.as_ref(), file),
        Some(Command::Quality {
            mu1,
            sigma1,
            mu2,
            sigma2,
        }) => score_pairing(&config, system.as_ref(), [(*mu1, *sigma1), (*mu2, *sigma2)]),
        None => {
            info!("No command given, nothing to do");
            Ok(())
        }
    }
}
