mod config;
mod geometry;
mod grid;
mod report;
mod search;
mod visibility;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use crate::config::Config;
use crate::geometry::{max_earth_central_angle, min_inclination_for_equal_coverage, round2};
use crate::report::{Reporter, RunLog};
use crate::search::{run_sweep, SearchError, SearchSettings};
use crate::visibility::Sgp4Engine;

#[derive(Parser)]
#[command(name = "cpgd")]
#[command(about = "Constellation design search against a maximum coverage gap")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sweep the design space and write the solution reports
    Search { config: String },
    /// Print the coverage bound used as the minimum inclination
    Bound { config: String },
    /// Validate a configuration file
    Validate { config: String },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Search { config } => search(&config),
        Commands::Bound { config } => bound(&config),
        Commands::Validate { config } => validate(&config),
    }
}

fn load(path: &str) -> Option<Config> {
    match Config::from_file(path) {
        Ok(c) => Some(c),
        Err(e) => {
            eprintln!("Error loading {}: {}", path, e);
            None
        }
    }
}

fn search(path: &str) -> ExitCode {
    let Some(config) = load(path) else {
        return ExitCode::FAILURE;
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Search failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<(), SearchError> {
    let settings = SearchSettings::from_config(config);
    let mut log = RunLog::new(chrono::Utc::now());
    log.header(config, settings.bounds.min_inclination_deg);

    log::info!(
        "Searching {}..={} planes, {}..={} sats per plane, inclination {}..={} deg",
        config.min_planes,
        config.max_planes,
        config.min_sats_in_plane,
        config.max_sats_in_plane,
        settings.bounds.min_inclination_deg,
        config.max_inclination
    );

    let mut engine = Sgp4Engine::new();
    let summary = run_sweep(&mut engine, &settings, &mut log)?;

    let reporter = Reporter::new(config.output_path.clone());
    let paths = reporter.save(&summary, &mut log)?;

    println!(
        "{} solutions out of {} shapes (discarded per level: {:?})",
        summary.solutions.len(),
        summary.evaluated,
        summary.discarded.as_array()
    );
    println!("Report: {}", paths.csv.display());
    println!("Log: {}", paths.log.display());
    Ok(())
}

fn bound(path: &str) -> ExitCode {
    let Some(config) = load(path) else {
        return ExitCode::FAILURE;
    };

    let lambda = max_earth_central_angle(
        config.semi_major_axis,
        config.eccentricity,
        config.visibility_threshold,
    );
    let inclination = min_inclination_for_equal_coverage(
        config.semi_major_axis,
        config.eccentricity,
        config.visibility_threshold,
        config.max_lat,
    );

    println!("Maximum Earth central angle: {:.4} deg", lambda);
    println!(
        "Minimum inclination for a {} deg band: {} deg",
        config.max_lat,
        round2(inclination)
    );
    ExitCode::SUCCESS
}

fn validate(path: &str) -> ExitCode {
    let Some(config) = load(path) else {
        return ExitCode::FAILURE;
    };

    let settings = SearchSettings::from_config(&config);
    let b = &settings.bounds;
    println!("Configuration is valid");
    println!("  window: {} .. {} (first look until {})", config.start_date, config.end_date, config.search_date);
    println!("  planes: {}..={}", b.min_planes, b.max_planes);
    println!("  sats per plane: {}..={}", b.min_sats_per_plane, b.max_sats_per_plane);
    println!(
        "  inclination: {}..={} step {}",
        b.min_inclination_deg, b.max_inclination_deg, b.inclination_step_deg
    );
    println!("  longitude resolution: {} deg", settings.longitude_resolution_deg);
    ExitCode::SUCCESS
}
