//! stopscan - capture street-level imagery of bus stops and score their amenities
//!
//! Pipeline: correct each stop against nearby places, sample distinct
//! panoramas along the adjacent road, capture pictures facing the stop,
//! then score detector output per stop.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use stopscan_cli::output::Status;
use stopscan_core::config::Config;
use stopscan_core::error::ErrorReport;
use stopscan_core::{exit_codes, ErrorCode};
use stopscan_geo::{Coordinate, Crs};

mod commands;
mod logging;

/// Bus-stop imagery capture and amenity assessment
#[derive(Parser)]
#[command(name = "stopscan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to stopscan.toml (searched in the working directory otherwise)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Emit machine-readable JSON on stdout
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compass heading a camera at FROM needs to face TO
    Heading {
        /// Camera position as `lat,lon`
        #[arg(value_parser = commands::heading::parse_coordinate, allow_hyphen_values = true)]
        from: Coordinate,

        /// Target position as `lat,lon`
        #[arg(value_parser = commands::heading::parse_coordinate, allow_hyphen_values = true)]
        to: Coordinate,

        /// Also report the planar bearing in this projection
        #[arg(long, value_enum)]
        crs: Option<CrsArg>,
    },

    /// Plan vantages along each stop's road without consulting imagery
    Sample {
        /// GeoJSON FeatureCollection of stop points
        stops: PathBuf,

        /// Feature property holding the stop id
        #[arg(long)]
        id_property: Option<String>,

        /// Only process the first N stops
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Correct, sample and capture every stop, writing pictures and a run log
    Run {
        /// GeoJSON FeatureCollection of stop points
        stops: PathBuf,

        /// Folder pictures are written to
        #[arg(short, long, default_value = "pics")]
        out: PathBuf,

        /// Run log path (defaults to OUT/log.json)
        #[arg(long)]
        log: Option<PathBuf>,

        /// Feature property holding the stop id
        #[arg(long)]
        id_property: Option<String>,

        /// Skip the first N stops
        #[arg(long, default_value = "0")]
        skip: usize,

        /// Only process N stops
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Capture a single picture per stop instead of sampling the road
        #[arg(long)]
        single: bool,

        /// Never reuse a panorama across stops of this run
        #[arg(long)]
        shared_panoramas: bool,
    },

    /// Score amenities from detector labels for a finished run
    Assess {
        /// Run log written by `run`
        log: PathBuf,

        /// Folder holding the captured pictures (defaults to the log's folder)
        #[arg(long)]
        images: Option<PathBuf>,

        /// Folder of YOLO label files named after the pictures
        #[arg(long)]
        labels: PathBuf,

        /// Write the assessment JSON here as well as to stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum CrsArg {
    Local,
    WebMercator,
}

impl From<CrsArg> for Crs {
    fn from(arg: CrsArg) -> Self {
        match arg {
            CrsArg::Local => Crs::Local,
            CrsArg::WebMercator => Crs::WebMercator,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            report_failure(&anyhow::Error::new(e), cli.json);
            return ExitCode::from(exit_codes::CONFIG_ERROR as u8);
        }
    };

    let session_id = match logging::init(&config.schema.logging, cli.verbose) {
        Ok(id) => id,
        Err(e) => {
            Status::error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };
    let ctx = commands::Context { config, session_id, json: cli.json };

    let result = match cli.command {
        Commands::Heading { from, to, crs } => commands::heading::run(&ctx, from, to, crs.map(Crs::from)),
        Commands::Sample { stops, id_property, limit } => {
            commands::sample::run(&ctx, &stops, id_property.as_deref(), limit)
        }
        Commands::Run { stops, out, log, id_property, skip, limit, single, shared_panoramas } => {
            let args = commands::run::RunArgs {
                stops,
                log: log.unwrap_or_else(|| out.join("log.json")),
                out,
                id_property,
                skip,
                limit,
                single,
                shared_panoramas,
            };
            commands::run::run(&ctx, &args)
        }
        Commands::Assess { log, images, labels, output } => {
            commands::assess::run(&ctx, &log, images.as_deref(), &labels, output.as_deref())
        }
    };

    match result {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            report_failure(&e, ctx.json);
            ExitCode::from(exit_code_for(&e) as u8)
        }
    }
}

/// Print a failure as a JSON error report on stdout, or as coloured text.
fn report_failure(err: &anyhow::Error, json: bool) {
    if json {
        match serde_json::to_string_pretty(&error_report(err)) {
            Ok(report) => println!("{report}"),
            Err(e) => Status::error(&format!("{err:#} ({e})")),
        }
        return;
    }
    match err.downcast_ref::<stopscan_core::Error>() {
        Some(err) => Status::report(err),
        None => Status::error(&format!("{err:#}")),
    }
}

/// Coded report for any failure; errors outside the taxonomy are `Unknown`.
fn error_report(err: &anyhow::Error) -> ErrorReport {
    match err.downcast_ref::<stopscan_core::Error>() {
        Some(err) => err.to_report(),
        None => stopscan_core::Error::new(ErrorCode::Unknown, format!("{err:#}")).to_report(),
    }
}

/// Map a failure to the process exit code by its error category.
fn exit_code_for(err: &anyhow::Error) -> i32 {
    let Some(err) = err.downcast_ref::<stopscan_core::Error>() else {
        return exit_codes::FAILURE;
    };
    match err.code.code() / 1000 {
        3 => exit_codes::CONFIG_ERROR,
        5 => exit_codes::PROVIDER_ERROR,
        _ if err.code == ErrorCode::InvalidStops => exit_codes::VALIDATION_ERROR,
        _ => exit_codes::FAILURE,
    }
}
