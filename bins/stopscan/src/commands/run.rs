//! `stopscan run`: the full capture pipeline.

use super::Context;
use anyhow::Result;
use chrono::Utc;
use indicatif::ProgressBar;
use serde::Serialize;
use std::path::PathBuf;
use stopscan_cli::output::{format_count, format_duration, poi_summary, Status};
use stopscan_cli::progress;
use stopscan_core::config::ConfigSchema;
use stopscan_core::exit_codes;
use stopscan_core::model::PointOfInterest;
use stopscan_core::providers::{ImageSource, PanoramaSource, PlaceSearch, RoadNetwork};
use stopscan_core::run_log::RunLog;
use stopscan_core::stops::load_stops;
use stopscan_image::{CaptureOptions, Capturer};
use stopscan_multipoint::{improve_coords, Autospacer, Correction, PlaceRegistry, SamplingOptions, UsedPanoramas};
use tracing::{info, warn};

/// Options of one `run` invocation.
#[derive(Debug, Clone)]
pub struct RunArgs {
    pub stops: PathBuf,
    pub out: PathBuf,
    pub log: PathBuf,
    pub id_property: Option<String>,
    pub skip: usize,
    pub limit: Option<usize>,
    pub single: bool,
    pub shared_panoramas: bool,
}

/// Per-stop counts of one run.
#[derive(Debug, Default, PartialEq, Serialize)]
struct Tally {
    stops: usize,
    captured: usize,
    pictures: usize,
    duplicates: usize,
    with_errors: usize,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    session_id: String,
    started_at: String,
    #[serde(flatten)]
    tally: Tally,
    log: PathBuf,
}

pub fn run(ctx: &Context, args: &RunArgs) -> Result<i32> {
    let schema = &ctx.config.schema;
    let client = ctx.client()?;

    let pois: Vec<_> = load_stops(&args.stops, args.id_property.as_deref())?
        .into_iter()
        .skip(args.skip)
        .take(args.limit.unwrap_or(usize::MAX))
        .map(|poi| poi.with_keyword(&schema.capture.keyword))
        .collect();
    let mut log = RunLog::load(&args.log)?;
    let started_at = Utc::now().to_rfc3339();

    info!(stops = pois.len(), out = %args.out.display(), "starting run");
    let started = std::time::Instant::now();
    let pb = ctx.progress(pois.len(), "capture");

    let tally = match capture_stops(&client, schema, args, pois, &mut log, &pb, !ctx.json) {
        Ok(tally) => tally,
        Err(e) => {
            progress::finish_error(&pb, "run stopped");
            warn!(error = %e, "run stopped");
            return Err(e);
        }
    };
    progress::finish_success(&pb, "captured");

    let code = if tally.with_errors > 0 { exit_codes::PARTIAL_RESULTS } else { exit_codes::SUCCESS };
    if ctx.json {
        ctx.print_json(&RunSummary {
            session_id: ctx.session_id.clone(),
            started_at,
            tally,
            log: args.log.clone(),
        })?;
    } else {
        Status::success(&format!(
            "captured {} of {} in {}",
            format_count(tally.captured, "stop", "stops"),
            tally.stops,
            format_duration(started.elapsed())
        ));
        Status::info(&format!("{} saved to {}", format_count(tally.pictures, "picture", "pictures"), args.out.display()));
        if tally.duplicates > 0 {
            Status::info(&format!("skipped {}", format_count(tally.duplicates, "duplicate stop", "duplicate stops")));
        }
        Status::info(&format!("run log written to {}", args.log.display()));
    }

    Ok(code)
}

/// Correct, sample and capture each stop in turn.
///
/// The run log is rewritten after every stop so an interrupted run keeps
/// the entries of the stops it already captured.
fn capture_stops<S>(
    source: &S,
    schema: &ConfigSchema,
    args: &RunArgs,
    pois: Vec<PointOfInterest>,
    log: &mut RunLog,
    pb: &ProgressBar,
    show_warnings: bool,
) -> Result<Tally>
where
    S: PlaceSearch + RoadNetwork + PanoramaSource + ImageSource + ?Sized,
{
    let sampling = SamplingOptions::from(&schema.sampling);
    let radius_m = sampling.search_radius_m;
    let spacer = Autospacer::new(source, sampling)?;
    let capturer = Capturer::new(source, CaptureOptions::from_section(&schema.capture, &args.out))?;

    let mut registry = PlaceRegistry::new();
    let mut shared = UsedPanoramas::new();
    let mut tally = Tally { stops: pois.len(), ..Tally::default() };

    for mut poi in pois {
        pb.set_message(poi.id().to_string());

        if schema.capture.improve_coords {
            let registry = schema.capture.verify_unique.then_some(&mut registry);
            if let Correction::Duplicate { of } = improve_coords(source, &mut poi, radius_m, registry) {
                info!(poi = poi.id(), duplicate_of = %of, "skipping duplicate stop");
                tally.duplicates += 1;
                pb.inc(1);
                continue;
            }
        }

        let mut own = UsedPanoramas::new();
        let used = if args.shared_panoramas { &mut shared } else { &mut own };
        if !args.single {
            spacer.sample(source, &mut poi, used);
        }

        let report = capturer.capture(&mut poi, used);
        tally.pictures += report.saved.len();
        if !report.saved.is_empty() {
            tally.captured += 1;
        }
        if !poi.errors().is_empty() {
            tally.with_errors += 1;
            if show_warnings {
                pb.suspend(|| Status::warning(&poi_summary(&poi)));
            }
        }

        log.upsert(&poi);
        log.save(&args.log)?;
        pb.inc(1);
    }

    Ok(tally)
}
