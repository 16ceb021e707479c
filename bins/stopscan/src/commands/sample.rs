//! `stopscan sample`: offline vantage planning along each stop's road.

use super::Context;
use anyhow::Result;
use std::path::Path;
use stopscan_cli::output::{format_count, format_heading, poi_summary, Status};
use stopscan_cli::progress;
use stopscan_core::exit_codes;
use stopscan_core::model::{PoiError, PointOfInterest};
use stopscan_core::run_log::RunLog;
use stopscan_core::stops::load_stops;
use stopscan_multipoint::{find_road, plan_vantages, SamplingOptions};
use tracing::info;

const PLAN_CONTEXT: &str = "planning vantages";

pub fn run(ctx: &Context, stops: &Path, id_property: Option<&str>, limit: Option<usize>) -> Result<i32> {
    let options = SamplingOptions::from(&ctx.config.schema.sampling);
    options.validate()?;
    let client = ctx.client()?;

    let mut pois = load_stops(stops, id_property)?;
    pois.truncate(limit.unwrap_or(usize::MAX));
    info!(stops = pois.len(), "planning vantages");

    let pb = ctx.progress(pois.len(), "sample");
    let mut plan = RunLog::new();
    let mut with_errors = 0;

    for poi in &mut pois {
        pb.set_message(poi.id().to_string());
        plan_one(&client, poi, &options);
        if !poi.errors().is_empty() {
            with_errors += 1;
        }
        plan.upsert(poi);
        pb.inc(1);
    }
    progress::finish_success(&pb, "planned");

    if ctx.json {
        ctx.print_json(&plan)?;
    } else {
        for poi in &pois {
            Status::info(&poi_summary(poi));
            for v in poi.vantages() {
                let heading = v.heading.map(format_heading).unwrap_or_else(|| "-".into());
                println!("    #{} offset {:>3} at {} facing {}", v.number(), v.offset.unwrap_or(0), v.coords, heading);
            }
        }
        Status::success(&format!("planned {}", format_count(pois.len(), "stop", "stops")));
    }

    Ok(if with_errors > 0 { exit_codes::PARTIAL_RESULTS } else { exit_codes::SUCCESS })
}

fn plan_one(client: &stopscan_api_client::MapsClient, poi: &mut PointOfInterest, options: &SamplingOptions) {
    let road = match find_road(client, poi.coords, options.search_radius_m, options.crs) {
        Ok(road) => road,
        Err(e) => {
            poi.record_error(PoiError::new(e.kind(), PLAN_CONTEXT, e.to_string()));
            return;
        }
    };
    if let Err(e) = plan_vantages(poi, &road, options) {
        poi.record_error(PoiError::new(e.kind(), PLAN_CONTEXT, e.to_string()));
    }
}
