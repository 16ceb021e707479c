//! `stopscan assess`: amenity scores from detector labels.

use super::Context;
use anyhow::{Context as _, Result};
use owo_colors::OwoColorize;
use std::path::Path;
use stopscan_assess::{assess_log, Amenity, LabelDirDetector, ScoreOptions};
use stopscan_cli::output::{format_count, Status};
use stopscan_core::exit_codes;
use stopscan_core::run_log::RunLog;
use stopscan_core::Error;

pub fn run(ctx: &Context, log_path: &Path, images: Option<&Path>, labels: &Path, output: Option<&Path>) -> Result<i32> {
    if !log_path.exists() {
        return Err(Error::file_not_found(log_path).into());
    }
    let log = RunLog::load(log_path)?;
    let images = images.or_else(|| log_path.parent()).unwrap_or(Path::new("."));
    let detector = LabelDirDetector::new(labels);
    let options = ScoreOptions::from(&ctx.config.schema.assess);

    let results = assess_log(&detector, &log, images, &options);

    if let Some(output) = output {
        let json = serde_json::to_string_pretty(&results)?;
        std::fs::write(output, json).with_context(|| format!("writing {}", output.display()))?;
    }

    if ctx.json {
        ctx.print_json(&results)?;
    } else {
        for stop in &results {
            let marks: Vec<String> = Amenity::ALL
                .iter()
                .map(|a| {
                    if stop.score.present.contains(a) {
                        a.name().green().to_string()
                    } else {
                        a.name().dimmed().to_string()
                    }
                })
                .collect();
            println!("{:>12} {:>4.0}%  {}", stop.stop_id, stop.score.completeness * 100.0, marks.join("  "));
        }
        Status::success(&format!("assessed {}", format_count(results.len(), "stop", "stops")));
    }

    let incomplete = results.iter().any(|r| !r.errors.is_empty() || r.missing_images > 0);
    Ok(if incomplete { exit_codes::PARTIAL_RESULTS } else { exit_codes::SUCCESS })
}
