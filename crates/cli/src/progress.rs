//! Progress indicators for long pipeline stages.

use indicatif::{ProgressBar, ProgressStyle};

/// Per-stop progress bar; the message shows the stop being processed
pub fn stop_progress(total: u64, stage: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{prefix:.bold} [{bar:40.cyan/blue}] {pos}/{len} stops ({eta}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    pb.set_prefix(stage.to_string());
    pb
}

/// Hidden bar for `--json` runs, where stdout carries the report
pub fn hidden() -> ProgressBar {
    ProgressBar::hidden()
}

pub fn finish_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✓ {}", message));
}

pub fn finish_error(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✗ {}", message));
}
