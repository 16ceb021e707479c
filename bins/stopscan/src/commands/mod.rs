//! Subcommand implementations.
//!
//! Each command returns the process exit code on success so a run that
//! finished with recorded stop errors can report partial results.

pub mod assess;
pub mod heading;
pub mod run;
pub mod sample;

use anyhow::Result;
use indicatif::ProgressBar;
use serde::Serialize;
use stopscan_api_client::{ClientConfig, MapsClient};
use stopscan_cli::progress;
use stopscan_core::config::Config;

/// State shared by every command of one invocation.
pub struct Context {
    pub config: Config,
    pub session_id: String,
    pub json: bool,
}

impl Context {
    /// Mapping client keyed and tagged for this run.
    pub fn client(&self) -> Result<MapsClient> {
        let key = self.config.api_key()?;
        let config = ClientConfig::from_settings(&self.config.schema.api, key)
            .with_session_id(self.session_id.clone());
        Ok(MapsClient::with_config(config)?)
    }

    /// Per-stop progress bar, hidden for JSON output or a non-terminal stderr.
    pub fn progress(&self, total: usize, stage: &str) -> ProgressBar {
        if self.json || !console::Term::stderr().is_term() {
            return progress::hidden();
        }
        progress::stop_progress(total as u64, stage)
    }

    /// Print `value` as pretty JSON on stdout.
    pub fn print_json<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}
