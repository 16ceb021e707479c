//! Terminal helpers shared by the stopscan binary
//!
//! - Status lines and error reports
//! - Heading, distance and count formatting
//! - Progress bars for per-stop stages

pub mod output;
pub mod progress;
