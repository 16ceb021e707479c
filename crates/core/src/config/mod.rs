//! Configuration loading and schema definitions
//!
//! Settings come from `stopscan.toml` with environment overrides for the
//! API key and request timeout.

mod loader;
mod schema;

pub use loader::{Config, API_KEY_ENV, FALLBACK_API_KEY_ENV, TIMEOUT_ENV};
pub use schema::*;
