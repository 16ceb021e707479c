//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result, ResultExt};
use std::path::Path;

/// Primary API key variable
pub const API_KEY_ENV: &str = "STOPSCAN_API_KEY";
/// Accepted for compatibility with existing Maps setups
pub const FALLBACK_API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";
/// Request timeout override, in seconds
pub const TIMEOUT_ENV: &str = "STOPSCAN_TIMEOUT_SECS";

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<String>,
}

impl Config {
    /// Load configuration from a file path or the standard locations,
    /// falling back to defaults, then apply environment overrides.
    ///
    /// An explicit `path` that does not exist is an error; a missing
    /// file in the standard locations is not.
    pub fn load(path: Option<&str>) -> Result<Self> {
        if let Some(p) = path {
            if !Path::new(p).exists() {
                return Err(Error::config_not_found(p));
            }
        }

        let config_path = path.map(String::from).or_else(find_config_file);

        let schema = match config_path {
            Some(ref p) => load_config_file(p)?,
            None => ConfigSchema::default(),
        };

        let mut config = Self { schema, path: config_path };
        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string (no overrides applied)
    pub fn from_toml(content: &str) -> Result<Self> {
        let schema: ConfigSchema = toml::from_str(content)?;
        let config = Self { schema, path: None };
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            self.schema.api.timeout_secs = raw.trim().parse().map_err(|_| {
                Error::config_invalid(format!("{TIMEOUT_ENV} must be a whole number of seconds, got '{raw}'"))
            })?;
        }
        Ok(())
    }

    /// Validate value ranges across all sections
    pub fn validate(&self) -> Result<()> {
        let s = &self.schema;

        if s.api.timeout_secs == 0 {
            return Err(Error::config_invalid("api.timeout_secs must be greater than 0"));
        }
        if s.api.requests_per_second == 0 {
            return Err(Error::config_invalid("api.requests_per_second must be greater than 0"));
        }
        if !(s.sampling.min_interval_m.is_finite() && s.sampling.min_interval_m > 0.0) {
            return Err(Error::config_invalid("sampling.min_interval_m must be a positive distance"));
        }
        if !(s.sampling.add_interval_m.is_finite() && s.sampling.add_interval_m > 0.0) {
            return Err(Error::config_invalid("sampling.add_interval_m must be a positive distance"));
        }
        if !(s.sampling.search_radius_m.is_finite() && s.sampling.search_radius_m > 0.0) {
            return Err(Error::config_invalid("sampling.search_radius_m must be a positive distance"));
        }
        if !(10..=120).contains(&s.capture.fov) {
            return Err(Error::config_invalid(format!(
                "capture.fov must be between 10 and 120 degrees, got {}",
                s.capture.fov
            )));
        }
        if s.capture.width == 0 || s.capture.height == 0 {
            return Err(Error::config_invalid("capture.width and capture.height must be non-zero"));
        }
        if s.capture.keyword.trim().is_empty() {
            return Err(Error::config_invalid("capture.keyword must not be empty"));
        }
        for (name, value) in [
            ("assess.score_threshold", s.assess.score_threshold),
            ("assess.presence_threshold", s.assess.presence_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::config_invalid(format!("{name} must be within 0..=1, got {value}")));
            }
        }

        Ok(())
    }

    /// Resolve the API key from the environment, then from `api.key_path`
    pub fn api_key(&self) -> Result<String> {
        self.api_key_with(|name| std::env::var(name).ok())
    }

    /// Like [`Config::api_key`] with an explicit variable lookup
    pub fn api_key_with<F>(&self, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_env = [API_KEY_ENV, FALLBACK_API_KEY_ENV]
            .into_iter()
            .filter_map(|name| lookup(name))
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty());
        if let Some(key) = from_env {
            return Ok(key);
        }

        let key_path = &self.schema.api.key_path;
        match std::fs::read_to_string(key_path) {
            Ok(content) if !content.trim().is_empty() => Ok(content.trim().to_string()),
            Ok(_) => Err(Error::missing_api_key(key_path)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::missing_api_key(key_path))
            }
            Err(e) => Err(Error::from(e)).context(format!("While reading {key_path}")),
        }
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<String> {
    let candidates = [".stopscan.toml", "stopscan.toml", ".config/stopscan.toml"];

    candidates
        .into_iter()
        .find(|candidate| Path::new(candidate).exists())
        .map(String::from)
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &str) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path)
        .map_err(Error::from)
        .context(format!("Failed to read config file {path}"))?;

    toml::from_str(&content)
        .map_err(Error::from)
        .context(format!("Failed to parse config file {path}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::io::Write;
    use stopscan_geo::Crs;
    use tempfile::NamedTempFile;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.path.is_none());
        assert_eq!(config.schema.api.timeout_secs, 10);
        assert_eq!(config.schema.sampling.before, 1);
        assert_eq!(config.schema.sampling.min_interval_m, 6.0);
        assert_eq!(config.schema.sampling.crs, Crs::Local);
        assert_eq!(config.schema.capture.fov, 45);
        assert_eq!(config.schema.capture.keyword, "bus stop");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [sampling]
            before = 3
            crs = "web-mercator"

            [capture]
            stitch_clockwise = 1
            "#,
        )
        .unwrap();

        assert_eq!(config.schema.sampling.before, 3);
        assert_eq!(config.schema.sampling.after, 1);
        assert_eq!(config.schema.sampling.crs, Crs::WebMercator);
        assert_eq!(config.schema.capture.stitch_clockwise, 1);
        assert_eq!(config.schema.capture.width, 640);
    }

    #[test]
    fn test_validation_rejects_zero_add_interval() {
        let err = Config::from_toml("[sampling]\nadd_interval_m = 0.0\n").unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigValidationError);
        assert!(err.message.contains("add_interval_m"));
    }

    #[test]
    fn test_validation_rejects_fov_out_of_range() {
        assert!(Config::from_toml("[capture]\nfov = 150\n").is_err());
        assert!(Config::from_toml("[capture]\nfov = 120\n").is_ok());
    }

    #[test]
    fn test_parse_error_code() {
        let err = Config::from_toml("[sampling\nbefore = 1").unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigParseError);
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[assess]\nscore_threshold = 0.3").unwrap();

        let config = Config::load(file.path().to_str()).unwrap();
        assert_eq!(config.schema.assess.score_threshold, 0.3);
        assert!(config.path.is_some());
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some("/nonexistent/stopscan.toml")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigNotFound);
    }

    #[test]
    fn test_timeout_override() {
        let mut config = Config::default();
        config
            .apply_env_overrides(|name| (name == TIMEOUT_ENV).then(|| "30".to_string()))
            .unwrap();
        assert_eq!(config.schema.api.timeout_secs, 30);

        let bad = config.apply_env_overrides(|_| Some("soon".to_string()));
        assert!(bad.is_err());
    }

    #[test]
    fn test_api_key_env_precedence() {
        let config = Config::default();
        let key = config
            .api_key_with(|name| match name {
                API_KEY_ENV => Some("  ".to_string()),
                FALLBACK_API_KEY_ENV => Some("fallback-key".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(key, "fallback-key");
    }

    #[test]
    fn test_api_key_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "file-key\n").unwrap();

        let mut config = Config::default();
        config.schema.api.key_path = file.path().display().to_string();
        assert_eq!(config.api_key_with(no_env).unwrap(), "file-key");
    }

    #[test]
    fn test_api_key_missing() {
        let mut config = Config::default();
        config.schema.api.key_path = "/nonexistent/key.txt".to_string();
        let err = config.api_key_with(no_env).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingApiKey);
    }
}
