//! Loader configuration.

use std::time::Duration;

use serde::Deserialize;

/// Public Mapbox API root used for `mapbox://` links.
pub const DEFAULT_API_ROOT: &str = "https://api.mapbox.com";

/// Settings for resolving and fetching linked resources.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Token appended to rewritten `mapbox://` URLs
    pub access_token: String,

    /// API root that `mapbox://` URLs are rewritten against
    pub api_root: String,

    /// Display pixel ratio; above 1 the `@2x` sprite is requested
    pub pixel_ratio: f64,

    /// Whole-request timeout
    #[serde(with = "seconds")]
    pub request_timeout: Duration,

    /// TCP connect timeout
    #[serde(with = "seconds")]
    pub connect_timeout: Duration,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            api_root: DEFAULT_API_ROOT.to_string(),
            pixel_ratio: 1.0,
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl LoaderConfig {
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = token.into();
        self
    }

    pub fn with_pixel_ratio(mut self, ratio: f64) -> Self {
        self.pixel_ratio = ratio;
        self
    }
}

/// Durations as (fractional) seconds in config files.
mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoaderConfig::default();
        assert_eq!(config.api_root, "https://api.mapbox.com");
        assert_eq!(config.pixel_ratio, 1.0);
        assert!(config.access_token.is_empty());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: LoaderConfig =
            serde_json::from_str(r#"{"access_token": "pk.x", "request_timeout": 2.5}"#).unwrap();
        assert_eq!(config.access_token, "pk.x");
        assert_eq!(config.request_timeout, Duration::from_millis(2500));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_negative_timeout_rejected() {
        assert!(serde_json::from_str::<LoaderConfig>(r#"{"request_timeout": -1}"#).is_err());
    }
}
