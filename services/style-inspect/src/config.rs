//! Loader configuration from a YAML file plus command-line overrides.
//!
//! Precedence, lowest first: built-in defaults, the `--config` file, then
//! flags and environment variables.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use style_links::LoaderConfig;
use tracing::debug;

/// Settings that can appear in the YAML file. Everything is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub access_token: Option<String>,
    pub api_root: Option<String>,
    pub pixel_ratio: Option<f64>,
    /// Seconds
    pub request_timeout: Option<f64>,
    /// Seconds
    pub connect_timeout: Option<f64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: FileConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        debug!(path = %path.display(), "Loaded loader config");
        Ok(config)
    }
}

/// Values taken from flags or the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub access_token: Option<String>,
    pub api_root: Option<String>,
    pub pixel_ratio: Option<f64>,
}

fn seconds(value: f64, field: &str) -> Result<Duration> {
    Duration::try_from_secs_f64(value).with_context(|| format!("Invalid {}: {}", field, value))
}

/// Merge defaults, file settings and overrides.
pub fn resolve(file: Option<FileConfig>, overrides: Overrides) -> Result<LoaderConfig> {
    let mut config = LoaderConfig::default();

    if let Some(file) = file {
        if let Some(token) = file.access_token {
            config.access_token = token;
        }
        if let Some(root) = file.api_root {
            config.api_root = root;
        }
        if let Some(ratio) = file.pixel_ratio {
            config.pixel_ratio = ratio;
        }
        if let Some(t) = file.request_timeout {
            config.request_timeout = seconds(t, "request_timeout")?;
        }
        if let Some(t) = file.connect_timeout {
            config.connect_timeout = seconds(t, "connect_timeout")?;
        }
    }

    if let Some(token) = overrides.access_token {
        config.access_token = token;
    }
    if let Some(root) = overrides.api_root {
        config.api_root = root;
    }
    if let Some(ratio) = overrides.pixel_ratio {
        config.pixel_ratio = ratio;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
access_token: pk.file
pixel_ratio: 2
request_timeout: 5
"#;
        let file: FileConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(file.access_token.as_deref(), Some("pk.file"));
        assert_eq!(file.pixel_ratio, Some(2.0));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(serde_yaml::from_str::<FileConfig>("acces_token: typo").is_err());
    }

    #[test]
    fn test_overrides_win_over_file() {
        let file = FileConfig {
            access_token: Some("pk.file".into()),
            pixel_ratio: Some(2.0),
            request_timeout: Some(5.0),
            ..Default::default()
        };
        let overrides = Overrides {
            access_token: Some("pk.env".into()),
            ..Default::default()
        };
        let config = resolve(Some(file), overrides).unwrap();
        assert_eq!(config.access_token, "pk.env");
        assert_eq!(config.pixel_ratio, 2.0);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.api_root, "https://api.mapbox.com");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_root: https://tiles.example.com").unwrap();
        let config = FileConfig::load(file.path()).unwrap();
        assert_eq!(config.api_root.as_deref(), Some("https://tiles.example.com"));
    }

    #[test]
    fn test_negative_timeout_is_an_error() {
        let file = FileConfig {
            connect_timeout: Some(-1.0),
            ..Default::default()
        };
        assert!(resolve(Some(file), Overrides::default()).is_err());
    }
}
