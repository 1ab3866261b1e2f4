//! Rewriting of `mapbox://` links into absolute HTTPS URLs.
//!
//! Anything that is not a recognized `mapbox://` link passes through
//! unchanged, so plain HTTP(S) styles work without a token.

use crate::config::LoaderConfig;

const SCHEME: &str = "mapbox://";

/// The two URLs a sprite is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteUrls {
    pub image: String,
    pub meta: String,
}

/// Expands provider links using an access token and API root.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlRewriter {
    access_token: String,
    api_root: String,
    pixel_ratio: f64,
}

impl UrlRewriter {
    pub fn new(access_token: impl Into<String>, api_root: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            api_root: api_root.into().trim_end_matches('/').to_string(),
            pixel_ratio: 1.0,
        }
    }

    pub fn from_config(config: &LoaderConfig) -> Self {
        Self::new(config.access_token.clone(), config.api_root.clone())
            .with_pixel_ratio(config.pixel_ratio)
    }

    pub fn with_pixel_ratio(mut self, ratio: f64) -> Self {
        self.pixel_ratio = ratio;
        self
    }

    fn token_query(&self) -> String {
        format!("access_token={}", self.access_token)
    }

    /// `mapbox://styles/{user}/{id}` -> `{api}/styles/v1/{user}/{id}?access_token=T`
    pub fn style_url(&self, url: &str) -> String {
        match url.strip_prefix("mapbox://styles/") {
            Some(path) => format!("{}/styles/v1/{}?{}", self.api_root, path, self.token_query()),
            None => url.to_string(),
        }
    }

    /// Image and metadata URLs for a sprite base URL.
    pub fn sprite_urls(&self, url: &str) -> SpriteUrls {
        let ratio = if self.pixel_ratio > 1.0 { "@2x" } else { "" };
        match url.strip_prefix("mapbox://sprites/") {
            Some(path) => {
                let base = format!("{}/styles/v1/{}/sprite{}", self.api_root, path, ratio);
                SpriteUrls {
                    image: format!("{}.png?{}", base, self.token_query()),
                    meta: format!("{}.json?{}", base, self.token_query()),
                }
            }
            None => SpriteUrls {
                image: format!("{}{}.png", url, ratio),
                meta: format!("{}{}.json", url, ratio),
            },
        }
    }

    /// `mapbox://fonts/{user}/{fontstack}/{range}.pbf` -> `{api}/fonts/v1/...?access_token=T`
    ///
    /// `{fontstack}` and `{range}` stay as templates.
    pub fn glyph_url(&self, url: &str) -> String {
        match url.strip_prefix("mapbox://fonts/") {
            Some(path) => format!("{}/fonts/v1/{}?{}", self.api_root, path, self.token_query()),
            None => url.to_string(),
        }
    }

    /// `mapbox://{tileset}` -> `{api}/v4/{tileset}.json?secure&access_token=T`
    pub fn tile_url(&self, url: &str) -> String {
        match url.strip_prefix(SCHEME) {
            Some(tileset) => format!(
                "{}/v4/{}.json?secure&{}",
                self.api_root,
                tileset,
                self.token_query()
            ),
            None => url.to_string(),
        }
    }
}

impl Default for UrlRewriter {
    fn default() -> Self {
        Self::from_config(&LoaderConfig::default())
    }
}
