//! Fetching linked JSON documents and images.

use std::io::Cursor;

use async_trait::async_trait;
use bytes::Bytes;
use image::io::Reader as ImageReader;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::LoaderConfig;
use crate::error::{LinkError, LinkResult};

/// A validated raster: the encoded bytes plus their decoded dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterHandle {
    pub bytes: Bytes,
    pub width: u32,
    pub height: u32,
}

impl RasterHandle {
    /// Read the header of an encoded image and check it has pixels.
    pub fn from_encoded(url: &str, bytes: Bytes) -> LinkResult<Self> {
        let invalid = |message: String| LinkError::InvalidImage {
            url: url.to_string(),
            message,
        };

        let (width, height) = ImageReader::new(Cursor::new(bytes.as_ref()))
            .with_guessed_format()
            .map_err(|e| invalid(e.to_string()))?
            .into_dimensions()
            .map_err(|e| invalid(e.to_string()))?;

        if width == 0 || height == 0 {
            return Err(invalid(format!("empty image {}x{}", width, height)));
        }

        Ok(Self {
            bytes,
            width,
            height,
        })
    }
}

/// Source of linked resources. Both calls may fail; callers decide whether
/// a failure is fatal.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Fetch and parse a JSON document.
    async fn fetch_json(&self, url: &str) -> LinkResult<Value>;

    /// Fetch and validate an image.
    async fn fetch_image(&self, url: &str) -> LinkResult<RasterHandle>;
}

/// HTTP(S) fetcher backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &LoaderConfig) -> LinkResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .tcp_nodelay(true)
            .build()
            .map_err(|e| LinkError::request("<client>", e))?;

        Ok(Self { client })
    }

    async fn get_bytes(&self, url: &str) -> LinkResult<Bytes> {
        if url.is_empty() {
            return Err(LinkError::InvalidUrl(url.to_string()));
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LinkError::request(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LinkError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| LinkError::request(url, e))?;
        debug!(bytes = body.len(), "Fetched resource");
        Ok(body)
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    #[instrument(skip(self), fields(url = %url))]
    async fn fetch_json(&self, url: &str) -> LinkResult<Value> {
        let body = self.get_bytes(url).await?;
        serde_json::from_slice(&body).map_err(|e| LinkError::InvalidJson {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    #[instrument(skip(self), fields(url = %url))]
    async fn fetch_image(&self, url: &str) -> LinkResult<RasterHandle> {
        let body = self.get_bytes(url).await?;
        RasterHandle::from_encoded(url, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(width: u32, height: u32) -> Bytes {
        let img = image::RgbaImage::new(width, height);
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageOutputFormat::Png).unwrap();
        Bytes::from(out.into_inner())
    }

    #[test]
    fn test_raster_handle_reads_dimensions() {
        let handle = RasterHandle::from_encoded("mem://sprite.png", png(4, 3)).unwrap();
        assert_eq!((handle.width, handle.height), (4, 3));
    }

    #[test]
    fn test_raster_handle_rejects_garbage() {
        let err = RasterHandle::from_encoded("mem://x", Bytes::from_static(b"not an image"));
        assert!(matches!(err, Err(LinkError::InvalidImage { .. })));
    }

    #[test]
    fn test_empty_url_rejected() {
        let fetcher = HttpFetcher::new(&LoaderConfig::default()).unwrap();
        let result = tokio_test::block_on(fetcher.fetch_json(""));
        assert!(matches!(result, Err(LinkError::InvalidUrl(_))));
    }
}
