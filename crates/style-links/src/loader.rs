//! Style loading: obtain a document, resolve its links, hand it to the
//! compiler.
//!
//! Loading fails only when the document itself cannot be obtained or is
//! invalid. Every linked resource (sources, sprite) is fetched concurrently
//! and all fetches settle before the result is assembled; a failed fetch
//! leaves its field empty and becomes a [`Diagnostic`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use futures::future::join_all;
use serde_json::Value;
use style_common::{Diagnostic, DiagnosticKind, SourceSpec, StyleDocument, StyleResult};
use style_compiler::{compile_style, dereference_layers, CompiledStyle};
use tracing::{debug, info, instrument, warn};

use crate::config::LoaderConfig;
use crate::error::{LinkError, LinkResult};
use crate::fetch::{HttpFetcher, RasterHandle, ResourceFetcher};
use crate::urls::UrlRewriter;

/// Where a style document comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleInput {
    /// Already-decoded JSON
    Value(Value),
    /// A local file
    Path(PathBuf),
    /// An HTTP(S) or `mapbox://styles/` URL
    Url(String),
}

impl StyleInput {
    /// Interpret a command-line argument: URLs by scheme, anything else as
    /// a path.
    pub fn from_arg(arg: &str) -> Self {
        if ["http://", "https://", "mapbox://"]
            .iter()
            .any(|scheme| arg.starts_with(scheme))
        {
            StyleInput::Url(arg.to_string())
        } else {
            StyleInput::Path(PathBuf::from(arg))
        }
    }
}

impl From<Value> for StyleInput {
    fn from(value: Value) -> Self {
        StyleInput::Value(value)
    }
}

impl From<&Path> for StyleInput {
    fn from(path: &Path) -> Self {
        StyleInput::Path(path.to_path_buf())
    }
}

/// A loaded sprite sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteData {
    pub image: RasterHandle,
    /// Icon name -> `{x, y, width, height, pixelRatio}`
    pub meta: Value,
}

/// A style with its links resolved, ready to compile.
#[derive(Debug, Clone)]
pub struct LoadedStyle {
    /// Dereferenced layers, expanded sources and glyph URL
    pub document: StyleDocument,
    pub sprite: Option<SpriteData>,
    pub diagnostics: Vec<Diagnostic>,
}

impl LoadedStyle {
    /// Compile the loaded document. Load diagnostics come first in the
    /// result.
    pub fn compile(&self) -> StyleResult<CompiledStyle> {
        let mut style = compile_style(&self.document)?;
        style.diagnostics = self
            .diagnostics
            .iter()
            .cloned()
            .chain(style.diagnostics)
            .collect();
        Ok(style)
    }
}

/// Drives loading with a given fetcher.
pub struct StyleLoader<F> {
    fetcher: F,
    rewriter: UrlRewriter,
    strict_refs: bool,
}

impl StyleLoader<HttpFetcher> {
    /// A loader that fetches over HTTP(S).
    pub fn http(config: &LoaderConfig) -> LinkResult<Self> {
        Ok(Self::new(HttpFetcher::new(config)?, UrlRewriter::from_config(config)))
    }
}

impl<F: ResourceFetcher> StyleLoader<F> {
    pub fn new(fetcher: F, rewriter: UrlRewriter) -> Self {
        Self {
            fetcher,
            rewriter,
            strict_refs: false,
        }
    }

    /// Treat a `ref` to a missing layer as a load error.
    pub fn with_strict_refs(mut self, strict: bool) -> Self {
        self.strict_refs = strict;
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Load a style and resolve its links.
    #[instrument(skip(self, input))]
    pub async fn load(&self, input: impl Into<StyleInput>) -> LinkResult<LoadedStyle> {
        let raw = self.read_document(input.into()).await?;
        let mut document = StyleDocument::from_value(raw)?;
        let mut diagnostics = Vec::new();

        let deref = dereference_layers(&document.layers);
        document.layers = if self.strict_refs {
            deref.into_strict()?
        } else {
            diagnostics.extend(deref.diagnostics());
            deref.layers
        };

        document.glyphs = document.glyphs.map(|g| self.rewriter.glyph_url(&g));

        let (sources, sprite) = futures::join!(
            self.expand_sources(&document.sources),
            self.load_sprite(document.sprite.as_deref()),
        );

        let mut expanded = BTreeMap::new();
        for (id, result) in sources {
            match result {
                Ok(source) => {
                    expanded.insert(id, source);
                }
                Err(e) => diagnostics.push(Diagnostic::new(
                    DiagnosticKind::SourceUnavailable,
                    id,
                    e.to_string(),
                )),
            }
        }
        document.sources = expanded;

        let sprite = match sprite {
            Ok(sprite) => sprite,
            Err(e) => {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::SpriteUnavailable,
                    document.sprite.clone().unwrap_or_default(),
                    e.to_string(),
                ));
                None
            }
        };

        for d in &diagnostics {
            warn!(kind = ?d.kind, subject = %d.subject, "{}; continuing without it", d.message);
        }
        info!(
            layers = document.layers.len(),
            sources = document.sources.len(),
            sprite = sprite.is_some(),
            diagnostics = diagnostics.len(),
            "Loaded style"
        );

        Ok(LoadedStyle {
            document,
            sprite,
            diagnostics,
        })
    }

    async fn read_document(&self, input: StyleInput) -> LinkResult<Value> {
        match input {
            StyleInput::Value(value) => Ok(value),
            StyleInput::Path(path) => {
                let text = tokio::fs::read_to_string(&path).await.map_err(|e| LinkError::Io {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
                Ok(serde_json::from_str(&text)?)
            }
            StyleInput::Url(url) => {
                let url = self.rewriter.style_url(&url);
                debug!(url = %url, "Fetching style document");
                self.fetcher.fetch_json(&url).await
            }
        }
    }

    /// Expand every source concurrently. Each result is kept separately so
    /// one failure cannot affect the others.
    async fn expand_sources(
        &self,
        sources: &BTreeMap<String, SourceSpec>,
    ) -> Vec<(String, LinkResult<SourceSpec>)> {
        let pending = sources.iter().map(|(id, source)| async move {
            (id.clone(), self.expand_source(source).await)
        });
        join_all(pending).await
    }

    async fn expand_source(&self, source: &SourceSpec) -> LinkResult<SourceSpec> {
        if source.is_geojson() {
            return self.expand_geojson(source).await;
        }

        let Some(url) = source.url.as_deref() else {
            return Ok(source.clone());
        };

        let url = self.rewriter.tile_url(url);
        let info = match self.fetcher.fetch_json(&url).await? {
            Value::Object(info) => info,
            other => {
                return Err(LinkError::InvalidJson {
                    url,
                    message: format!("TileJSON must be an object, got {}", other),
                })
            }
        };
        Ok(source.merged_with(info)?)
    }

    async fn expand_geojson(&self, source: &SourceSpec) -> LinkResult<SourceSpec> {
        match &source.data {
            Some(Value::String(url)) => {
                let data = self.fetcher.fetch_json(url).await?;
                check_geojson(&data)?;
                let mut expanded = source.clone();
                expanded.data = Some(data);
                Ok(expanded)
            }
            Some(data) => {
                check_geojson(data)?;
                Ok(source.clone())
            }
            None => Err(LinkError::InvalidGeoJson(
                "geojson source has no data".to_string(),
            )),
        }
    }

    /// Image and metadata are fetched together; either failing drops the
    /// sprite.
    async fn load_sprite(&self, sprite: Option<&str>) -> LinkResult<Option<SpriteData>> {
        let Some(sprite) = sprite else {
            return Ok(None);
        };
        let urls = self.rewriter.sprite_urls(sprite);
        let (image, meta) = futures::join!(
            self.fetcher.fetch_image(&urls.image),
            self.fetcher.fetch_json(&urls.meta),
        );
        Ok(Some(SpriteData {
            image: image?,
            meta: meta?,
        }))
    }
}

fn check_geojson(data: &Value) -> LinkResult<()> {
    match data.get("type") {
        Some(Value::String(_)) => Ok(()),
        _ => {
            let shown: String = data.to_string().chars().take(120).collect();
            Err(LinkError::InvalidGeoJson(format!("missing type in {}", shown)))
        }
    }
}
