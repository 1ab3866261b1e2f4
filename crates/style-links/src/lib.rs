//! Loading of style documents and their linked resources.
//!
//! [`StyleLoader`] obtains a document (inline JSON, a file or a URL),
//! dereferences its layers, rewrites `mapbox://` links and fetches every
//! linked source and the sprite concurrently. Individual fetch failures are
//! reported as diagnostics instead of failing the load.

pub mod config;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod urls;

pub use config::{LoaderConfig, DEFAULT_API_ROOT};
pub use error::{LinkError, LinkResult};
pub use fetch::{HttpFetcher, RasterHandle, ResourceFetcher};
pub use loader::{LoadedStyle, SpriteData, StyleInput, StyleLoader};
pub use urls::{SpriteUrls, UrlRewriter};
