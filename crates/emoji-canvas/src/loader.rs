//! Emoji image loading.
//!
//! An [`ImageLoader`] turns an image identifier into a decoded bitmap. Loads
//! are the only points where text drawing suspends.
//!
//! - [`FileImageLoader`] reads assets from disk (e.g. a local Twemoji
//!   checkout).
//! - [`UrlImageLoader`] downloads them over HTTP (feature `networking`).

use std::future::Future;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::bitmap::{EmojiBitmap, decode_bitmap};
use crate::error::{RenderError, RenderResult};
use crate::logging::targets;

/// Loads and decodes emoji images.
///
/// Loads may fail; the error fails the `fill_text` call that asked for the
/// image. Retrying is up to the implementation.
pub trait ImageLoader {
    /// Load the image named by `identifier`.
    fn load(&self, identifier: &str) -> impl Future<Output = RenderResult<EmojiBitmap>> + Send;
}

/// Loads emoji images from the local file system.
#[derive(Debug, Clone, Default)]
pub struct FileImageLoader {
    root: Option<PathBuf>,
}

impl FileImageLoader {
    /// Create a loader that takes identifiers as paths.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader that resolves relative identifiers against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// The directory relative identifiers are resolved against.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Map an identifier to a path. A `file://` prefix is accepted.
    pub fn resolve_path(&self, identifier: &str) -> PathBuf {
        let path = Path::new(identifier.strip_prefix("file://").unwrap_or(identifier));
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl ImageLoader for FileImageLoader {
    async fn load(&self, identifier: &str) -> RenderResult<EmojiBitmap> {
        let path = self.resolve_path(identifier);
        let data = tokio::fs::read(&path)
            .await
            .map_err(|e| RenderError::ImageLoad(format!("{}: {}", path.display(), e)))?;

        debug!(
            target: targets::LOADER,
            path = %path.display(),
            len = data.len(),
            "read emoji asset"
        );

        decode_bitmap(&data)
    }
}

/// Downloads emoji images over HTTP.
#[cfg(feature = "networking")]
#[derive(Debug, Clone, Default)]
pub struct UrlImageLoader {
    fetcher: emoji_canvas_net::HttpFetcher,
}

#[cfg(feature = "networking")]
impl UrlImageLoader {
    /// Create a loader with a default HTTP fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader that uses `fetcher`.
    pub fn with_fetcher(fetcher: emoji_canvas_net::HttpFetcher) -> Self {
        Self { fetcher }
    }

    /// The underlying fetcher.
    pub fn fetcher(&self) -> &emoji_canvas_net::HttpFetcher {
        &self.fetcher
    }
}

#[cfg(feature = "networking")]
impl ImageLoader for UrlImageLoader {
    async fn load(&self, identifier: &str) -> RenderResult<EmojiBitmap> {
        let data = self.fetcher.fetch(identifier).await?;

        debug!(
            target: targets::LOADER,
            url = identifier,
            len = data.len(),
            "downloaded emoji asset"
        );

        decode_bitmap(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::tests::{SMILE_SVG, png_bytes};

    #[test]
    fn test_resolve_path() {
        let loader = FileImageLoader::with_root("/assets");
        assert_eq!(loader.resolve_path("svg/1f600.svg"), PathBuf::from("/assets/svg/1f600.svg"));
        assert_eq!(loader.resolve_path("/abs/1f600.svg"), PathBuf::from("/abs/1f600.svg"));
        assert_eq!(
            loader.resolve_path("file:///abs/1f600.svg"),
            PathBuf::from("/abs/1f600.svg")
        );
        assert_eq!(FileImageLoader::new().resolve_path("x.png"), PathBuf::from("x.png"));
    }

    #[tokio::test]
    async fn test_file_loader_reads_svg_and_png() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("1f600.svg"), SMILE_SVG).unwrap();
        std::fs::write(dir.path().join("1f600.png"), png_bytes(72, 72)).unwrap();

        let loader = FileImageLoader::with_root(dir.path());
        let svg = loader.load("1f600.svg").await.unwrap();
        assert_eq!(svg.natural_width(), 36);
        let png = loader.load("1f600.png").await.unwrap();
        assert_eq!(png.natural_width(), 72);
    }

    #[tokio::test]
    async fn test_file_loader_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let loader = FileImageLoader::with_root(dir.path());
        let err = loader.load("missing.svg").await.unwrap_err();
        match err {
            RenderError::ImageLoad(msg) => assert!(msg.contains("missing.svg")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_file_loader_undecodable_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.png"), b"nope").unwrap();
        let loader = FileImageLoader::with_root(dir.path());
        let err = loader.load("bad.png").await.unwrap_err();
        assert!(matches!(err, RenderError::ImageDecode(_)));
    }
}
