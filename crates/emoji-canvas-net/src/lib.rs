//! HTTP fetching for emoji-canvas.
//!
//! This crate provides the network side of emoji image loading: a small,
//! cloneable [`HttpFetcher`] built on reqwest that returns the raw bytes of
//! an asset URL. Decoding happens in the `emoji-canvas` crate.
//!
//! ```ignore
//! use emoji_canvas_net::HttpFetcher;
//!
//! let fetcher = HttpFetcher::new();
//! let bytes = fetcher
//!     .fetch("https://cdn.jsdelivr.net/gh/twitter/twemoji@14.0.2/assets/svg/1f600.svg")
//!     .await?;
//! ```

mod error;
mod fetcher;

pub use error::{FetchError, Result};
pub use fetcher::{HttpFetcher, HttpFetcherConfig};
