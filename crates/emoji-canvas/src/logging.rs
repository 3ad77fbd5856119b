//! Tracing targets used by emoji-canvas.
//!
//! The crate emits structured events through the `tracing` crate and never
//! installs a subscriber itself. To see them, install one in your
//! application and filter on the targets below:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("emoji_canvas::resolver=debug")
//!     .init();
//! ```

/// Target names for log filtering.
pub mod targets {
    /// Grapheme segmentation.
    pub const SEGMENT: &str = "emoji_canvas::segment";
    /// Blueprint layout.
    pub const LAYOUT: &str = "emoji_canvas::layout";
    /// Emoji overlay resolution.
    pub const RESOLVER: &str = "emoji_canvas::resolver";
    /// Emoji bitmap cache.
    pub const CACHE: &str = "emoji_canvas::cache";
    /// Image loaders.
    pub const LOADER: &str = "emoji_canvas::loader";
    /// Top-level text drawing.
    pub const RENDERER: &str = "emoji_canvas::renderer";
}

/// Span names used for tracing a single `fill_text` call.
pub mod span_names {
    /// Whole `fill_text` call.
    pub const FILL_TEXT: &str = "emoji_canvas::fill_text";
    /// Overlay resolution for one blueprint.
    pub const RESOLVE: &str = "emoji_canvas::resolve";
}
