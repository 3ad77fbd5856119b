//! Emoji-to-image mapping.
//!
//! An [`EmojiMapper`] decides whether a cluster is an emoji it has artwork
//! for and, if so, names the image. [`TwemojiMapper`] builds Twemoji asset
//! URLs from code points the way Twemoji names its files.

use std::fmt::Write as FmtWrite;

/// Default Twemoji asset location.
pub const DEFAULT_TWEMOJI_BASE_URL: &str =
    "https://cdn.jsdelivr.net/gh/twitter/twemoji@14.0.2/assets/";

const ZERO_WIDTH_JOINER: char = '\u{200D}';
const VARIATION_SELECTOR_16: char = '\u{FE0F}';
const CANCEL_TAG: char = '\u{E007F}';

/// A mapped emoji sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmojiMatch {
    /// The part of the cluster that was recognised.
    pub text: String,
    /// Stable image identifier (URL or path) for the sequence.
    pub identifier: String,
}

/// Maps grapheme clusters to emoji images.
pub trait EmojiMapper {
    /// Find the emoji at the start of `cluster`, if there is artwork for it.
    fn find(&self, cluster: &str) -> Option<EmojiMatch>;
}

impl<M: EmojiMapper + ?Sized> EmojiMapper for &M {
    fn find(&self, cluster: &str) -> Option<EmojiMatch> {
        (**self).find(cluster)
    }
}

/// Which Twemoji asset flavour to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TwemojiAsset {
    /// Vector assets (`svg/<code>.svg`), natural size 36x36.
    #[default]
    Svg,
    /// Raster assets (`72x72/<code>.png`).
    Png72,
}

impl TwemojiAsset {
    fn directory(self) -> &'static str {
        match self {
            TwemojiAsset::Svg => "svg",
            TwemojiAsset::Png72 => "72x72",
        }
    }

    fn extension(self) -> &'static str {
        match self {
            TwemojiAsset::Svg => "svg",
            TwemojiAsset::Png72 => "png",
        }
    }
}

/// Configuration for [`TwemojiMapper`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwemojiConfig {
    /// Base URL or directory holding the `svg/` and `72x72/` folders.
    pub base_url: String,
    /// Asset flavour.
    pub asset: TwemojiAsset,
}

impl Default for TwemojiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_TWEMOJI_BASE_URL.to_string(),
            asset: TwemojiAsset::default(),
        }
    }
}

impl TwemojiConfig {
    /// Set the base URL (or local directory) of the asset tree.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the asset flavour.
    #[must_use]
    pub fn with_asset(mut self, asset: TwemojiAsset) -> Self {
        self.asset = asset;
        self
    }
}

/// Maps emoji clusters to Twemoji asset URLs.
///
/// ```
/// use emoji_canvas::{EmojiMapper, TwemojiMapper};
///
/// let mapper = TwemojiMapper::default();
/// let hit = mapper.find("😀").unwrap();
/// assert!(hit.identifier.ends_with("/svg/1f600.svg"));
/// assert!(mapper.find("a").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TwemojiMapper {
    config: TwemojiConfig,
}

impl TwemojiMapper {
    /// Create a mapper with custom configuration.
    pub fn new(config: TwemojiConfig) -> Self {
        Self { config }
    }

    /// Get the mapper configuration.
    pub fn config(&self) -> &TwemojiConfig {
        &self.config
    }

    /// Build the asset identifier for a Twemoji file code.
    pub fn asset_url(&self, code: &str) -> String {
        format!(
            "{}/{}/{}.{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.asset.directory(),
            code,
            self.config.asset.extension()
        )
    }
}

impl EmojiMapper for TwemojiMapper {
    fn find(&self, cluster: &str) -> Option<EmojiMatch> {
        let len = sequence_prefix_len(cluster);
        if len == 0 {
            return None;
        }
        let text = &cluster[..len];

        Some(EmojiMatch {
            text: text.to_string(),
            identifier: self.asset_url(&twemoji_code(text)),
        })
    }
}

/// Byte length of the well-formed emoji sequence at the start of `text`.
///
/// A sequence is one element followed by any number of joiner-element
/// pairs. A joiner that is not followed by a complete element ends the
/// sequence before the joiner, so a cluster cut inside a ZWJ sequence
/// falls back to its leading emoji. Returns 0 if `text` does not start
/// with an emoji.
fn sequence_prefix_len(text: &str) -> usize {
    let mut end = element_len(text, false);
    if end == 0 {
        return 0;
    }

    while let Some(rest) = text[end..].strip_prefix(ZERO_WIDTH_JOINER) {
        let len = element_len(rest, true);
        if len == 0 {
            break;
        }
        end += ZERO_WIDTH_JOINER.len_utf8() + len;
    }

    end
}

/// Byte length of one emoji element at the start of `text`, or 0.
///
/// An element is a pictographic base with an optional regional indicator
/// pair or skin tone, an optional U+FE0F and an optional terminated tag
/// sequence. Inside a joined sequence, symbols from the basic plane only
/// count with U+FE0F, which is how Twemoji names those files.
fn element_len(text: &str, joined: bool) -> usize {
    let mut chars = text.char_indices().peekable();
    let Some((_, base)) = chars.next() else {
        return 0;
    };
    if !is_pictographic(base) {
        return 0;
    }

    if is_regional_indicator(base) {
        chars.next_if(|&(_, c)| is_regional_indicator(c));
    } else if !is_skin_tone(base) {
        chars.next_if(|&(_, c)| is_skin_tone(c));
    }

    let presented = chars
        .next_if(|&(_, c)| c == VARIATION_SELECTOR_16)
        .is_some();
    if joined && !presented && (base as u32) < 0x10000 {
        return 0;
    }

    let mut tags = chars.clone();
    let mut tagged = false;
    while tags.next_if(|&(_, c)| is_tag(c)).is_some() {
        tagged = true;
    }
    if tagged && tags.next_if(|&(_, c)| c == CANCEL_TAG).is_some() {
        chars = tags;
    }

    chars.peek().map_or(text.len(), |&(i, _)| i)
}

/// Twemoji file code for an emoji sequence: lowercase hex code points
/// joined by `-`, with U+FE0F dropped unless the sequence contains a
/// zero-width joiner.
pub fn twemoji_code(sequence: &str) -> String {
    let keep_selectors = sequence.contains(ZERO_WIDTH_JOINER);
    let mut code = String::new();
    for c in sequence
        .chars()
        .filter(|&c| keep_selectors || c != VARIATION_SELECTOR_16)
    {
        if !code.is_empty() {
            code.push('-');
        }
        let _ = write!(code, "{:x}", c as u32);
    }
    code
}

/// Code points that start an emoji presentation sequence.
pub fn is_pictographic(c: char) -> bool {
    matches!(
        c as u32,
        // Mahjong, domino and playing cards
        0x1F000..=0x1F0FF |
        // Enclosed alphanumeric supplement, regional indicators
        0x1F100..=0x1F1FF |
        // Enclosed ideographic supplement
        0x1F200..=0x1F2FF |
        // Pictographs, emoticons, transport
        0x1F300..=0x1F6FF |
        // Geometric shapes extended
        0x1F780..=0x1F7FF |
        // Supplemental symbols and pictographs, extended-A
        0x1F900..=0x1FAFF |
        // Watch, hourglass, keyboard, media controls
        0x231A..=0x231B | 0x2328 | 0x23CF | 0x23E9..=0x23F3 | 0x23F8..=0x23FA |
        // Miscellaneous symbols and dingbats
        0x2600..=0x27BF |
        // Arrows, squares, star, circle
        0x2934..=0x2935 | 0x2B05..=0x2B07 | 0x2B1B..=0x2B1C | 0x2B50 | 0x2B55 |
        // Other emoji-capable symbols
        0x203C | 0x2049 | 0x2122 | 0x2139 | 0x2194..=0x2199 | 0x21A9..=0x21AA |
        0x24C2 | 0x25AA..=0x25AB | 0x25B6 | 0x25C0 | 0x25FB..=0x25FE |
        0x3030 | 0x303D | 0x3297 | 0x3299 | 0x00A9 | 0x00AE
    )
}

fn is_regional_indicator(c: char) -> bool {
    matches!(c as u32, 0x1F1E6..=0x1F1FF)
}

fn is_skin_tone(c: char) -> bool {
    matches!(c as u32, 0x1F3FB..=0x1F3FF)
}

/// Tag characters used by subdivision flags, excluding the terminator.
fn is_tag(c: char) -> bool {
    matches!(c as u32, 0xE0020..=0xE007E)
}
