//! Byte-level grapheme segmentation.
//!
//! The segmenter splits text into user-perceived characters by looking only
//! at UTF-8 lead bytes and a handful of byte signatures that extend a
//! cluster: variation selectors and zero-width-joiner chains. It targets
//! accented Latin text and emoji sequences and makes no attempt at full
//! UAX #29 grapheme breaking.
//!
//! ```
//! use emoji_canvas::segment;
//!
//! let clusters = segment("a👩‍👩‍👧‍👦b");
//! let texts: Vec<_> = clusters.iter().map(|c| c.text().into_owned()).collect();
//! assert_eq!(texts, ["a", "👩‍👩‍👧‍👦", "b"]);
//! assert!(clusters[1].is_emoji());
//! ```

use std::borrow::Cow;
use std::ops::Range;

use tracing::trace;

use crate::logging::targets;

/// Lead byte of a four-byte UTF-8 sequence starting in U+10000..U+3FFFF.
pub const EMOJI_LEAD_BYTE: u8 = 0xF0;

/// Leading bytes of U+FE00..U+FE0F (variation selectors 1-16).
const VARIATION_SELECTOR_01: &[u8] = &[0xEF, 0xB8];
/// Leading bytes of U+E0100..U+E01EF (variation selectors 17-256).
const VARIATION_SELECTOR_02: &[u8] = &[0xF3, 0xA0];
/// U+200D ZERO WIDTH JOINER.
const ZERO_WIDTH_JOINER: &[u8] = &[0xE2, 0x80, 0x8D];

/// Bytes taken per joiner step: the joiner plus one four-byte code point.
const JOINER_STEP: usize = 7;

/// Returns `true` if `bytes` starts a supplementary-plane character.
///
/// This is the single emoji predicate used for both clusters and laid-out
/// runs.
#[inline]
pub fn is_emoji_lead(bytes: &[u8]) -> bool {
    bytes.first() == Some(&EMOJI_LEAD_BYTE)
}

/// Number of bytes that make up the base character led by `head`.
///
/// Lead bytes outside the table count as a single byte.
#[inline]
pub fn sequence_len(head: u8) -> usize {
    match head {
        194 | 195 | 197 | 198 | 203 | 207 => 2,
        224..=233 | 239 => 3,
        240 => 4,
        _ => 1,
    }
}

/// One user-perceived character, borrowed from the segmented text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphemeCluster<'a> {
    bytes: &'a [u8],
    range: Range<usize>,
}

impl<'a> GraphemeCluster<'a> {
    /// Raw bytes of the cluster.
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Byte range of the cluster within the segmented text.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Returns `true` if the cluster starts with a four-byte lead byte.
    #[inline]
    pub fn is_emoji(&self) -> bool {
        is_emoji_lead(self.bytes)
    }

    /// Returns `true` if the cluster is a single line feed.
    #[inline]
    pub fn is_newline(&self) -> bool {
        self.bytes == b"\n"
    }

    /// The cluster as text.
    ///
    /// The byte heuristic can cut a multi-byte character in two; such
    /// fragments decode to U+FFFD.
    pub fn text(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.bytes)
    }
}

/// Split `text` into grapheme clusters.
///
/// Concatenating the bytes of the returned clusters reproduces `text` up to
/// its first NUL byte; segmentation stops there.
pub fn segment(text: &str) -> Vec<GraphemeCluster<'_>> {
    segment_bytes(text.as_bytes())
}

/// Split raw bytes into grapheme clusters.
///
/// See [`segment`]. Accepts input that is not valid UTF-8.
pub fn segment_bytes(bytes: &[u8]) -> Vec<GraphemeCluster<'_>> {
    let mut clusters = Vec::new();
    let mut pos = 0;

    while let Some(&head) = bytes.get(pos) {
        if head == 0 {
            trace!(target: targets::SEGMENT, offset = pos, "stopping at NUL byte");
            break;
        }

        let start = pos;
        pos = advance(bytes, pos, sequence_len(head));

        let rest = &bytes[pos..];
        if rest.starts_with(VARIATION_SELECTOR_01) {
            pos = advance(bytes, pos, 3);
        } else if rest.starts_with(VARIATION_SELECTOR_02) {
            pos = advance(bytes, pos, 4);
        } else if rest.starts_with(ZERO_WIDTH_JOINER) {
            loop {
                pos = advance(bytes, pos, JOINER_STEP);
                if !bytes[pos..].starts_with(ZERO_WIDTH_JOINER) {
                    break;
                }
            }
        }

        clusters.push(GraphemeCluster {
            bytes: &bytes[start..pos],
            range: start..pos,
        });
    }

    trace!(
        target: targets::SEGMENT,
        len = bytes.len(),
        clusters = clusters.len(),
        "segmented text"
    );

    clusters
}

/// Move `pos` forward by `count` bytes, clamped to the end of `bytes`.
#[inline]
fn advance(bytes: &[u8], pos: usize, count: usize) -> usize {
    (pos + count).min(bytes.len())
}
