//! Blueprint layout.
//!
//! Layout turns a cluster sequence into drawable [`Blueprint`]s: runs of
//! plain text and isolated emoji, each with a draw origin. Positions are a
//! running fold: every blueprint is placed from the previous blueprint's
//! origin and a fresh measurement of the previous blueprint's text, so the
//! only source of metrics is the drawing surface itself.

use tracing::trace;

use crate::logging::targets;
use crate::segment::{GraphemeCluster, is_emoji_lead};
use crate::types::Point;

/// Measurements of a string as reported by the drawing surface.
///
/// Mirrors the metrics a 2D canvas reports for `measureText`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextMetrics {
    /// Advance width of the string.
    pub width: f32,
    /// Distance from the alignment point to the left edge of the ink box.
    pub actual_bounding_box_left: f32,
    /// Distance from the alignment point to the right edge of the ink box.
    pub actual_bounding_box_right: f32,
    /// Distance from the baseline to the top of the ink box.
    pub actual_bounding_box_ascent: f32,
    /// Distance from the baseline to the bottom of the ink box.
    pub actual_bounding_box_descent: f32,
    /// Distance from the baseline to the top of the em square.
    pub em_height_ascent: f32,
    /// Distance from the baseline to the bottom of the em square.
    pub em_height_descent: f32,
    /// Offset of the alphabetic baseline.
    pub alphabetic_baseline: f32,
}

impl TextMetrics {
    /// Vertical advance from one line's origin to the next.
    #[inline]
    pub fn line_advance(&self) -> f32 {
        self.actual_bounding_box_descent + self.alphabetic_baseline
    }
}

/// One drawable unit: a run of plain text or a single emoji cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct Blueprint {
    /// The run's text, newline included when the run ends a line.
    pub text: String,
    /// Draw origin x (start of the run).
    pub x: f32,
    /// Draw origin y (alphabetic baseline).
    pub y: f32,
    /// Whether the run is an emoji cluster.
    pub is_emoji: bool,
}

impl Blueprint {
    /// The draw origin as a point.
    #[inline]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Returns `true` if the run closes a line.
    #[inline]
    pub fn ends_line(&self) -> bool {
        self.text.ends_with('\n')
    }
}

/// Group clusters into runs.
///
/// Consecutive plain clusters share a run; an emoji cluster always gets a
/// run of its own; a newline cluster ends the run it belongs to. Empty runs
/// are not emitted.
pub fn group_runs(clusters: &[GraphemeCluster<'_>]) -> Vec<Vec<u8>> {
    let mut runs = Vec::new();
    let mut current: Vec<u8> = Vec::new();

    for cluster in clusters {
        if cluster.is_emoji() {
            if !current.is_empty() {
                runs.push(std::mem::take(&mut current));
            }
            runs.push(cluster.as_bytes().to_vec());
            continue;
        }

        current.extend_from_slice(cluster.as_bytes());
        if cluster.is_newline() {
            runs.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        runs.push(current);
    }

    runs
}

/// Lay out clusters starting at `(origin_x, origin_y)`.
///
/// `measure` is called with the text of the previously placed blueprint and
/// must report the same metrics the surface will use when drawing it.
pub fn layout<F>(
    clusters: &[GraphemeCluster<'_>],
    origin_x: f32,
    origin_y: f32,
    mut measure: F,
) -> Vec<Blueprint>
where
    F: FnMut(&str) -> TextMetrics,
{
    let runs = group_runs(clusters);
    let mut blueprints: Vec<Blueprint> = Vec::with_capacity(runs.len());

    for run in runs {
        let (x, y) = match blueprints.last() {
            None => (origin_x, origin_y),
            Some(previous) => {
                let metrics = measure(&previous.text);
                if previous.ends_line() {
                    (origin_x, previous.y + metrics.line_advance())
                } else {
                    (previous.x + metrics.width, previous.y)
                }
            }
        };

        blueprints.push(Blueprint {
            is_emoji: is_emoji_lead(&run),
            text: String::from_utf8_lossy(&run).into_owned(),
            x,
            y,
        });
    }

    trace!(
        target: targets::LAYOUT,
        blueprints = blueprints.len(),
        emoji = blueprints.iter().filter(|b| b.is_emoji).count(),
        "laid out text"
    );

    blueprints
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::segment;

    /// Fixed-advance metrics: 10 units per char, 20 units per line.
    fn measure(text: &str) -> TextMetrics {
        TextMetrics {
            width: text.chars().filter(|c| *c != '\n').count() as f32 * 10.0,
            actual_bounding_box_descent: 4.0,
            alphabetic_baseline: 16.0,
            ..TextMetrics::default()
        }
    }

    fn lay_out(text: &str, x: f32, y: f32) -> Vec<Blueprint> {
        layout(&segment(text), x, y, measure)
    }

    #[test]
    fn test_single_run() {
        let blueprints = lay_out("ab", 0.0, 0.0);
        assert_eq!(blueprints.len(), 1);
        assert_eq!(blueprints[0].text, "ab");
        assert_eq!((blueprints[0].x, blueprints[0].y), (0.0, 0.0));
        assert!(!blueprints[0].is_emoji);
    }

    #[test]
    fn test_newline_starts_new_line() {
        let blueprints = lay_out("a\nb", 0.0, 0.0);
        assert_eq!(blueprints.len(), 2);
        assert_eq!(blueprints[0].text, "a\n");
        assert_eq!(blueprints[1].text, "b");
        assert_eq!(blueprints[1].x, 0.0);
        assert_eq!(blueprints[1].y, 20.0);
    }

    #[test]
    fn test_single_emoji_blueprint() {
        let blueprints = lay_out("😀", 5.0, 7.0);
        assert_eq!(blueprints.len(), 1);
        assert!(blueprints[0].is_emoji);
        assert_eq!(blueprints[0].origin(), Point::new(5.0, 7.0));
    }

    #[test]
    fn test_emoji_advances_by_previous_width() {
        let blueprints = lay_out("ab😀cd", 30.0, 40.0);
        let texts: Vec<_> = blueprints.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, ["ab", "😀", "cd"]);
        assert_eq!(blueprints[1].x, 50.0);
        assert_eq!(blueprints[2].x, 60.0);
        assert!(blueprints.iter().all(|b| b.y == 40.0));
    }

    #[test]
    fn test_adjacent_emoji_are_isolated() {
        let blueprints = lay_out("😀😀", 0.0, 0.0);
        assert_eq!(blueprints.len(), 2);
        assert!(blueprints.iter().all(|b| b.is_emoji && b.text == "😀"));
    }

    #[test]
    fn test_emoji_after_newline_starts_at_origin() {
        let blueprints = lay_out("abc\n😀", 30.0, 40.0);
        assert_eq!(blueprints.len(), 2);
        assert_eq!(blueprints[1].origin(), Point::new(30.0, 60.0));
    }

    #[test]
    fn test_blank_lines() {
        let blueprints = lay_out("a\n\n\nb", 0.0, 0.0);
        let ys: Vec<_> = blueprints.iter().map(|b| b.y).collect();
        assert_eq!(ys, [0.0, 20.0, 40.0, 60.0]);
        assert_eq!(blueprints[3].text, "b");
    }

    #[test]
    fn test_measures_previous_text_only() {
        let mut measured = Vec::new();
        let clusters = segment("ab😀c");
        layout(&clusters, 0.0, 0.0, |text| {
            measured.push(text.to_string());
            measure(text)
        });
        assert_eq!(measured, ["ab", "😀"]);
    }

    #[test]
    fn test_emoji_isolation() {
        let text = "あいう\nえお😄かき👩\u{200D}👩\u{200D}👧\u{200D}👦くけこ\n竈門禰豆子";
        for blueprint in lay_out(text, 0.0, 0.0) {
            if blueprint.is_emoji {
                assert_eq!(segment(&blueprint.text).len(), 1, "{:?}", blueprint.text);
            } else {
                assert!(segment(&blueprint.text).iter().all(|c| !c.is_emoji()));
            }
        }
    }

    #[test]
    fn test_monotonic_lines() {
        let text = "one\ntwo 😀\nthree\n\nfour";
        let blueprints = lay_out(text, 12.0, 3.0);
        let mut line_y = f32::NEG_INFINITY;
        for pair in blueprints.windows(2) {
            if pair[0].ends_line() {
                assert_eq!(pair[1].x, 12.0);
                assert!(pair[1].y > pair[0].y);
                assert!(pair[1].y > line_y);
                line_y = pair[1].y;
            }
        }
    }

    #[test]
    fn test_group_runs_keeps_newline_last() {
        let clusters = segment("x\ny");
        let runs = group_runs(&clusters);
        assert_eq!(runs, [b"x\n".to_vec(), b"y".to_vec()]);
    }

    #[test]
    fn test_empty_text() {
        assert!(lay_out("", 0.0, 0.0).is_empty());
    }
}
