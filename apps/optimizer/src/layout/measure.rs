//! Text Measurement Adapter: line breaking and block height for a string.
//!
//! The paginator never measures text itself; it asks a `TextMeasurer`. The
//! default `StaticMeasurer` is a pure function of (text, font, max width) over
//! the static tables in `font_metrics`, which keeps pagination deterministic.

use crate::layout::font_metrics::{get_metrics, FontSpec};

/// Measures and wraps text for a given font.
pub trait TextMeasurer {
    /// Rendered width of a single line, in points.
    fn text_width(&self, text: &str, font: FontSpec) -> f32;

    /// Greedy word wrap at `max_width` points.
    ///
    /// Explicit newlines start a new line; a word wider than `max_width` is
    /// broken between characters so no text is ever dropped. Empty input
    /// yields no lines.
    fn split_to_size(&self, text: &str, font: FontSpec, max_width: f32) -> Vec<String>;

    /// Height of the wrapped block when every line takes `line_height` points.
    fn wrapped_height(&self, text: &str, font: FontSpec, max_width: f32, line_height: f32) -> f32 {
        self.split_to_size(text, font, max_width).len() as f32 * line_height
    }
}

/// `TextMeasurer` backed by the static base-14 width tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticMeasurer;

impl TextMeasurer for StaticMeasurer {
    fn text_width(&self, text: &str, font: FontSpec) -> f32 {
        get_metrics(font.face).width_pt(text, font.size_pt)
    }

    fn split_to_size(&self, text: &str, font: FontSpec, max_width: f32) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        let metrics = get_metrics(font.face);
        let space_w = metrics.space_width * font.size_pt;
        let mut lines = Vec::new();

        for paragraph in text.split('\n') {
            let mut current = String::new();
            let mut current_width = 0.0_f32;

            for word in paragraph.split_whitespace() {
                let word_w = metrics.width_pt(word, font.size_pt);

                if !current.is_empty() && current_width + space_w + word_w <= max_width {
                    current.push(' ');
                    current.push_str(word);
                    current_width += space_w + word_w;
                    continue;
                }

                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0.0;
                }

                if word_w <= max_width {
                    current.push_str(word);
                    current_width = word_w;
                } else {
                    // Overlong word: hard-break between characters.
                    for c in word.chars() {
                        let mut buf = [0u8; 4];
                        let c_w = metrics.width_pt(c.encode_utf8(&mut buf), font.size_pt);
                        if !current.is_empty() && current_width + c_w > max_width {
                            lines.push(std::mem::take(&mut current));
                            current_width = 0.0;
                        }
                        current.push(c);
                        current_width += c_w;
                    }
                }
            }
            // A blank paragraph still occupies a line.
            lines.push(current);
        }
        lines
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::FontFace;

    const BODY: FontSpec = FontSpec::new(FontFace::Helvetica, 10.0);

    #[test]
    fn test_empty_text_has_no_lines() {
        assert!(StaticMeasurer.split_to_size("", BODY, 100.0).is_empty());
        assert_eq!(StaticMeasurer.wrapped_height("", BODY, 100.0, 12.0), 0.0);
    }

    #[test]
    fn test_short_text_is_one_line() {
        let lines = StaticMeasurer.split_to_size("Rust and Go", BODY, 500.0);
        assert_eq!(lines, vec!["Rust and Go".to_string()]);
    }

    #[test]
    fn test_wrapping_never_exceeds_width() {
        let text = "Architected a distributed caching layer using Redis and consistent hashing, \
                    reducing p99 latency by 40% under 50k RPS peak load across three regions";
        let max_width = 200.0;
        let lines = StaticMeasurer.split_to_size(text, BODY, max_width);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(
                StaticMeasurer.text_width(line, BODY) <= max_width + 1e-3,
                "line too wide: {line}"
            );
        }
        let rejoined = lines.join(" ");
        assert_eq!(
            rejoined.split_whitespace().collect::<Vec<_>>(),
            text.split_whitespace().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_overlong_word_is_broken_not_dropped() {
        let word = "x".repeat(200);
        let lines = StaticMeasurer.split_to_size(&word, BODY, 50.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn test_explicit_newlines_start_new_lines() {
        let lines = StaticMeasurer.split_to_size("first\n\nthird", BODY, 500.0);
        assert_eq!(lines, vec!["first", "", "third"]);
    }

    #[test]
    fn test_wrapped_height_is_lines_times_line_height() {
        let text = "word ".repeat(80);
        let lines = StaticMeasurer.split_to_size(&text, BODY, 150.0).len();
        let height = StaticMeasurer.wrapped_height(&text, BODY, 150.0, 12.0);
        assert!((height - lines as f32 * 12.0).abs() < 1e-4);
    }

    #[test]
    fn test_measurement_is_deterministic() {
        let text = "Led migration of 40 services to Kubernetes";
        let a = StaticMeasurer.split_to_size(text, BODY, 120.0);
        let b = StaticMeasurer.split_to_size(text, BODY, 120.0);
        assert_eq!(a, b);
    }
}
