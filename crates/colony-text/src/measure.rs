use colony_core::FontRole;
use unicode_segmentation::UnicodeSegmentation;

/// Face + pixel size a label is laid out with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub role: FontRole,
    pub size: f32,
}

impl TextStyle {
    pub const fn new(role: FontRole, size: f32) -> Self {
        Self { role, size }
    }
}

/// Pixel measurement of single-line strings.
pub trait TextMeasurer {
    /// Advance width of `text` laid out on one line.
    fn measure(&self, style: TextStyle, text: &str) -> f32;

    /// Distance between consecutive baselines.
    fn line_height(&self, style: TextStyle) -> f32 {
        style.size * 1.3
    }

    /// Distance from the top of the line box to the baseline.
    fn ascent(&self, style: TextStyle) -> f32 {
        style.size * 0.8
    }
}

/// Deterministic measurer: every grapheme advances `size * factor`.
/// Layout code uses it before fonts are available and tests use it to get
/// reproducible wrapping.
#[derive(Clone, Copy, Debug)]
pub struct FixedAdvance {
    pub factor: f32,
}

impl Default for FixedAdvance {
    fn default() -> Self {
        Self { factor: 0.5 }
    }
}

impl TextMeasurer for FixedAdvance {
    fn measure(&self, style: TextStyle, text: &str) -> f32 {
        text.graphemes(true).count() as f32 * style.size * self.factor
    }
}

/// Shorten `text` with a trailing ellipsis until it fits `max_width`.
pub fn ellipsize(measurer: &dyn TextMeasurer, style: TextStyle, text: &str, max_width: f32) -> String {
    if max_width <= 0.0 || measurer.measure(style, text) <= max_width {
        return text.to_string();
    }
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    let mut keep = graphemes.len();
    while keep > 0 {
        keep -= 1;
        let candidate = format!("{}…", graphemes[..keep].concat().trim_end());
        if measurer.measure(style, &candidate) <= max_width {
            return candidate;
        }
    }
    "…".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLE: TextStyle = TextStyle::new(FontRole::Ui, 10.0);

    #[test]
    fn fixed_advance_counts_graphemes() {
        let m = FixedAdvance::default();
        assert_eq!(m.measure(STYLE, "abc"), 15.0);
        // e + combining acute is one grapheme
        assert_eq!(m.measure(STYLE, "e\u{301}"), 5.0);
    }

    #[test]
    fn ellipsize_fits_budget() {
        let m = FixedAdvance::default();
        assert_eq!(ellipsize(&m, STYLE, "short", 100.0), "short");
        let cut = ellipsize(&m, STYLE, "a much longer label", 40.0);
        assert!(cut.ends_with('…'));
        assert!(m.measure(STYLE, &cut) <= 40.0);
    }
}
