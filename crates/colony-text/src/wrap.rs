//! Greedy word wrapping against a pixel budget.
//!
//! Words are extended onto the current line while the measured width stays
//! within `max_width`. A word wider than the budget on its own is broken at
//! grapheme boundaries, so multi-byte codepoints are never split. `\n`, `\r`
//! and `\r\n` always end a line, even an empty one.

use crate::measure::{TextMeasurer, TextStyle};
use unicode_segmentation::UnicodeSegmentation;

/// Wrap `text` into lines no wider than `max_width`.
///
/// Degrades to a single unwrapped line when there is no measurer or the
/// budget is not positive.
pub fn wrap_text_to_width(
    measurer: Option<&dyn TextMeasurer>,
    style: TextStyle,
    text: &str,
    max_width: f32,
) -> Vec<String> {
    let Some(measurer) = measurer else {
        return vec![text.to_string()];
    };
    if !(max_width > 0.0) {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    for paragraph in split_paragraphs(text) {
        wrap_paragraph(measurer, style, paragraph, max_width, &mut lines);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Split on explicit line terminators, treating `\r\n` as one break.
fn split_paragraphs(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' => {
                out.push(&text[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            b'\n' => {
                out.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    out.push(&text[start..]);
    out
}

fn wrap_paragraph(
    measurer: &dyn TextMeasurer,
    style: TextStyle,
    paragraph: &str,
    max_width: f32,
    lines: &mut Vec<String>,
) {
    let mut current = String::new();
    for word in paragraph.split_whitespace() {
        if current.is_empty() {
            current = place_word(measurer, style, word, max_width, lines);
            continue;
        }
        let candidate = format!("{current} {word}");
        if measurer.measure(style, &candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current = place_word(measurer, style, word, max_width, lines);
        }
    }
    // Whitespace-only and empty paragraphs still occupy a line.
    lines.push(current);
}

/// Start a fresh line with `word`, emitting full-width chunks first when the
/// word alone overflows. Returns what is left for the open line.
fn place_word(
    measurer: &dyn TextMeasurer,
    style: TextStyle,
    word: &str,
    max_width: f32,
    lines: &mut Vec<String>,
) -> String {
    if measurer.measure(style, word) <= max_width {
        return word.to_string();
    }
    let mut rest = word;
    loop {
        let cut = fitting_prefix_len(measurer, style, rest, max_width);
        if cut == rest.len() {
            return rest.to_string();
        }
        lines.push(rest[..cut].to_string());
        rest = &rest[cut..];
    }
}

/// Byte length of the longest grapheme prefix of `s` that fits. Always at
/// least one grapheme so progress is guaranteed.
fn fitting_prefix_len(measurer: &dyn TextMeasurer, style: TextStyle, s: &str, max_width: f32) -> usize {
    let mut best = 0;
    for (idx, g) in s.grapheme_indices(true) {
        let end = idx + g.len();
        if measurer.measure(style, &s[..end]) <= max_width {
            best = end;
        } else {
            break;
        }
    }
    if best == 0 {
        s.graphemes(true).next().map_or(s.len(), str::len)
    } else {
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::FixedAdvance;
    use colony_core::FontRole;

    // 5px per grapheme
    const STYLE: TextStyle = TextStyle::new(FontRole::Body, 10.0);

    fn wrap(text: &str, width: f32) -> Vec<String> {
        let m = FixedAdvance::default();
        wrap_text_to_width(Some(&m), STYLE, text, width)
    }

    #[test]
    fn explicit_newline_splits_even_with_room() {
        assert_eq!(wrap("a\nb", 1000.0), vec!["a", "b"]);
        assert_eq!(wrap("a\r\nb", 1000.0), vec!["a", "b"]);
        assert_eq!(wrap("a\n\nb", 1000.0), vec!["a", "", "b"]);
    }

    #[test]
    fn greedy_fill() {
        // 40px = 8 graphemes per line
        assert_eq!(wrap("aaa bbb ccc dd", 40.0), vec!["aaa bbb", "ccc dd"]);
    }

    #[test]
    fn long_word_breaks_at_grapheme_boundaries() {
        let lines = wrap("ééééé", 10.0);
        assert_eq!(lines, vec!["éé", "éé", "é"]);
    }

    #[test]
    fn remainder_of_broken_word_joins_following_word() {
        assert_eq!(wrap("abcdefghij k", 25.0), vec!["abcde", "fghij", "k"]);
        assert_eq!(wrap("abcdefg hi", 25.0), vec!["abcde", "fg hi"]);
    }

    #[test]
    fn single_char_wider_than_budget_still_progresses() {
        assert_eq!(wrap("ab", 2.0), vec!["a", "b"]);
    }

    #[test]
    fn degenerate_inputs_return_whole_string() {
        let m = FixedAdvance::default();
        assert_eq!(wrap_text_to_width(Some(&m), STYLE, "x y", 0.0), vec!["x y"]);
        assert_eq!(wrap_text_to_width(Some(&m), STYLE, "x y", -3.0), vec!["x y"]);
        assert_eq!(wrap_text_to_width(None, STYLE, "x y", 100.0), vec!["x y"]);
        assert_eq!(wrap("", 100.0), vec![""]);
    }

    #[test]
    fn rejoined_lines_reconstruct_normalized_text() {
        let text = "The  quick brown\tfox jumps over the lazy dog near the riverbank";
        let m = FixedAdvance::default();
        for width in [45.0, 60.0, 80.0, 200.0] {
            let lines = wrap(text, width);
            let joined = lines.join(" ");
            let normalized: Vec<&str> = text.split_whitespace().collect();
            assert_eq!(joined, normalized.join(" "), "width {width}");
            for line in &lines {
                assert!(m.measure(STYLE, line) <= width, "{line:?} overflows {width}");
            }
        }
    }
}
