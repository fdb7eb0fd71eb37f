use colony_core::{FontRole, Rect, Rgba};
use colony_shell::{LayoutConstraints, LayoutEngine, ScrollViewport};
use colony_text::{FixedAdvance, TextMeasurer, TextStyle, wrap_text_to_width};

const STYLE: TextStyle = TextStyle::new(FontRole::Body, 10.0);

#[test]
fn layout_widths_sum_to_output_and_respect_clamps() {
    let c = LayoutConstraints::default();
    let minimum = c.nav_min + c.library_min + c.hero_min;
    for (nav_hint, lib_hint) in [(0.0, 0.0), (200.0, 320.0), (9999.0, 9999.0), (f32::NAN, 150.0)] {
        let mut width = minimum;
        while width <= 3000.0 {
            let mut engine = LayoutEngine::new(c);
            engine.set_widths(nav_hint, lib_hint);
            let l = engine.compute(width, 720.0);
            let sum = l.nav_rail.w + l.library.w + l.hero.w;
            assert!((sum - width).abs() < 1e-3, "width {width}: sum {sum}");
            assert!(l.nav_rail.w >= c.nav_min && l.nav_rail.w <= c.nav_max);
            assert!(l.library.w >= c.library_min && l.library.w <= c.library_max);
            assert!(l.hero.w >= c.hero_min);
            width += 37.0;
        }
    }
}

#[test]
fn layout_degrades_library_before_nav_and_never_negative() {
    let c = LayoutConstraints::default();
    let mut engine = LayoutEngine::new(c);
    engine.set_widths(c.nav_max, c.library_max);

    let l = engine.compute(c.nav_max + c.library_min + c.hero_min, 600.0);
    assert_eq!(l.library.w, c.library_min);
    assert_eq!(l.nav_rail.w, c.nav_max);

    let mut width = c.nav_min + c.library_min + c.hero_min - 1.0;
    while width > 0.0 {
        let l = engine.compute(width, 600.0);
        assert_eq!(l.library.w, c.library_min);
        assert_eq!(l.nav_rail.w, c.nav_min);
        assert!(l.hero.w >= 0.0);
        width -= 50.0;
    }
}

#[test]
fn scroll_offset_stays_clamped_through_any_sequence() {
    let mut s = ScrollViewport::new();
    s.update(Rect::new(0.0, 0.0, 200.0, 300.0), 1000.0);
    // Deterministic pseudo-random walk over every mutating call.
    let mut seed: u32 = 0x9e37_79b9;
    for _ in 0..2000 {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        let v = (seed % 2000) as f32 - 1000.0;
        match seed % 5 {
            0 => s.scroll_by(v),
            1 => s.page_by(300.0, v > 0.0),
            2 => {
                s.recompute_bounds(v.abs() * 2.0, 300.0);
                s.clamp_offset();
            }
            3 => s.ensure_visible(v.abs(), 40.0),
            _ => s.set_offset(v * 3.0),
        }
        assert!(s.offset() >= 0.0 && s.offset() <= s.max_offset(), "offset {} max {}", s.offset(), s.max_offset());
    }
}

#[test]
fn ensure_visible_is_idempotent() {
    for height in [40.0, 250.0, 400.0] {
        for top in [0.0, 120.0, 555.0, 960.0] {
            let mut s = ScrollViewport::new();
            s.update(Rect::new(0.0, 0.0, 100.0, 250.0), 1000.0);
            s.set_offset(400.0);
            s.ensure_visible(top, height);
            let first = s.offset();
            s.ensure_visible(top, height);
            assert_eq!(s.offset(), first, "top {top} height {height}");
        }
    }
}

#[test]
fn wrapped_lines_rejoin_to_normalized_text() {
    let m = FixedAdvance::default();
    let text = "the  quick brown fox   jumps over the lazy dog and keeps running far away";
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    for width in [35.0, 45.0, 80.0, 150.0, 1000.0] {
        let lines = wrap_text_to_width(Some(&m), STYLE, text, width);
        assert_eq!(lines.join(" "), normalized, "width {width}");
        for line in &lines {
            let single = line.chars().count() == 1;
            assert!(m.measure(STYLE, line) <= width || single, "{line:?} overflows {width}");
        }
    }
}

#[test]
fn explicit_newline_splits_lines() {
    let m = FixedAdvance::default();
    assert_eq!(wrap_text_to_width(Some(&m), STYLE, "a\nb", 500.0), vec!["a", "b"]);
}

#[test]
fn hex_round_trips_for_opaque_colors() {
    for v in (0u32..=0xFF_FFFF).step_by(0x01_0307) {
        let color = Rgba::rgb((v >> 16) as u8, (v >> 8) as u8, v as u8);
        assert_eq!(Rgba::parse_hex(&color.to_hex()), Ok(color));
    }
}
