//! Settings UI shown in the hero column when a settings section is
//! selected.

use colony_config::{AppearanceKey, Settings};
use colony_core::{FontRole, Offset, Painter, Rect};

use super::widgets::{self, ButtonKind};
use super::PanelContext;
use crate::router::SettingsTarget;
use crate::scroll::ScrollViewport;
use crate::selection::SettingsSection;
use crate::theme::ThemeManager;

pub const TOGGLES: [&str; 3] = ["reduce_motion", "show_status_bar", "confirm_launch"];

/// Toggle value with per-key defaults for keys never written.
pub fn toggle_enabled(settings: &Settings, key: &str) -> bool {
    settings.toggles.get(key).copied().unwrap_or(key == "show_status_bar")
}

#[derive(Default)]
pub struct SettingsPanelState {
    pub scroll: ScrollViewport,
}

pub struct SettingsView<'a> {
    pub section: SettingsSection,
    pub themes: &'a ThemeManager,
    pub settings: &'a Settings,
    pub languages: &'a [String],
}

pub struct SettingsRenderResult {
    /// Absolute rectangles, clipped to `viewport`.
    pub targets: Vec<(Rect, SettingsTarget)>,
    pub viewport: Rect,
}

const HEADING_H: f32 = 40.0;
const GAP: f32 = 12.0;

/// Content-space geometry of one section at a given width.
#[derive(Debug, Default, PartialEq)]
pub struct SectionLayout {
    pub headings: Vec<(f32, &'static str)>,
    pub cards: Vec<Rect>,
    pub rows: Vec<Rect>,
    pub button: Option<Rect>,
    pub height: f32,
}

fn grid(count: usize, width: f32, card_w: f32, card_h: f32, top: f32) -> (Vec<Rect>, f32) {
    let cols = (((width + GAP) / (card_w + GAP)).floor() as usize).max(1);
    let rects: Vec<Rect> = (0..count)
        .map(|i| {
            let (row, col) = (i / cols, i % cols);
            Rect::new(col as f32 * (card_w + GAP), top + row as f32 * (card_h + GAP), card_w, card_h)
        })
        .collect();
    let rows = count.div_ceil(cols);
    let h = if rows == 0 { 0.0 } else { rows as f32 * (card_h + GAP) - GAP };
    (rects, top + h)
}

pub fn section_layout(section: SettingsSection, width: f32, item_count: usize, density: f32) -> SectionLayout {
    let mut out = SectionLayout::default();
    let row_h = (52.0 * density).round();
    match section {
        SettingsSection::Appearance => {
            out.headings.push((0.0, "settings.themes"));
            let (cards, bottom) = grid(item_count, width, 200.0, 84.0, HEADING_H);
            out.cards = cards;
            let mut y = bottom + 24.0;
            out.headings.push((y, "settings.appearance"));
            y += HEADING_H;
            for _ in AppearanceKey::ALL {
                out.rows.push(Rect::new(0.0, y, width, row_h));
                y += row_h;
            }
            y += 16.0;
            out.button = Some(Rect::new(0.0, y, 220.0, 40.0));
            out.height = y + 40.0;
        }
        SettingsSection::Language => {
            out.headings.push((0.0, "settings.language"));
            let (cards, bottom) = grid(item_count, width, 150.0, 56.0, HEADING_H);
            out.cards = cards;
            out.height = bottom;
        }
        SettingsSection::General => {
            out.headings.push((0.0, "settings.general"));
            let mut y = HEADING_H;
            for _ in TOGGLES {
                out.rows.push(Rect::new(0.0, y, width, row_h));
                y += row_h;
            }
            out.height = y;
        }
    }
    out
}

pub fn render(
    p: &mut Painter,
    ctx: &PanelContext,
    rect: Rect,
    state: &mut SettingsPanelState,
    view: &SettingsView,
    z: i32,
) -> SettingsRenderResult {
    let c = ctx.colors;
    p.fill_rect(rect, c.background, z);
    let viewport = rect.inset(28.0, 24.0);
    let item_count = match view.section {
        SettingsSection::Appearance => view.themes.schemes().len(),
        SettingsSection::Language => view.languages.len(),
        SettingsSection::General => 0,
    };
    let layout = section_layout(view.section, viewport.w, item_count, ctx.density);
    state.scroll.update(viewport, layout.height);

    let mut targets = Vec::new();
    p.push_clip_rect(viewport);
    p.push_offset(Offset::new(viewport.x, viewport.y - state.scroll.offset()));
    let abs = |p: &Painter, r: Rect| p.current_offset().apply_rect(r);

    for (y, key) in &layout.headings {
        let r = Rect::new(0.0, *y, viewport.w, HEADING_H);
        widgets::label(p, ctx, r, ctx.tr(key), FontRole::Headline, c.text_primary, 0.0, z + 2);
    }

    match view.section {
        SettingsSection::Appearance => {
            let active = view.themes.active().id.as_str();
            for (scheme, r) in view.themes.schemes().iter().zip(&layout.cards) {
                let selected = scheme.id == active;
                let bg = if ctx.hovered(p, *r) { c.card_hover } else { c.card };
                p.fill_rounded_rect(*r, 10.0, bg, z + 1);
                if selected {
                    p.stroke_rect(*r, 2.0, 10.0, c.accent, z + 2);
                }
                let title = Rect::new(r.x, r.y + 6.0, r.w, 30.0);
                widgets::label(p, ctx, title, &scheme.name, FontRole::Ui, c.text_primary, 14.0, z + 3);
                let sc = &scheme.colors;
                for (i, swatch) in [sc.background, sc.surface, sc.accent, sc.text_primary].iter().enumerate() {
                    let s = Rect::new(r.x + 14.0 + i as f32 * 28.0, r.bottom() - 34.0, 22.0, 22.0);
                    p.fill_rounded_rect(s, 11.0, *swatch, z + 3);
                    p.stroke_rect(s, 1.0, 11.0, c.border, z + 4);
                }
                targets.push((abs(p, *r), SettingsTarget::ThemeCard(scheme.id.clone())));
            }
            let appearance = view.themes.appearance();
            for (key, row) in AppearanceKey::ALL.iter().zip(&layout.rows) {
                let (label_rect, rest) = row.take_left(220.0_f32.min(row.w * 0.45));
                let label_key = match key {
                    AppearanceKey::AccentIntensity => "settings.accent_intensity",
                    AppearanceKey::BackgroundDepth => "settings.background_depth",
                    AppearanceKey::InterfaceDensity => "settings.interface_density",
                };
                widgets::label(p, ctx, label_rect, ctx.tr(label_key), FontRole::Ui, c.text_secondary, 0.0, z + 2);
                let track = Rect::new(rest.x, rest.y + 8.0, (rest.w - 60.0).max(0.0), rest.h - 16.0);
                widgets::slider(p, ctx, track, appearance.get(*key), z + 2);
                let pct = format!("{:.0}%", appearance.get(*key) * 100.0);
                let value = Rect::new(track.right() + 12.0, rest.y, 48.0, rest.h);
                widgets::label(p, ctx, value, &pct, FontRole::Ui, c.text_muted, 0.0, z + 2);
                targets.push((abs(p, track), SettingsTarget::Slider(*key)));
            }
            if let Some(b) = layout.button {
                widgets::button(p, ctx, b, ctx.tr("settings.create_theme"), ButtonKind::Primary, z + 2);
                targets.push((abs(p, b), SettingsTarget::CreateTheme));
            }
        }
        SettingsSection::Language => {
            let current = view.settings.language.as_str();
            for (lang, r) in view.languages.iter().zip(&layout.cards) {
                let bg = if ctx.hovered(p, *r) { c.card_hover } else { c.card };
                p.fill_rounded_rect(*r, 10.0, bg, z + 1);
                if lang == current {
                    p.stroke_rect(*r, 2.0, 10.0, c.accent, z + 2);
                }
                widgets::label_centered(p, ctx, *r, &lang.to_uppercase(), FontRole::Headline, c.text_primary, z + 3);
                targets.push((abs(p, *r), SettingsTarget::LanguageCard(lang.clone())));
            }
        }
        SettingsSection::General => {
            for (key, row) in TOGGLES.iter().zip(&layout.rows) {
                let label_key = match *key {
                    "reduce_motion" => "settings.toggle.reduce_motion",
                    "show_status_bar" => "settings.toggle.show_status_bar",
                    _ => "settings.toggle.confirm_launch",
                };
                widgets::label(p, ctx, *row, ctx.tr(label_key), FontRole::Ui, c.text_secondary, 0.0, z + 2);
                let switch = Rect::new(row.right() - 52.0, row.y + (row.h - 26.0) * 0.5, 48.0, 26.0);
                widgets::toggle_switch(p, ctx, switch, toggle_enabled(view.settings, key), z + 2);
                targets.push((abs(p, *row), SettingsTarget::Toggle(key.to_string())));
            }
        }
    }

    p.pop_offset();
    widgets::scrollbar(p, ctx, viewport, state.scroll.offset(), state.scroll.max_offset(), z + 5);
    p.pop_clip();
    SettingsRenderResult { targets, viewport }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_grid_wraps_to_width() {
        let l = section_layout(SettingsSection::Appearance, 430.0, 5, 1.0);
        assert_eq!(l.cards.len(), 5);
        assert_eq!(l.cards[1].x, 212.0);
        assert_eq!(l.cards[2].x, 0.0);
        assert_eq!(l.cards[2].y, HEADING_H + 96.0);
        assert_eq!(l.rows.len(), 3);
        assert!(l.button.is_some_and(|b| b.bottom() == l.height));
    }

    #[test]
    fn narrow_width_still_one_column() {
        let l = section_layout(SettingsSection::Language, 10.0, 3, 1.0);
        assert!(l.cards.iter().all(|r| r.x == 0.0));
        assert_eq!(l.height, HEADING_H + 3.0 * 56.0 + 2.0 * GAP);
    }

    #[test]
    fn status_bar_toggle_defaults_on() {
        let mut s = Settings::default();
        assert!(toggle_enabled(&s, "show_status_bar"));
        assert!(!toggle_enabled(&s, "reduce_motion"));
        s.toggles.insert("show_status_bar".into(), false);
        assert!(!toggle_enabled(&s, "show_status_bar"));
    }
}
