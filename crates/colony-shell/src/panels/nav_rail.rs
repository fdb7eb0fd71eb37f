use colony_core::{FontRole, Painter, Rect};

use super::{PanelContext, widgets};
use crate::content::AppContent;
use crate::selection::NavEntry;

/// Below this width the rail shows initials instead of labels.
const COMPACT_WIDTH: f32 = 120.0;

pub struct NavigationRenderResult {
    pub entries: Vec<(Rect, NavEntry)>,
}

pub fn render(p: &mut Painter, ctx: &PanelContext, rect: Rect, content: &AppContent, active: NavEntry, z: i32) -> NavigationRenderResult {
    let c = ctx.colors;
    p.fill_rect(rect, c.nav_background, z);
    p.push_clip_rect(rect);

    let compact = rect.w < COMPACT_WIDTH;
    let row_h = ctx.row(44.0);
    let pad = 8.0;
    let mut entries = Vec::with_capacity(content.channels.len() + 1);

    let mut y = rect.y + 12.0;
    for (idx, channel) in content.channels.iter().enumerate() {
        let r = Rect::new(rect.x + pad, y, rect.w - pad * 2.0, row_h);
        draw_entry(p, ctx, r, &channel.label, active == NavEntry::Channel(idx), compact, z + 1);
        entries.push((r, NavEntry::Channel(idx)));
        y += row_h + 4.0;
    }

    // Settings pinned to the bottom unless it would overlap the channels.
    let settings_y = (rect.bottom() - row_h - 12.0).max(y + 8.0);
    let r = Rect::new(rect.x + pad, settings_y, rect.w - pad * 2.0, row_h);
    draw_entry(p, ctx, r, ctx.tr("nav.settings"), active == NavEntry::Settings, compact, z + 1);
    entries.push((r, NavEntry::Settings));

    p.pop_clip();
    NavigationRenderResult { entries }
}

fn draw_entry(p: &mut Painter, ctx: &PanelContext, r: Rect, text: &str, active: bool, compact: bool, z: i32) {
    let c = ctx.colors;
    if active {
        p.fill_rounded_rect(r, 8.0, c.accent_soft, z);
        p.fill_rounded_rect(Rect::new(r.x, r.y + 8.0, 3.0, r.h - 16.0), 1.5, c.accent, z + 1);
    } else if ctx.hovered(p, r) {
        p.fill_rounded_rect(r, 8.0, c.card_hover.with_alpha(160), z);
    }
    let color = if active { c.text_primary } else { c.text_secondary };
    if compact {
        let initial: String = text.chars().next().map(|ch| ch.to_uppercase().collect()).unwrap_or_default();
        widgets::label_centered(p, ctx, r, &initial, FontRole::Headline, color, z + 2);
    } else {
        widgets::label(p, ctx, r, text, FontRole::Ui, color, 14.0, z + 2);
    }
}
