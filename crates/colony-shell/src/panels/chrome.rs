//! Top bar and status bar.

use colony_core::{FontRole, Painter, Rect};

use super::PanelContext;
use super::widgets::{self, ButtonKind};

pub struct TopBarRenderResult {
    pub hub_toggle: Rect,
}

pub fn render_top_bar(p: &mut Painter, ctx: &PanelContext, rect: Rect, title: &str, in_hub: bool, z: i32) -> TopBarRenderResult {
    let c = ctx.colors;
    p.fill_rect(rect, c.surface, z);
    p.fill_rect(Rect::new(rect.x, rect.bottom() - 1.0, rect.w, 1.0), c.border, z + 1);

    let mark = Rect::new(rect.x + 16.0, rect.y + (rect.h - 22.0) * 0.5, 22.0, 22.0);
    p.fill_rounded_rect(mark, 6.0, c.accent, z + 1);
    let title_rect = Rect::new(mark.right() + 10.0, rect.y, (rect.w - 200.0).max(0.0), rect.h);
    widgets::label(p, ctx, title_rect, title, FontRole::Headline, c.text_primary, 0.0, z + 2);

    let label = if in_hub { ctx.tr("hub.close") } else { ctx.tr("nav.hub") };
    let hub_toggle = Rect::new(rect.right() - 112.0, rect.y + (rect.h - 32.0) * 0.5, 96.0, 32.0);
    let kind = if in_hub { ButtonKind::Primary } else { ButtonKind::Secondary };
    widgets::button(p, ctx, hub_toggle, label, kind, z + 2);
    TopBarRenderResult { hub_toggle }
}

pub fn render_status_bar(p: &mut Painter, ctx: &PanelContext, rect: Rect, status: &str, language: &str, z: i32) {
    if rect.is_empty() {
        return;
    }
    let c = ctx.colors;
    p.fill_rect(rect, c.nav_background, z);
    p.fill_rect(Rect::new(rect.x, rect.y, rect.w, 1.0), c.border, z + 1);
    let (left, right) = rect.take_left((rect.w - 80.0).max(0.0));
    widgets::label(p, ctx, left, status, FontRole::Ui, c.text_secondary, 12.0, z + 2);
    widgets::label(p, ctx, right, &language.to_uppercase(), FontRole::Ui, c.text_muted, 12.0, z + 2);
}
