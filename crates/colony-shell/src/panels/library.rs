//! Program list for the active nav entry.

use colony_core::{FontRole, Painter, Rect};

use super::widgets::{self, ButtonKind};
use super::PanelContext;
use crate::content::AppContent;
use crate::selection::{NavEntry, NavState, Selection, SettingsSection};
use crate::visuals::ProgramVisualsCache;

pub struct LibraryRenderResult {
    pub items: Vec<(Rect, Selection)>,
    pub add_button: Option<Rect>,
}

pub fn render(
    p: &mut Painter,
    ctx: &PanelContext,
    rect: Rect,
    content: &AppContent,
    nav: &NavState,
    visuals: &mut ProgramVisualsCache,
    z: i32,
) -> LibraryRenderResult {
    let c = ctx.colors;
    p.fill_rect(rect, c.surface, z);
    p.fill_rect(Rect::new(rect.right() - 1.0, rect.y, 1.0, rect.h), c.border, z + 1);
    p.push_clip_rect(rect);

    let (header, body) = rect.take_top(56.0);
    let selection = nav.selection(content);
    let mut result = LibraryRenderResult { items: Vec::new(), add_button: None };

    match nav.active() {
        NavEntry::Settings => {
            widgets::label(p, ctx, header, ctx.tr("nav.settings"), FontRole::Headline, c.text_primary, 16.0, z + 2);
            let mut y = body.y + 4.0;
            for section in SettingsSection::ALL {
                let r = Rect::new(body.x + 10.0, y, body.w - 20.0, ctx.row(48.0));
                let active = selection == Some(Selection::Settings(section));
                tile_background(p, ctx, r, active, z + 1);
                widgets::label(p, ctx, r, ctx.tr(section.label_key()), FontRole::Ui, c.text_primary, 14.0, z + 3);
                result.items.push((r, Selection::Settings(section)));
                y += r.h + 6.0;
            }
        }
        NavEntry::Channel(idx) => {
            let Some(channel) = content.channels.get(idx) else {
                p.pop_clip();
                return result;
            };
            let add = Rect::new(header.right() - 44.0, header.y + 12.0, 32.0, 32.0);
            let title_rect = Rect { w: (header.w - 56.0).max(0.0), ..header };
            widgets::label(p, ctx, title_rect, &channel.label, FontRole::Headline, c.text_primary, 16.0, z + 2);
            widgets::button(p, ctx, add, "+", ButtonKind::Secondary, z + 2);
            result.add_button = Some(add);

            if channel.programs.is_empty() {
                let r = Rect::new(body.x, body.y + 8.0, body.w, 40.0);
                widgets::label(p, ctx, r, ctx.tr("library.empty"), FontRole::Body, c.text_muted, 16.0, z + 2);
            }

            let title_style = ctx.style(FontRole::Ui);
            let tile_h = ctx.row(72.0);
            let mut y = body.y + 4.0;
            for id in &channel.programs {
                let r = Rect::new(body.x + 10.0, y, body.w - 20.0, tile_h);
                y += tile_h + 6.0;
                let Some(v) = visuals.get_mut(id) else { continue };
                let active = selection.as_ref().is_some_and(|s| matches!(s, Selection::Program(sel) if sel == id));
                tile_background(p, ctx, r, active, z + 1);

                let dot = Rect::new(r.x + 12.0, r.y + 14.0, 10.0, 10.0);
                p.fill_rounded_rect(dot, 5.0, v.accent, z + 2);
                let text_x = dot.right() + 10.0;
                let text_w = (r.right() - text_x - 10.0).max(0.0);
                let title = v.fitted_title(ctx.measurer, title_style, text_w).to_string();
                p.text([text_x, r.y + 8.0], title, title_style.size, c.text_primary, FontRole::Ui, z + 3);

                let tag_size = v.tagline.style().size;
                let block = v.tagline.layout(ctx.measurer, text_w);
                let mut ty = r.y + 8.0 + ctx.measurer.line_height(title_style);
                for line in block.lines.iter().take(2) {
                    if ty + block.line_height > r.bottom() {
                        break;
                    }
                    p.text([text_x, ty], line.clone(), tag_size, c.text_muted, FontRole::Body, z + 3);
                    ty += block.line_height;
                }
                result.items.push((r, Selection::Program(id.clone())));
            }
        }
    }

    p.pop_clip();
    result
}

fn tile_background(p: &mut Painter, ctx: &PanelContext, r: Rect, active: bool, z: i32) {
    let c = ctx.colors;
    let bg = if active {
        c.accent_soft
    } else if ctx.hovered(p, r) {
        c.card_hover
    } else {
        c.card
    };
    p.fill_rounded_rect(r, 10.0, bg, z);
    if active {
        p.stroke_rect(r, 1.0, 10.0, c.accent, z + 1);
    }
}
