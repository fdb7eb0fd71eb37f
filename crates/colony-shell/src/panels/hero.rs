//! Detail column for the selected program.

use colony_core::{FontRole, GradientAxis, Painter, Rect};

use super::widgets::{self, ButtonKind};
use super::PanelContext;
use crate::content::ProgramView;
use crate::visuals::ProgramVisuals;
use colony_text::WrapCache;

#[derive(Default)]
pub struct HeroRenderResult {
    pub action: Option<Rect>,
    pub edit: Option<Rect>,
}

pub fn render_program(
    p: &mut Painter,
    ctx: &PanelContext,
    rect: Rect,
    view: &ProgramView,
    visuals: &mut ProgramVisuals,
    wraps: &mut WrapCache,
    editable: bool,
    z: i32,
) -> HeroRenderResult {
    let c = ctx.colors;
    p.fill_rect(rect, c.background, z);
    if rect.is_empty() {
        return HeroRenderResult::default();
    }
    p.push_clip_rect(rect);

    let pad = 28.0;
    let inner_w = (rect.w - pad * 2.0).max(0.0);
    let banner_h = (rect.h * 0.34).clamp(140.0, 240.0);
    let banner = Rect::new(rect.x, rect.y, rect.w, banner_h);
    let (from, to) = visuals.gradient;
    p.fill_gradient(banner, from, to, GradientAxis::Horizontal, 0.0, z + 1);
    p.fill_gradient(
        Rect::new(banner.x, banner.y + banner_h * 0.4, banner.w, banner_h * 0.6),
        c.hero_overlay.with_alpha(0),
        c.hero_overlay,
        GradientAxis::Vertical,
        0.0,
        z + 2,
    );

    let display = ctx.style(FontRole::Display);
    let heading_y = banner.bottom() - 24.0 - ctx.measurer.line_height(display) - ctx.measurer.line_height(ctx.style(FontRole::Body));
    let heading = Rect::new(rect.x + pad, heading_y, inner_w, ctx.measurer.line_height(display));
    widgets::label(p, ctx, heading, view.heading(), FontRole::Display, c.text_primary, 0.0, z + 3);
    let tagline = Rect::new(rect.x + pad, heading.bottom(), inner_w, ctx.measurer.line_height(ctx.style(FontRole::Body)));
    widgets::label(p, ctx, tagline, &view.tagline, FontRole::Body, c.text_secondary, 0.0, z + 3);

    let mut y = banner.bottom() + 20.0;
    let mut result = HeroRenderResult::default();

    // Actions
    let action = Rect::new(rect.x + pad, y, 140.0, 40.0);
    widgets::button(p, ctx, action, ctx.tr("hero.launch"), ButtonKind::Primary, z + 3);
    result.action = Some(action);
    if editable {
        let edit = Rect::new(action.right() + 10.0, y, 100.0, 40.0);
        widgets::button(p, ctx, edit, ctx.tr("hero.edit"), ButtonKind::Secondary, z + 3);
        result.edit = Some(edit);
    }

    let meta: Vec<&str> = [view.status.as_str(), view.version.as_str(), view.install_state.as_str()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    if !meta.is_empty() {
        let x = action.right() + if editable { 130.0 } else { 20.0 };
        let r = Rect::new(x, y, (rect.right() - pad - x).max(0.0), 40.0);
        widgets::label(p, ctx, r, &meta.join("  ·  "), FontRole::Ui, c.text_muted, 0.0, z + 3);
    }
    y += 60.0;

    // Highlight chips
    if !view.highlights.is_empty() {
        let mut x = rect.x + pad;
        for h in &view.highlights {
            let w = widgets::chip_width(ctx, h);
            if x + w > rect.right() - pad && x > rect.x + pad {
                break;
            }
            let chip = Rect::new(x, y, w, 28.0);
            p.fill_rounded_rect(chip, 14.0, visuals.accent.with_alpha(48), z + 2);
            widgets::label_centered(p, ctx, chip, h, FontRole::Ui, c.text_primary, z + 3);
            x += w + 8.0;
        }
        y += 44.0;
    }

    // Paragraphs
    for para in &mut visuals.paragraphs {
        let size = para.style().size;
        let block = para.layout(ctx.measurer, inner_w);
        for line in &block.lines {
            if y > rect.bottom() {
                break;
            }
            p.text([rect.x + pad, y], line.clone(), size, c.text_secondary, FontRole::Body, z + 3);
            y += block.line_height;
        }
        y += 12.0;
    }

    // Sections
    let headline = ctx.style(FontRole::Headline);
    let body = ctx.style(FontRole::Body);
    for section in &view.sections {
        if y > rect.bottom() {
            break;
        }
        y += 8.0;
        p.text([rect.x + pad, y], section.title.clone(), headline.size, c.text_primary, FontRole::Headline, z + 3);
        y += ctx.measurer.line_height(headline) + 4.0;
        for item in &section.items {
            p.fill_rounded_rect(Rect::new(rect.x + pad, y + body.size * 0.5, 5.0, 5.0), 2.5, visuals.accent, z + 3);
            let block = wraps.get_or_wrap(ctx.measurer, body, item, inner_w - 16.0);
            for line in &block.lines {
                p.text([rect.x + pad + 16.0, y], line.clone(), body.size, c.text_secondary, FontRole::Body, z + 3);
                y += block.line_height;
            }
        }
    }

    p.pop_clip();
    result
}
