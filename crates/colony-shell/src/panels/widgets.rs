//! Small drawing helpers shared by panels and dialogs.

use colony_core::{FontRole, Painter, Rect, Rgba};
use colony_text::measure::ellipsize;

use super::PanelContext;

/// Draw `text` vertically centred in `rect`, left aligned with `pad`,
/// shortened to fit.
pub fn label(p: &mut Painter, ctx: &PanelContext, rect: Rect, text: &str, role: FontRole, color: Rgba, pad: f32, z: i32) {
    let style = ctx.style(role);
    let fitted = ellipsize(ctx.measurer, style, text, rect.w - pad * 2.0);
    let y = rect.y + (rect.h - ctx.measurer.line_height(style)) * 0.5;
    p.text([rect.x + pad, y], fitted, style.size, color, role, z);
}

pub fn label_centered(p: &mut Painter, ctx: &PanelContext, rect: Rect, text: &str, role: FontRole, color: Rgba, z: i32) {
    let style = ctx.style(role);
    let fitted = ellipsize(ctx.measurer, style, text, rect.w - 8.0);
    let w = ctx.measurer.measure(style, &fitted);
    let y = rect.y + (rect.h - ctx.measurer.line_height(style)) * 0.5;
    p.text([rect.x + (rect.w - w) * 0.5, y], fitted, style.size, color, role, z);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonKind {
    Primary,
    Secondary,
    Danger,
}

pub fn button(p: &mut Painter, ctx: &PanelContext, rect: Rect, text: &str, kind: ButtonKind, z: i32) {
    let c = ctx.colors;
    let hovered = ctx.hovered(p, rect);
    let (bg, fg) = match kind {
        ButtonKind::Primary => (c.accent, c.accent.readable_text_on(Rgba::WHITE, Rgba::BLACK)),
        ButtonKind::Secondary => (c.surface_alt, c.text_primary),
        ButtonKind::Danger => (c.danger, Rgba::WHITE),
    };
    let bg = if hovered { bg.mix(c.text_primary, 0.12) } else { bg };
    p.fill_rounded_rect(rect, 6.0, bg, z);
    if kind == ButtonKind::Secondary {
        p.stroke_rect(rect, 1.0, 6.0, c.border, z + 1);
    }
    label_centered(p, ctx, rect, text, FontRole::Ui, fg, z + 2);
}

/// Single-line input; shows `placeholder` when empty and a caret when
/// focused.
pub fn text_field(
    p: &mut Painter,
    ctx: &PanelContext,
    rect: Rect,
    value: &str,
    placeholder: &str,
    focused: bool,
    invalid: bool,
    z: i32,
) {
    let c = ctx.colors;
    p.fill_rounded_rect(rect, 5.0, c.background, z);
    let border = if invalid {
        c.danger
    } else if focused {
        c.accent
    } else {
        c.border
    };
    p.stroke_rect(rect, if focused { 2.0 } else { 1.0 }, 5.0, border, z + 1);

    let style = ctx.style(FontRole::Ui);
    let pad = 10.0;
    let (text, color) = if value.is_empty() { (placeholder, c.text_muted) } else { (value, c.text_primary) };
    // Keep the tail visible while typing past the edge.
    let max_w = rect.w - pad * 2.0 - 4.0;
    let mut shown = text.to_string();
    while !value.is_empty() && !shown.is_empty() && ctx.measurer.measure(style, &shown) > max_w {
        shown.remove(0);
    }
    let line_h = ctx.measurer.line_height(style);
    let y = rect.y + (rect.h - line_h) * 0.5;
    if !shown.is_empty() {
        p.text([rect.x + pad, y], shown.clone(), style.size, color, FontRole::Ui, z + 2);
    }
    if focused {
        let caret_x = if value.is_empty() { rect.x + pad } else { rect.x + pad + ctx.measurer.measure(style, &shown) + 1.0 };
        p.fill_rect(Rect::new(caret_x, y + 2.0, 2.0, line_h - 4.0), c.accent, z + 3);
    }
}

pub fn chip(p: &mut Painter, ctx: &PanelContext, rect: Rect, text: &str, active: bool, z: i32) {
    let c = ctx.colors;
    let bg = if active {
        c.accent_soft
    } else if ctx.hovered(p, rect) {
        c.card_hover
    } else {
        c.card
    };
    p.fill_rounded_rect(rect, rect.h * 0.5, bg, z);
    label_centered(p, ctx, rect, text, FontRole::Ui, if active { c.text_primary } else { c.text_secondary }, z + 1);
}

/// Width a chip needs for `text`.
pub fn chip_width(ctx: &PanelContext, text: &str) -> f32 {
    ctx.measurer.measure(ctx.style(FontRole::Ui), text) + 28.0
}

pub fn toggle_switch(p: &mut Painter, ctx: &PanelContext, rect: Rect, on: bool, z: i32) {
    let c = ctx.colors;
    let track = if on { c.accent } else { c.border };
    p.fill_rounded_rect(rect, rect.h * 0.5, track, z);
    let knob = rect.h - 6.0;
    let x = if on { rect.right() - knob - 3.0 } else { rect.x + 3.0 };
    p.fill_rounded_rect(Rect::new(x, rect.y + 3.0, knob, knob), knob * 0.5, Rgba::WHITE, z + 1);
}

pub fn slider(p: &mut Painter, ctx: &PanelContext, rect: Rect, value: f32, z: i32) {
    let c = ctx.colors;
    let track = Rect::new(rect.x, rect.y + rect.h * 0.5 - 3.0, rect.w, 6.0);
    p.fill_rounded_rect(track, 3.0, c.border, z);
    let filled = Rect { w: rect.w * value.clamp(0.0, 1.0), ..track };
    p.fill_rounded_rect(filled, 3.0, c.accent, z + 1);
    let knob = 16.0;
    let kx = rect.x + filled.w - knob * 0.5;
    p.fill_rounded_rect(Rect::new(kx, rect.y + rect.h * 0.5 - knob * 0.5, knob, knob), knob * 0.5, c.text_primary, z + 2);
}

/// Slider value under window x coordinate `x`.
pub fn slider_value_at(rect: Rect, x: f32) -> f32 {
    if rect.w <= 0.0 {
        return 0.0;
    }
    ((x - rect.x) / rect.w).clamp(0.0, 1.0)
}

/// Thin scrollbar along the right edge of `viewport`.
pub fn scrollbar(p: &mut Painter, ctx: &PanelContext, viewport: Rect, offset: f32, max_offset: f32, z: i32) {
    if max_offset <= 0.0 || viewport.h <= 0.0 {
        return;
    }
    let content = viewport.h + max_offset;
    let thumb_h = (viewport.h * viewport.h / content).max(24.0).min(viewport.h);
    let travel = viewport.h - thumb_h;
    let y = viewport.y + travel * (offset / max_offset);
    p.fill_rounded_rect(Rect::new(viewport.right() - 5.0, y, 3.0, thumb_h), 1.5, ctx.colors.text_muted.with_alpha(140), z);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slider_value_is_clamped() {
        let r = Rect::new(100.0, 0.0, 200.0, 20.0);
        assert_eq!(slider_value_at(r, 200.0), 0.5);
        assert_eq!(slider_value_at(r, 0.0), 0.0);
        assert_eq!(slider_value_at(r, 999.0), 1.0);
        assert_eq!(slider_value_at(Rect::ZERO, 5.0), 0.0);
    }
}
