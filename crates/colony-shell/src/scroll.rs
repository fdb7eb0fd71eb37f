//! Vertical scroll state shared by the hub, the settings panel and the
//! dialog lists.
//!
//! Every mutation re-clamps, so `0 <= offset <= max_offset` holds between
//! any two calls.

use colony_core::Rect;

/// Pixels scrolled per wheel notch.
pub const WHEEL_STEP: f32 = 48.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollViewport {
    offset: f32,
    max_offset: f32,
    viewport: Rect,
}

impl ScrollViewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn max_offset(&self) -> f32 {
        self.max_offset
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn set_viewport(&mut self, rect: Rect) {
        self.viewport = rect;
    }

    /// `max_offset = max(0, content - viewport)`. Leaves `offset` alone
    /// until the next clamp.
    pub fn recompute_bounds(&mut self, content_height: f32, viewport_height: f32) {
        let max = content_height - viewport_height;
        self.max_offset = if max.is_finite() { max.max(0.0) } else { 0.0 };
    }

    /// Recompute bounds for this frame's viewport and clamp.
    pub fn update(&mut self, viewport: Rect, content_height: f32) {
        self.viewport = viewport;
        self.recompute_bounds(content_height, viewport.h);
        self.clamp_offset();
    }

    pub fn clamp_offset(&mut self) {
        if !self.offset.is_finite() {
            self.offset = 0.0;
        }
        self.offset = self.offset.clamp(0.0, self.max_offset);
    }

    pub fn set_offset(&mut self, offset: f32) {
        self.offset = offset;
        self.clamp_offset();
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0.0;
    }

    /// Wheel convention: positive `delta` moves content up, toward the top.
    pub fn scroll_by(&mut self, delta: f32) {
        self.offset -= delta;
        self.clamp_offset();
    }

    pub fn page_by(&mut self, viewport_height: f32, forward: bool) {
        if forward {
            self.offset += viewport_height;
        } else {
            self.offset -= viewport_height;
        }
        self.clamp_offset();
    }

    /// Scroll the minimum amount that brings `[item_top, item_top + item_height)`
    /// into the viewport.
    pub fn ensure_visible(&mut self, item_top: f32, item_height: f32) {
        let view_h = self.viewport.h;
        let item_bottom = item_top + item_height;
        // Items that fill the view pin to their top.
        if item_top < self.offset || item_height >= view_h {
            self.offset = item_top;
        } else if item_bottom > self.offset + view_h {
            self.offset = item_bottom - view_h;
        }
        self.clamp_offset();
    }

    /// Whether a content-space band intersects the visible window.
    pub fn is_visible(&self, item_top: f32, item_height: f32) -> bool {
        item_top + item_height > self.offset && item_top < self.offset + self.viewport.h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(h: f32, content: f32) -> ScrollViewport {
        let mut s = ScrollViewport::new();
        s.update(Rect::new(0.0, 0.0, 100.0, h), content);
        s
    }

    #[test]
    fn bounds_never_negative() {
        let s = viewport(300.0, 120.0);
        assert_eq!(s.max_offset(), 0.0);
    }

    #[test]
    fn recompute_does_not_move_offset_until_clamped() {
        let mut s = viewport(100.0, 500.0);
        s.set_offset(400.0);
        s.recompute_bounds(200.0, 100.0);
        assert_eq!(s.offset(), 400.0);
        s.clamp_offset();
        assert_eq!(s.offset(), 100.0);
    }

    #[test]
    fn wheel_positive_scrolls_toward_top() {
        let mut s = viewport(100.0, 500.0);
        s.set_offset(200.0);
        s.scroll_by(50.0);
        assert_eq!(s.offset(), 150.0);
        s.scroll_by(-1000.0);
        assert_eq!(s.offset(), 400.0);
    }

    #[test]
    fn paging_clamps_both_ends() {
        let mut s = viewport(100.0, 250.0);
        s.page_by(100.0, true);
        s.page_by(100.0, true);
        assert_eq!(s.offset(), 150.0);
        s.page_by(100.0, false);
        s.page_by(100.0, false);
        assert_eq!(s.offset(), 0.0);
    }

    #[test]
    fn ensure_visible_moves_minimally() {
        let mut s = viewport(100.0, 1000.0);
        s.ensure_visible(250.0, 40.0);
        assert_eq!(s.offset(), 190.0);
        s.ensure_visible(200.0, 40.0);
        assert_eq!(s.offset(), 190.0);
        s.ensure_visible(20.0, 40.0);
        assert_eq!(s.offset(), 20.0);
    }

    #[test]
    fn tall_item_settles_on_its_top() {
        let mut s = viewport(100.0, 1000.0);
        for _ in 0..3 {
            s.ensure_visible(50.0, 200.0);
            assert_eq!(s.offset(), 50.0);
        }
        s.set_offset(0.0);
        s.ensure_visible(300.0, 100.0);
        assert_eq!(s.offset(), 300.0);
    }

    #[test]
    fn non_finite_input_is_neutralized() {
        let mut s = viewport(100.0, f32::NAN);
        assert_eq!(s.max_offset(), 0.0);
        s.scroll_by(f32::INFINITY);
        assert_eq!(s.offset(), 0.0);
    }
}
