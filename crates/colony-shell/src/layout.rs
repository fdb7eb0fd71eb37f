//! Window partitioning: top bar, nav rail, library column, hero column and
//! status bar.

use colony_core::Rect;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConstraints {
    pub nav_min: f32,
    pub nav_max: f32,
    pub library_min: f32,
    pub library_max: f32,
    pub hero_min: f32,
    pub top_bar_height: f32,
    pub status_bar_height: f32,
    /// Width of the grab area centred on each column boundary.
    pub divider_width: f32,
}

impl Default for LayoutConstraints {
    fn default() -> Self {
        Self {
            nav_min: 72.0,
            nav_max: 260.0,
            library_min: 220.0,
            library_max: 480.0,
            hero_min: 320.0,
            top_bar_height: 52.0,
            status_bar_height: 28.0,
            divider_width: 8.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameLayout {
    pub top_bar: Rect,
    pub nav_rail: Rect,
    pub library: Rect,
    pub hero: Rect,
    pub status_bar: Rect,
}

impl FrameLayout {
    /// Everything between the top bar and the status bar.
    pub fn body(&self) -> Rect {
        let x = self.nav_rail.x;
        let y = self.nav_rail.y;
        Rect::new(x, y, self.hero.right() - x, self.nav_rail.h)
    }

    pub fn divider(&self, divider: Divider, width: f32) -> Rect {
        let edge = match divider {
            Divider::NavLibrary => self.nav_rail.right(),
            Divider::LibraryHero => self.library.right(),
        };
        Rect::new(edge - width * 0.5, self.nav_rail.y, width, self.nav_rail.h)
    }
}

/// Column boundaries the user can drag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Divider {
    NavLibrary,
    LibraryHero,
}

/// Keeps the user-adjustable column widths across frames.
#[derive(Clone, Debug)]
pub struct LayoutEngine {
    constraints: LayoutConstraints,
    nav_width: f32,
    library_width: f32,
    show_status_bar: bool,
    last: FrameLayout,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(LayoutConstraints::default())
    }
}

impl LayoutEngine {
    pub fn new(constraints: LayoutConstraints) -> Self {
        Self {
            constraints,
            nav_width: 200.0,
            library_width: 320.0,
            show_status_bar: true,
            last: FrameLayout::default(),
        }
    }

    pub fn constraints(&self) -> &LayoutConstraints {
        &self.constraints
    }

    pub fn nav_width(&self) -> f32 {
        self.nav_width
    }

    pub fn library_width(&self) -> f32 {
        self.library_width
    }

    pub fn set_widths(&mut self, nav: f32, library: f32) {
        self.nav_width = nav;
        self.library_width = library;
    }

    pub fn set_show_status_bar(&mut self, show: bool) {
        self.show_status_bar = show;
    }

    pub fn last(&self) -> FrameLayout {
        self.last
    }

    /// Partition an `output_width` x `output_height` surface.
    ///
    /// The hero column has priority: when space runs short the library
    /// shrinks to its minimum first, then the nav rail. Hero width bottoms
    /// out at zero. The clamped widths are written back as the new hints.
    /// Non-positive sizes return the previous layout unchanged.
    pub fn compute(&mut self, output_width: f32, output_height: f32) -> FrameLayout {
        if !(output_width > 0.0 && output_height > 0.0) {
            return self.last;
        }
        let c = self.constraints;

        let mut nav = clamp_width(self.nav_width, c.nav_min, c.nav_max);
        let mut library = clamp_width(self.library_width, c.library_min, c.library_max);
        let mut hero = output_width - nav - library;

        if hero < c.hero_min {
            let cut = (c.hero_min - hero).min(library - c.library_min).max(0.0);
            library -= cut;
            hero += cut;
        }
        if hero < c.hero_min {
            let cut = (c.hero_min - hero).min(nav - c.nav_min).max(0.0);
            nav -= cut;
            hero += cut;
        }
        let hero = hero.max(0.0);

        self.nav_width = nav;
        self.library_width = library;

        let top_h = c.top_bar_height.min(output_height);
        let status_h = if self.show_status_bar {
            c.status_bar_height.min(output_height - top_h)
        } else {
            0.0
        };
        let body_y = top_h;
        let body_h = (output_height - top_h - status_h).max(0.0);

        let layout = FrameLayout {
            top_bar: Rect::new(0.0, 0.0, output_width, top_h),
            nav_rail: Rect::new(0.0, body_y, nav, body_h),
            library: Rect::new(nav, body_y, library, body_h),
            hero: Rect::new(nav + library, body_y, hero, body_h),
            status_bar: Rect::new(0.0, output_height - status_h, output_width, status_h),
        };
        self.last = layout;
        layout
    }

    /// Apply a drag of `delta` pixels to the width left of `divider`.
    /// The next `compute` clamps the result.
    pub fn drag_divider(&mut self, divider: Divider, start_width: f32, delta: f32) {
        let w = (start_width + delta).round();
        match divider {
            Divider::NavLibrary => {
                self.nav_width = clamp_width(w, self.constraints.nav_min, self.constraints.nav_max)
            }
            Divider::LibraryHero => {
                self.library_width =
                    clamp_width(w, self.constraints.library_min, self.constraints.library_max)
            }
        }
    }

    pub fn width_of(&self, divider: Divider) -> f32 {
        match divider {
            Divider::NavLibrary => self.nav_width,
            Divider::LibraryHero => self.library_width,
        }
    }
}

fn clamp_width(w: f32, min: f32, max: f32) -> f32 {
    let w = if w.is_finite() { w } else { min };
    w.clamp(min, max.max(min))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_window_keeps_hints() {
        let mut engine = LayoutEngine::default();
        let l = engine.compute(1400.0, 900.0);
        assert_eq!(l.nav_rail.w, 200.0);
        assert_eq!(l.library.w, 320.0);
        assert_eq!(l.hero.w, 880.0);
        assert_eq!(l.hero.x, 520.0);
        assert_eq!(l.top_bar.h, 52.0);
        assert_eq!(l.status_bar.y, 872.0);
        assert_eq!(l.nav_rail.h, 900.0 - 52.0 - 28.0);
    }

    #[test]
    fn library_shrinks_before_nav() {
        let mut engine = LayoutEngine::default();
        let l = engine.compute(800.0, 600.0);
        assert_eq!(l.hero.w, 320.0);
        assert_eq!(l.nav_rail.w, 200.0);
        assert_eq!(l.library.w, 280.0);

        let l = engine.compute(700.0, 600.0);
        assert_eq!(l.library.w, 220.0);
        assert_eq!(l.nav_rail.w, 160.0);
        assert_eq!(l.hero.w, 320.0);
    }

    #[test]
    fn clamped_widths_persist_as_hints() {
        let mut engine = LayoutEngine::default();
        engine.compute(700.0, 600.0);
        assert_eq!(engine.library_width(), 220.0);
        let l = engine.compute(1400.0, 600.0);
        assert_eq!(l.library.w, 220.0);
    }

    #[test]
    fn degenerate_width_zeroes_hero() {
        let mut engine = LayoutEngine::default();
        let l = engine.compute(200.0, 400.0);
        assert_eq!(l.nav_rail.w, 72.0);
        assert_eq!(l.library.w, 220.0);
        assert_eq!(l.hero.w, 0.0);
    }

    #[test]
    fn non_positive_size_returns_previous_layout() {
        let mut engine = LayoutEngine::default();
        let first = engine.compute(1000.0, 700.0);
        assert_eq!(engine.compute(0.0, 700.0), first);
        assert_eq!(engine.compute(1000.0, -5.0), first);
    }

    #[test]
    fn hidden_status_bar_gives_body_the_space() {
        let mut engine = LayoutEngine::default();
        engine.set_show_status_bar(false);
        let l = engine.compute(1000.0, 700.0);
        assert_eq!(l.status_bar.h, 0.0);
        assert_eq!(l.hero.bottom(), 700.0);
    }

    #[test]
    fn drag_is_clamped_to_bounds() {
        let mut engine = LayoutEngine::default();
        engine.drag_divider(Divider::NavLibrary, 200.0, 500.0);
        assert_eq!(engine.nav_width(), 260.0);
        engine.drag_divider(Divider::LibraryHero, 320.0, -400.0);
        assert_eq!(engine.library_width(), 220.0);
    }

    #[test]
    fn divider_straddles_column_edge() {
        let mut engine = LayoutEngine::default();
        let l = engine.compute(1400.0, 900.0);
        let d = l.divider(Divider::LibraryHero, 8.0);
        assert_eq!(d.x, 516.0);
        assert!(d.contains(520.0, 100.0));
    }
}
