//! Panel renderers. Each takes the rectangle the layout engine assigned,
//! paints into the frame's [`Painter`] and returns the interactive
//! rectangles it drew, valid until the next frame.

pub mod chrome;
pub mod hero;
pub mod hub;
pub mod library;
pub mod nav_rail;
pub mod settings_panel;
pub mod widgets;

use colony_core::{FontRole, Painter, Rect};
use colony_text::{TextMeasurer, TextStyle};

use crate::localization::Localization;
use crate::theme::{ThemeColors, Typography};

/// Read-only inputs shared by every panel for one frame.
#[derive(Clone, Copy)]
pub struct PanelContext<'a> {
    pub colors: &'a ThemeColors,
    pub typography: &'a Typography,
    pub measurer: &'a dyn TextMeasurer,
    pub loc: &'a Localization,
    /// Row height multiplier, 1.0 = comfortable.
    pub density: f32,
    /// Pointer position in window coordinates, for hover styling.
    pub pointer: [f32; 2],
}

impl<'a> PanelContext<'a> {
    pub fn style(&self, role: FontRole) -> TextStyle {
        let size = match role {
            FontRole::Display => self.typography.display,
            FontRole::Headline => self.typography.headline,
            FontRole::Body => self.typography.body,
            FontRole::Ui => self.typography.ui,
        };
        TextStyle::new(role, size)
    }

    pub fn row(&self, base: f32) -> f32 {
        (base * self.density).round()
    }

    /// Whether the pointer is over `rect` (painter-local), honoring the
    /// painter's offset and clip.
    pub fn hovered(&self, painter: &Painter, rect: Rect) -> bool {
        let abs = painter.current_offset().apply_rect(rect);
        let [x, y] = self.pointer;
        abs.contains(x, y) && painter.current_clip().is_none_or(|c| c.contains(x, y))
    }

    pub fn tr(&self, key: &'a str) -> &'a str {
        self.loc.tr(key)
    }
}
