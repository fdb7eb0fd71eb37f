//! Modal dialogs. At most one is visible; showing any dialog hides the
//! others and hiding always resets focus and error state.

pub mod add_app;
pub mod custom_theme;
pub mod edit_app;
pub mod file_browser;

use std::path::Path;

use colony_core::{FontRole, Painter, Rect, Rgba};

pub use add_app::{AddAppAction, AddAppDialog, AddAppTarget};
pub use custom_theme::{CustomThemeAction, CustomThemeDialog, CustomThemeTarget};
pub use edit_app::{EditAppAction, EditAppDialog, EditAppTarget, EditField};

use crate::panels::{PanelContext, widgets};
use crate::theme::ThemeColors;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogKind {
    AddApp,
    EditApp,
    CustomTheme,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DialogTarget {
    AddApp(AddAppTarget),
    EditApp(EditAppTarget),
    CustomTheme(CustomThemeTarget),
}

/// Panel rectangle plus interactive rectangles for one dialog frame.
pub struct DialogRenderResult {
    pub panel: Rect,
    pub targets: Vec<(Rect, DialogTarget)>,
    /// Clip for targets inside the dialog's scrolling list, if any.
    pub list_viewport: Option<Rect>,
    pub list_targets: Vec<(Rect, DialogTarget)>,
}

#[derive(Default)]
pub struct Dialogs {
    pub add_app: AddAppDialog,
    pub edit_app: EditAppDialog,
    pub custom_theme: CustomThemeDialog,
}

impl Dialogs {
    pub fn new(global_search_cap: usize) -> Self {
        Self { add_app: AddAppDialog::new(global_search_cap), ..Self::default() }
    }

    pub fn visible(&self) -> Option<DialogKind> {
        if self.add_app.is_visible() {
            Some(DialogKind::AddApp)
        } else if self.edit_app.is_visible() {
            Some(DialogKind::EditApp)
        } else if self.custom_theme.is_visible() {
            Some(DialogKind::CustomTheme)
        } else {
            None
        }
    }

    pub fn any_visible(&self) -> bool {
        self.visible().is_some()
    }

    pub fn hide_all(&mut self) {
        self.add_app.hide();
        self.edit_app.hide();
        self.custom_theme.hide();
    }

    pub fn show_add_app(&mut self, start_dir: &Path) {
        self.hide_all();
        self.add_app.show(start_dir);
    }

    pub fn show_edit_app(&mut self, program_id: &str, name: &str, accent: Rgba) {
        self.hide_all();
        self.edit_app.show(program_id, name, accent);
    }

    pub fn show_custom_theme(&mut self, base: &ThemeColors) {
        self.hide_all();
        self.custom_theme.show(base);
    }
}

/// Scrim over `window` plus a centred panel with a title. Returns the
/// panel and the content area below the title.
pub(crate) fn frame(p: &mut Painter, ctx: &PanelContext, window: Rect, w: f32, h: f32, title: &str, z: i32) -> (Rect, Rect) {
    let c = ctx.colors;
    p.fill_rect(window, Rgba::BLACK.with_alpha(150), z);
    let w = w.min(window.w - 32.0).max(0.0);
    let h = h.min(window.h - 32.0).max(0.0);
    let panel = Rect::new(window.x + (window.w - w) * 0.5, window.y + (window.h - h) * 0.5, w, h);
    p.fill_rounded_rect(panel, 14.0, c.surface, z + 1);
    p.stroke_rect(panel, 1.0, 14.0, c.border, z + 2);
    let inner = panel.inset(22.0, 18.0);
    let (title_row, body) = inner.take_top(40.0);
    widgets::label(p, ctx, title_row, title, FontRole::Headline, c.text_primary, 0.0, z + 3);
    (panel, body)
}

/// Error line under a dialog's fields.
pub(crate) fn error_line(p: &mut Painter, ctx: &PanelContext, rect: Rect, message: Option<&str>, z: i32) {
    if let Some(msg) = message {
        widgets::label(p, ctx, rect, msg, FontRole::Ui, ctx.colors.danger, 0.0, z);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::presets;

    #[test]
    fn showing_one_dialog_hides_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let mut dialogs = Dialogs::new(16);
        dialogs.show_custom_theme(&presets::colony_dark().colors);
        assert_eq!(dialogs.visible(), Some(DialogKind::CustomTheme));
        dialogs.show_edit_app("user-x", "x", Rgba::BLACK);
        assert_eq!(dialogs.visible(), Some(DialogKind::EditApp));
        assert!(!dialogs.custom_theme.is_visible());
        dialogs.show_add_app(dir.path());
        assert_eq!(dialogs.visible(), Some(DialogKind::AddApp));
        assert!(!dialogs.edit_app.is_visible());
        dialogs.hide_all();
        assert!(!dialogs.any_visible());
    }
}
