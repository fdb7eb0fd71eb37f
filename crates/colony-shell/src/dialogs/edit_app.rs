use colony_core::{FontRole, Painter, Rect, Rgba, is_rgb_hex};

use super::{DialogRenderResult, DialogTarget, error_line, frame};
use crate::error::ValidationError;
use crate::events::{KeyCode, KeyEvent, push_text};
use crate::panels::widgets::{self, ButtonKind};
use crate::panels::PanelContext;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EditField {
    #[default]
    Name,
    Accent,
}

impl EditField {
    fn next(self) -> Self {
        match self {
            EditField::Name => EditField::Accent,
            EditField::Accent => EditField::Name,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum EditAppTarget {
    NameField,
    AccentField,
    Save,
    Cancel,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EditAppAction {
    None,
    Handled,
    Cancel,
    Save { id: String, name: String, accent: Rgba },
}

/// Rename / recolor a user-added program.
#[derive(Debug, Default)]
pub struct EditAppDialog {
    visible: bool,
    program_id: String,
    name: String,
    accent: String,
    focused: EditField,
    error: Option<ValidationError>,
}

impl EditAppDialog {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show(&mut self, program_id: &str, name: &str, accent: Rgba) {
        *self = Self {
            visible: true,
            program_id: program_id.to_string(),
            name: name.to_string(),
            accent: accent.to_hex(),
            ..Self::default()
        };
    }

    pub fn hide(&mut self) {
        *self = Self::default();
    }

    pub fn program_id(&self) -> &str {
        &self.program_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn accent(&self) -> &str {
        &self.accent
    }

    pub fn focused(&self) -> EditField {
        self.focused
    }

    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    pub fn set_error(&mut self, error: ValidationError) {
        self.error = Some(error);
    }

    fn buffer_mut(&mut self) -> &mut String {
        match self.focused {
            EditField::Name => &mut self.name,
            EditField::Accent => &mut self.accent,
        }
    }

    pub fn submit(&mut self) -> EditAppAction {
        let name = self.name.trim();
        if name.is_empty() {
            self.focused = EditField::Name;
            self.error = Some(ValidationError::NameRequired);
            return EditAppAction::Handled;
        }
        let parsed = if is_rgb_hex(&self.accent) { Rgba::parse_hex(self.accent.trim()).ok() } else { None };
        let Some(accent) = parsed else {
            self.focused = EditField::Accent;
            self.error = Some(ValidationError::InvalidColor { field: "accent".into() });
            return EditAppAction::Handled;
        };
        EditAppAction::Save { id: self.program_id.clone(), name: name.to_string(), accent }
    }

    pub fn handle_key(&mut self, event: KeyEvent) -> EditAppAction {
        match event.key {
            KeyCode::Escape => EditAppAction::Cancel,
            KeyCode::Tab => {
                self.focused = self.focused.next();
                EditAppAction::Handled
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                self.buffer_mut().pop();
                self.error = None;
                EditAppAction::Handled
            }
            _ => EditAppAction::None,
        }
    }

    pub fn handle_text(&mut self, text: &str) -> bool {
        let changed = push_text(self.buffer_mut(), text);
        if changed {
            self.error = None;
        }
        changed
    }

    pub fn handle_click(&mut self, target: &EditAppTarget) -> EditAppAction {
        match target {
            EditAppTarget::NameField => {
                self.focused = EditField::Name;
                EditAppAction::Handled
            }
            EditAppTarget::AccentField => {
                self.focused = EditField::Accent;
                EditAppAction::Handled
            }
            EditAppTarget::Save => self.submit(),
            EditAppTarget::Cancel => EditAppAction::Cancel,
        }
    }

    pub fn render(&self, p: &mut Painter, ctx: &PanelContext, window: Rect, z: i32) -> DialogRenderResult {
        let c = ctx.colors;
        let (panel, body) = frame(p, ctx, window, 480.0, 330.0, ctx.tr("dialog.edit_app.title"), z);
        let z = z + 3;
        let mut targets = Vec::new();
        let invalid = |field: EditField| match &self.error {
            Some(ValidationError::NameRequired) => field == EditField::Name,
            Some(ValidationError::InvalidColor { .. }) => field == EditField::Accent,
            _ => false,
        };

        let (name_label, rest) = body.take_top(22.0);
        widgets::label(p, ctx, name_label, ctx.tr("dialog.edit_app.name"), FontRole::Ui, c.text_secondary, 0.0, z);
        let (name_row, rest) = rest.take_top(50.0);
        let name_field = Rect { h: 40.0, ..name_row };
        widgets::text_field(p, ctx, name_field, &self.name, "", self.focused == EditField::Name, invalid(EditField::Name), z);
        targets.push((name_field, DialogTarget::EditApp(EditAppTarget::NameField)));

        let (accent_label, rest) = rest.take_top(22.0);
        widgets::label(p, ctx, accent_label, ctx.tr("dialog.edit_app.accent"), FontRole::Ui, c.text_secondary, 0.0, z);
        let (accent_row, rest) = rest.take_top(50.0);
        let swatch = Rect::new(accent_row.right() - 40.0, accent_row.y, 40.0, 40.0);
        let accent_field = Rect { w: (accent_row.w - 52.0).max(0.0), h: 40.0, ..accent_row };
        widgets::text_field(p, ctx, accent_field, &self.accent, "#RRGGBB", self.focused == EditField::Accent, invalid(EditField::Accent), z);
        targets.push((accent_field, DialogTarget::EditApp(EditAppTarget::AccentField)));
        if let Ok(color) = Rgba::parse_hex(self.accent.trim()) {
            p.fill_rounded_rect(swatch, 6.0, color, z);
        }
        p.stroke_rect(swatch, 1.0, 6.0, c.border, z + 1);

        let message = self.error.as_ref().map(ToString::to_string);
        error_line(p, ctx, Rect { h: 24.0, ..rest }, message.as_deref(), z);

        let buttons_y = rest.bottom() - 40.0;
        let save = Rect::new(rest.right() - 110.0, buttons_y, 110.0, 40.0);
        let cancel = Rect::new(save.x - 120.0, buttons_y, 110.0, 40.0);
        widgets::button(p, ctx, save, ctx.tr("dialog.save"), ButtonKind::Primary, z);
        widgets::button(p, ctx, cancel, ctx.tr("dialog.cancel"), ButtonKind::Secondary, z);
        targets.push((save, DialogTarget::EditApp(EditAppTarget::Save)));
        targets.push((cancel, DialogTarget::EditApp(EditAppTarget::Cancel)));

        DialogRenderResult { panel, targets, list_viewport: None, list_targets: Vec::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(d: &mut EditAppDialog, s: &str) {
        assert!(d.handle_text(s));
    }

    #[test]
    fn show_prefills_and_tab_cycles() {
        let mut d = EditAppDialog::default();
        d.show("user-tool", "Tool", Rgba::rgb(0x11, 0x22, 0x33));
        assert!(d.is_visible());
        assert_eq!(d.accent(), "#112233");
        assert_eq!(d.focused(), EditField::Name);
        d.handle_key(KeyEvent::plain(KeyCode::Tab));
        assert_eq!(d.focused(), EditField::Accent);
        d.handle_key(KeyEvent::plain(KeyCode::Tab));
        assert_eq!(d.focused(), EditField::Name);
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut d = EditAppDialog::default();
        d.show("user-tool", "T", Rgba::BLACK);
        d.handle_key(KeyEvent::plain(KeyCode::Backspace));
        assert_eq!(d.submit(), EditAppAction::Handled);
        assert_eq!(d.error(), Some(&ValidationError::NameRequired));
        assert!(d.is_visible());
    }

    #[test]
    fn bad_accent_focuses_accent_field() {
        let mut d = EditAppDialog::default();
        d.show("user-tool", "Tool", Rgba::BLACK);
        d.handle_click(&EditAppTarget::AccentField);
        for _ in 0..7 {
            d.handle_key(KeyEvent::plain(KeyCode::Backspace));
        }
        typed(&mut d, "#12");
        assert_eq!(d.submit(), EditAppAction::Handled);
        assert_eq!(d.error(), Some(&ValidationError::InvalidColor { field: "accent".into() }));
        assert_eq!(d.focused(), EditField::Accent);
        // 8-digit hex parses but is not accepted here
        typed(&mut d, "345678");
        assert_eq!(d.submit(), EditAppAction::Handled);
    }

    #[test]
    fn short_hex_saves_trimmed_name() {
        let mut d = EditAppDialog::default();
        d.show("user-tool", "  ", Rgba::BLACK);
        typed(&mut d, "Renamed ");
        d.handle_key(KeyEvent::plain(KeyCode::Tab));
        for _ in 0..7 {
            d.handle_key(KeyEvent::plain(KeyCode::Backspace));
        }
        typed(&mut d, "#fff");
        assert_eq!(
            d.handle_key(KeyEvent::plain(KeyCode::Enter)),
            EditAppAction::Save { id: "user-tool".into(), name: "Renamed".into(), accent: Rgba::WHITE }
        );
        assert_eq!(d.handle_click(&EditAppTarget::Cancel), EditAppAction::Cancel);
    }
}
