use colony_core::{FontRole, Offset, Painter, Rect, Rgba};

use super::{DialogRenderResult, DialogTarget, error_line, frame};
use crate::error::ValidationError;
use crate::events::{KeyCode, KeyEvent, push_text};
use crate::panels::widgets::{self, ButtonKind};
use crate::panels::PanelContext;
use crate::scroll::{ScrollViewport, WHEEL_STEP};
use crate::theme::{COLOR_FIELDS, ColorScheme, ThemeColors, ThemeManager};

const COLUMNS: usize = 2;
const ROW_H: f32 = 56.0;
const FIELD_H: f32 = 34.0;
const COLUMN_GAP: f32 = 16.0;

#[derive(Clone, Debug, PartialEq)]
pub enum CustomThemeTarget {
    NameField,
    ColorField(usize),
    Save,
    Cancel,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CustomThemeAction {
    None,
    Handled,
    Cancel,
    /// Validated scheme; the caller registers it and makes it active.
    Save(ColorScheme),
}

/// Theme builder: a name plus one hex field per color slot. Focus index 0
/// is the name; `i + 1` is `COLOR_FIELDS[i]`.
#[derive(Debug, Default)]
pub struct CustomThemeDialog {
    visible: bool,
    name: String,
    colors: Vec<String>,
    focused: usize,
    scroll: ScrollViewport,
    error: Option<ValidationError>,
}

impl CustomThemeDialog {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Open prefilled with `base`'s colors.
    pub fn show(&mut self, base: &ThemeColors) {
        *self = Self {
            visible: true,
            colors: COLOR_FIELDS.iter().map(|f| (f.get)(base).to_hex()).collect(),
            ..Self::default()
        };
    }

    pub fn hide(&mut self) {
        *self = Self::default();
    }

    pub fn field_count() -> usize {
        1 + COLOR_FIELDS.len()
    }

    pub fn focused_index(&self) -> usize {
        self.focused
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self, index: usize) -> Option<&str> {
        self.colors.get(index).map(String::as_str)
    }

    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    pub fn set_error(&mut self, error: ValidationError) {
        self.error = Some(error);
    }

    pub fn scroll(&self) -> &ScrollViewport {
        &self.scroll
    }

    /// Size the color grid's viewport; render calls this every frame.
    pub fn layout_grid(&mut self, viewport: Rect) {
        let rows = COLOR_FIELDS.len().div_ceil(COLUMNS);
        self.scroll.update(viewport, rows as f32 * ROW_H);
    }

    fn field_top(color_index: usize) -> f32 {
        (color_index / COLUMNS) as f32 * ROW_H
    }

    pub fn focus(&mut self, index: usize) {
        self.focused = index.min(Self::field_count() - 1);
        if self.focused > 0 {
            self.scroll.ensure_visible(Self::field_top(self.focused - 1), ROW_H);
        }
    }

    fn buffer_mut(&mut self) -> Option<&mut String> {
        match self.focused {
            0 => Some(&mut self.name),
            i => self.colors.get_mut(i - 1),
        }
    }

    /// Validate every field; failures focus the offending field and keep
    /// the dialog open.
    pub fn submit(&mut self, themes: &ThemeManager) -> CustomThemeAction {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            self.error = Some(ValidationError::NameRequired);
            self.focus(0);
            return CustomThemeAction::Handled;
        }
        if themes.has_name(&name) {
            self.error = Some(ValidationError::DuplicateName);
            self.focus(0);
            return CustomThemeAction::Handled;
        }
        let mut colors = themes.active().colors;
        for (i, field) in COLOR_FIELDS.iter().enumerate() {
            let parsed = self.colors.get(i).and_then(|hex| Rgba::parse_hex(hex.trim()).ok());
            let Some(color) = parsed else {
                self.error = Some(ValidationError::InvalidColor { field: field.name.to_string() });
                self.focus(i + 1);
                return CustomThemeAction::Handled;
            };
            *(field.get_mut)(&mut colors) = color;
        }
        CustomThemeAction::Save(ColorScheme::custom(&name, colors))
    }

    pub fn handle_key(&mut self, event: KeyEvent, themes: &ThemeManager) -> CustomThemeAction {
        let n = Self::field_count();
        match event.key {
            KeyCode::Escape => CustomThemeAction::Cancel,
            KeyCode::Tab if event.modifiers.shift => {
                self.focus((self.focused + n - 1) % n);
                CustomThemeAction::Handled
            }
            KeyCode::Tab => {
                self.focus((self.focused + 1) % n);
                CustomThemeAction::Handled
            }
            KeyCode::Enter => self.submit(themes),
            KeyCode::Backspace => {
                if let Some(buf) = self.buffer_mut() {
                    buf.pop();
                }
                self.error = None;
                CustomThemeAction::Handled
            }
            KeyCode::PageUp | KeyCode::PageDown => {
                let h = self.scroll.viewport().h;
                self.scroll.page_by(h, event.key == KeyCode::PageDown);
                CustomThemeAction::Handled
            }
            _ => CustomThemeAction::None,
        }
    }

    pub fn handle_text(&mut self, text: &str) -> bool {
        let changed = self.buffer_mut().is_some_and(|buf| push_text(buf, text));
        if changed {
            self.error = None;
        }
        changed
    }

    pub fn handle_wheel(&mut self, dy: f32) {
        self.scroll.scroll_by(dy * WHEEL_STEP);
    }

    pub fn handle_click(&mut self, target: &CustomThemeTarget, themes: &ThemeManager) -> CustomThemeAction {
        match target {
            CustomThemeTarget::NameField => {
                self.focus(0);
                CustomThemeAction::Handled
            }
            CustomThemeTarget::ColorField(i) => {
                self.focus(i + 1);
                CustomThemeAction::Handled
            }
            CustomThemeTarget::Save => self.submit(themes),
            CustomThemeTarget::Cancel => CustomThemeAction::Cancel,
        }
    }

    pub fn render(&mut self, p: &mut Painter, ctx: &PanelContext, window: Rect, z: i32) -> DialogRenderResult {
        let c = ctx.colors;
        let (panel, body) = frame(p, ctx, window, 640.0, 620.0, ctx.tr("dialog.custom_theme.title"), z);
        let z = z + 3;
        let mut targets = Vec::new();
        let invalid_field = match &self.error {
            Some(ValidationError::NameRequired | ValidationError::DuplicateName) => Some(0),
            Some(ValidationError::InvalidColor { field }) => {
                COLOR_FIELDS.iter().position(|f| f.name == field).map(|i| i + 1)
            }
            _ => None,
        };

        let (name_label, rest) = body.take_top(22.0);
        widgets::label(p, ctx, name_label, ctx.tr("dialog.custom_theme.name"), FontRole::Ui, c.text_secondary, 0.0, z);
        let (name_row, rest) = rest.take_top(52.0);
        let name_field = Rect { h: 40.0, ..name_row };
        widgets::text_field(p, ctx, name_field, &self.name, "", self.focused == 0, invalid_field == Some(0), z);
        targets.push((name_field, DialogTarget::CustomTheme(CustomThemeTarget::NameField)));

        let (grid_area, footer) = rest.take_top((rest.h - 76.0).max(0.0));
        let message = self.error.as_ref().map(ToString::to_string);
        error_line(p, ctx, Rect { h: 24.0, ..footer }, message.as_deref(), z);
        let buttons_y = footer.bottom() - 40.0;
        let save = Rect::new(footer.right() - 110.0, buttons_y, 110.0, 40.0);
        let cancel = Rect::new(save.x - 120.0, buttons_y, 110.0, 40.0);
        widgets::button(p, ctx, save, ctx.tr("dialog.save"), ButtonKind::Primary, z);
        widgets::button(p, ctx, cancel, ctx.tr("dialog.cancel"), ButtonKind::Secondary, z);
        targets.push((save, DialogTarget::CustomTheme(CustomThemeTarget::Save)));
        targets.push((cancel, DialogTarget::CustomTheme(CustomThemeTarget::Cancel)));

        self.layout_grid(grid_area);
        let col_w = ((grid_area.w - 12.0 - COLUMN_GAP) / COLUMNS as f32).max(0.0);
        let mut list_targets = Vec::new();
        p.push_clip_rect(grid_area);
        p.push_offset(Offset::new(grid_area.x, grid_area.y - self.scroll.offset()));
        for (i, field) in COLOR_FIELDS.iter().enumerate() {
            let top = Self::field_top(i);
            if !self.scroll.is_visible(top, ROW_H) {
                continue;
            }
            let x = (i % COLUMNS) as f32 * (col_w + COLUMN_GAP);
            let caption = Rect::new(x, top, col_w, 20.0);
            widgets::label(p, ctx, caption, ctx.loc.get(field.label_key, field.name), FontRole::Ui, c.text_muted, 0.0, z);
            let swatch = Rect::new(x + col_w - FIELD_H, top + 20.0, FIELD_H, FIELD_H);
            let input = Rect::new(x, top + 20.0, (col_w - FIELD_H - 8.0).max(0.0), FIELD_H);
            let hex = self.colors.get(i).map(String::as_str).unwrap_or_default();
            widgets::text_field(p, ctx, input, hex, "#RRGGBB", self.focused == i + 1, invalid_field == Some(i + 1), z);
            if let Ok(color) = Rgba::parse_hex(hex.trim()) {
                p.fill_rounded_rect(swatch, 6.0, color, z);
            }
            p.stroke_rect(swatch, 1.0, 6.0, c.border, z + 1);
            let hit = Rect::new(x, top + 20.0, col_w, FIELD_H);
            list_targets.push((p.current_offset().apply_rect(hit), DialogTarget::CustomTheme(CustomThemeTarget::ColorField(i))));
        }
        p.pop_offset();
        widgets::scrollbar(p, ctx, grid_area, self.scroll.offset(), self.scroll.max_offset(), z + 3);
        p.pop_clip();

        DialogRenderResult { panel, targets, list_viewport: Some(grid_area), list_targets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::presets;

    fn open(themes: &ThemeManager) -> CustomThemeDialog {
        let mut d = CustomThemeDialog::default();
        d.show(&themes.active().colors);
        d.layout_grid(Rect::new(0.0, 0.0, 500.0, 2.0 * ROW_H));
        d
    }

    #[test]
    fn empty_name_refocuses_name_field() {
        let themes = ThemeManager::new();
        let mut d = open(&themes);
        d.focus(5);
        assert_eq!(d.submit(&themes), CustomThemeAction::Handled);
        assert_eq!(d.error(), Some(&ValidationError::NameRequired));
        assert_eq!(d.focused_index(), 0);
    }

    #[test]
    fn duplicate_name_is_case_insensitive() {
        let themes = ThemeManager::new();
        let mut d = open(&themes);
        let taken = themes.active().name.to_uppercase();
        d.handle_text(&taken);
        assert_eq!(d.submit(&themes), CustomThemeAction::Handled);
        assert_eq!(d.error(), Some(&ValidationError::DuplicateName));
    }

    #[test]
    fn invalid_color_focuses_and_scrolls_to_field() {
        let themes = ThemeManager::new();
        let mut d = open(&themes);
        d.handle_text("Mine");
        let last = COLOR_FIELDS.len() - 1;
        d.handle_click(&CustomThemeTarget::ColorField(last), &themes);
        for _ in 0..9 {
            d.handle_key(KeyEvent::plain(KeyCode::Backspace), &themes);
        }
        d.handle_text("nope");
        d.focus(0);
        d.handle_wheel(100.0);
        assert_eq!(d.scroll().offset(), 0.0);
        assert_eq!(d.submit(&themes), CustomThemeAction::Handled);
        assert_eq!(d.focused_index(), last + 1);
        assert_eq!(
            d.error(),
            Some(&ValidationError::InvalidColor { field: COLOR_FIELDS[last].name.to_string() })
        );
        assert!(d.scroll().is_visible(CustomThemeDialog::field_top(last), ROW_H));
    }

    #[test]
    fn tab_and_shift_tab_wrap() {
        let themes = ThemeManager::new();
        let mut d = open(&themes);
        d.handle_key(KeyEvent::shifted(KeyCode::Tab), &themes);
        assert_eq!(d.focused_index(), CustomThemeDialog::field_count() - 1);
        assert!(d.scroll().offset() > 0.0);
        d.handle_key(KeyEvent::plain(KeyCode::Tab), &themes);
        assert_eq!(d.focused_index(), 0);
        d.handle_key(KeyEvent::plain(KeyCode::Tab), &themes);
        assert_eq!(d.focused_index(), 1);
    }

    #[test]
    fn valid_submission_builds_custom_scheme() {
        let themes = ThemeManager::new();
        let mut d = open(&themes);
        d.handle_text("Night Owl");
        d.focus(1);
        for _ in 0..7 {
            d.handle_key(KeyEvent::plain(KeyCode::Backspace), &themes);
        }
        d.handle_text("#010203");
        let CustomThemeAction::Save(scheme) = d.submit(&themes) else { panic!("expected save") };
        assert_eq!(scheme.name, "Night Owl");
        assert_eq!(scheme.id, "custom-night-owl");
        assert!(scheme.custom);
        assert_eq!(scheme.colors.background, Rgba::rgb(1, 2, 3));
        assert_eq!(scheme.colors.accent, presets::colony_dark().colors.accent);
    }
}
