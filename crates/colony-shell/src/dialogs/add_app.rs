use std::path::{Path, PathBuf};

use colony_core::{FontRole, Offset, Painter, Rect};
use tracing::debug;

use super::file_browser::{self, BrowserEntry, FileFilter, SortMode};
use super::{DialogRenderResult, DialogTarget, error_line, frame};
use crate::error::ValidationError;
use crate::events::{KeyCode, KeyEvent, push_text};
use crate::panels::widgets::{self, ButtonKind};
use crate::panels::PanelContext;
use crate::scroll::{ScrollViewport, WHEEL_STEP};

const ROW_H: f32 = 36.0;
const DEFAULT_SEARCH_CAP: usize = 512;
const SEARCH_HINT: &str = "Press Enter to search all files";
const NO_MATCHES: &str = "No matching files";

#[derive(Clone, Debug, PartialEq)]
pub enum AddAppTarget {
    Up,
    Search,
    Sort,
    Filter,
    Entry(usize),
    Confirm,
    Cancel,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AddAppAction {
    None,
    Handled,
    Cancel,
    /// Validated file to add.
    Confirm(PathBuf),
}

/// File picker for adding a local executable.
#[derive(Debug)]
pub struct AddAppDialog {
    visible: bool,
    dir: PathBuf,
    entries: Vec<BrowserEntry>,
    query: String,
    sort: SortMode,
    filter: FileFilter,
    highlighted: Option<usize>,
    selected: Option<PathBuf>,
    scroll: ScrollViewport,
    /// Enumeration problem for the current directory.
    message: Option<&'static str>,
    error: Option<ValidationError>,
    search_cap: usize,
    /// A `*` query waiting for Enter before walking the disk.
    search_pending: bool,
}

impl Default for AddAppDialog {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_CAP)
    }
}

impl AddAppDialog {
    pub fn new(search_cap: usize) -> Self {
        Self {
            visible: false,
            dir: PathBuf::new(),
            entries: Vec::new(),
            query: String::new(),
            sort: SortMode::default(),
            filter: FileFilter::default(),
            highlighted: None,
            selected: None,
            scroll: ScrollViewport::new(),
            message: None,
            error: None,
            search_cap,
            search_pending: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show(&mut self, start_dir: &Path) {
        *self = Self::new(self.search_cap);
        self.visible = true;
        self.dir = start_dir.to_path_buf();
        self.refresh();
    }

    pub fn hide(&mut self) {
        *self = Self::new(self.search_cap);
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entries(&self) -> &[BrowserEntry] {
        &self.entries
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sort(&self) -> SortMode {
        self.sort
    }

    pub fn filter(&self) -> FileFilter {
        self.filter
    }

    pub fn selected(&self) -> Option<&Path> {
        self.selected.as_deref()
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn message(&self) -> Option<&'static str> {
        self.message
    }

    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    pub fn set_error(&mut self, error: ValidationError) {
        self.error = Some(error);
    }

    /// A leading `*` switches from listing to a recursive search.
    pub fn is_global_search(&self) -> bool {
        self.query.starts_with('*')
    }

    pub fn is_search_pending(&self) -> bool {
        self.search_pending
    }

    /// Re-list the current directory. A global query only arms the search;
    /// the walk itself waits for [`Self::run_global_search`].
    pub fn refresh(&mut self) {
        self.highlighted = None;
        self.scroll.scroll_to_top();
        self.message = None;
        self.search_pending = false;
        if let Some(needle) = self.query.strip_prefix('*') {
            self.entries.clear();
            self.search_pending = !needle.trim().is_empty();
            self.message = self.search_pending.then_some(SEARCH_HINT);
            return;
        }
        match file_browser::list_directory(&self.dir, self.filter, self.sort, &self.query) {
            Ok(entries) => self.entries = entries,
            Err(e) => {
                self.entries.clear();
                self.message = Some(e.message());
            }
        }
    }

    /// Walk from the filesystem root for the current `*` query.
    pub fn run_global_search(&mut self) {
        self.search_pending = false;
        self.highlighted = None;
        self.scroll.scroll_to_top();
        let Some(needle) = self.query.strip_prefix('*') else { return };
        let root = file_browser::search_root(&self.dir);
        debug!(root = %root.display(), needle, "global search");
        self.entries = file_browser::global_search(&root, needle, self.filter, self.search_cap);
        self.message = self.entries.is_empty().then_some(NO_MATCHES);
    }

    pub fn navigate(&mut self, dir: &Path) {
        self.dir = dir.to_path_buf();
        self.query.clear();
        self.selected = None;
        self.error = None;
        self.refresh();
    }

    pub fn go_up(&mut self) -> bool {
        match self.dir.parent().map(Path::to_path_buf) {
            Some(parent) => {
                self.navigate(&parent);
                true
            }
            None => false,
        }
    }

    pub fn cycle_sort(&mut self) {
        self.sort = self.sort.next();
        file_browser::sort_entries(&mut self.entries, self.sort);
        self.highlighted = None;
    }

    pub fn cycle_filter(&mut self) {
        self.filter = self.filter.next();
        self.refresh();
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.refresh();
    }

    /// Mark a file as the one to add.
    pub fn select_path(&mut self, path: &Path) {
        self.selected = Some(path.to_path_buf());
        self.error = None;
    }

    /// Open a directory entry or select a file entry.
    fn activate(&mut self, index: usize) -> bool {
        let Some(entry) = self.entries.get(index).cloned() else { return false };
        if entry.is_dir {
            self.navigate(&entry.path);
        } else {
            self.highlighted = Some(index);
            self.select_path(&entry.path);
        }
        true
    }

    /// Validate the selection; on success the caller adds it and hides the
    /// dialog.
    pub fn confirm(&mut self) -> AddAppAction {
        let result = match &self.selected {
            None => Err(ValidationError::NoSelection),
            Some(path) => match std::fs::metadata(path) {
                Err(_) => Err(ValidationError::PathMissing),
                Ok(meta) if meta.is_dir() => Err(ValidationError::PathIsDirectory),
                Ok(_) => Ok(path.clone()),
            },
        };
        match result {
            Ok(path) => AddAppAction::Confirm(path),
            Err(e) => {
                self.error = Some(e);
                AddAppAction::Handled
            }
        }
    }

    fn move_highlight(&mut self, delta: isize) {
        let n = self.entries.len();
        if n == 0 {
            self.highlighted = None;
            return;
        }
        let next = match self.highlighted {
            Some(i) => (i as isize + delta).clamp(0, n as isize - 1) as usize,
            None => 0,
        };
        self.highlighted = Some(next);
        self.scroll.ensure_visible(next as f32 * ROW_H, ROW_H);
    }

    pub fn handle_key(&mut self, event: KeyEvent) -> AddAppAction {
        match event.key {
            KeyCode::Escape => AddAppAction::Cancel,
            KeyCode::ArrowDown => {
                self.move_highlight(1);
                AddAppAction::Handled
            }
            KeyCode::ArrowUp => {
                self.move_highlight(-1);
                AddAppAction::Handled
            }
            KeyCode::Home => {
                self.highlighted = None;
                self.move_highlight(0);
                AddAppAction::Handled
            }
            KeyCode::End => {
                self.highlighted = Some(self.entries.len().saturating_sub(1));
                self.move_highlight(0);
                AddAppAction::Handled
            }
            KeyCode::PageUp | KeyCode::PageDown => {
                let h = self.scroll.viewport().h;
                self.scroll.page_by(h, event.key == KeyCode::PageDown);
                AddAppAction::Handled
            }
            KeyCode::Backspace => {
                if self.query.pop().is_some() {
                    self.refresh();
                }
                AddAppAction::Handled
            }
            KeyCode::Enter if self.search_pending => {
                self.run_global_search();
                AddAppAction::Handled
            }
            KeyCode::Enter => match self.highlighted {
                Some(i) if self.entries.get(i).is_some_and(|e| e.is_dir) => {
                    self.activate(i);
                    AddAppAction::Handled
                }
                Some(i) => {
                    self.activate(i);
                    self.confirm()
                }
                None => self.confirm(),
            },
            _ => AddAppAction::None,
        }
    }

    pub fn handle_text(&mut self, text: &str) -> bool {
        if push_text(&mut self.query, text) {
            self.refresh();
            true
        } else {
            false
        }
    }

    pub fn handle_wheel(&mut self, dy: f32) {
        self.scroll.scroll_by(dy * WHEEL_STEP);
    }

    pub fn handle_click(&mut self, target: &AddAppTarget, click_count: u32) -> AddAppAction {
        match target {
            AddAppTarget::Up => {
                self.go_up();
                AddAppAction::Handled
            }
            AddAppTarget::Search => AddAppAction::Handled,
            AddAppTarget::Sort => {
                self.cycle_sort();
                AddAppAction::Handled
            }
            AddAppTarget::Filter => {
                self.cycle_filter();
                AddAppAction::Handled
            }
            AddAppTarget::Entry(i) => {
                let is_file = self.entries.get(*i).is_some_and(|e| !e.is_dir);
                self.activate(*i);
                if is_file && click_count >= 2 { self.confirm() } else { AddAppAction::Handled }
            }
            AddAppTarget::Confirm => self.confirm(),
            AddAppTarget::Cancel => AddAppAction::Cancel,
        }
    }

    pub fn render(&mut self, p: &mut Painter, ctx: &PanelContext, window: Rect, z: i32) -> DialogRenderResult {
        let c = ctx.colors;
        let (panel, body) = frame(p, ctx, window, 760.0, 560.0, ctx.tr("dialog.add_app.title"), z);
        let z = z + 3;
        let mut targets = Vec::new();
        let wrap = |t: AddAppTarget| DialogTarget::AddApp(t);

        // Toolbar
        let (toolbar, rest) = body.take_top(44.0);
        let up = Rect::new(toolbar.x, toolbar.y + 2.0, 64.0, 36.0);
        widgets::button(p, ctx, up, ctx.tr("dialog.add_app.up"), ButtonKind::Secondary, z);
        targets.push((up, wrap(AddAppTarget::Up)));
        let filter_label = ctx.tr(self.filter.label_key());
        let sort_label = ctx.tr(self.sort.label_key());
        let filter_w = widgets::chip_width(ctx, filter_label);
        let sort_w = widgets::chip_width(ctx, sort_label);
        let filter = Rect::new(toolbar.right() - filter_w, toolbar.y + 5.0, filter_w, 30.0);
        let sort = Rect::new(filter.x - 8.0 - sort_w, toolbar.y + 5.0, sort_w, 30.0);
        widgets::chip(p, ctx, filter, filter_label, self.filter != FileFilter::All, z);
        widgets::chip(p, ctx, sort, sort_label, self.sort != SortMode::Name, z);
        targets.push((sort, wrap(AddAppTarget::Sort)));
        targets.push((filter, wrap(AddAppTarget::Filter)));
        let search = Rect::new(up.right() + 10.0, toolbar.y + 2.0, (sort.x - up.right() - 20.0).max(0.0), 36.0);
        widgets::text_field(p, ctx, search, &self.query, ctx.tr("dialog.add_app.search"), true, false, z);
        targets.push((search, wrap(AddAppTarget::Search)));

        // Location
        let (loc_row, rest) = rest.take_top(28.0);
        let location = if self.is_global_search() {
            format!("* {}", file_browser::search_root(&self.dir).display())
        } else {
            self.dir.display().to_string()
        };
        widgets::label(p, ctx, loc_row, &location, FontRole::Ui, c.text_muted, 0.0, z);

        // Footer
        let (list_area, footer) = rest.take_top((rest.h - 84.0).max(0.0));
        let message_row = Rect { h: 26.0, ..footer };
        let message = self.error.as_ref().map(|e| e.to_string()).or(self.message.map(str::to_string));
        error_line(p, ctx, message_row, message.as_deref(), z);
        let buttons_y = footer.bottom() - 40.0;
        let confirm = Rect::new(footer.right() - 110.0, buttons_y, 110.0, 40.0);
        let cancel = Rect::new(confirm.x - 120.0, buttons_y, 110.0, 40.0);
        widgets::button(p, ctx, confirm, ctx.tr("dialog.add"), ButtonKind::Primary, z);
        widgets::button(p, ctx, cancel, ctx.tr("dialog.cancel"), ButtonKind::Secondary, z);
        targets.push((confirm, wrap(AddAppTarget::Confirm)));
        targets.push((cancel, wrap(AddAppTarget::Cancel)));
        if let Some(sel) = &self.selected {
            let r = Rect::new(footer.x, buttons_y, (cancel.x - footer.x - 12.0).max(0.0), 40.0);
            widgets::label(p, ctx, r, &sel.display().to_string(), FontRole::Ui, c.text_secondary, 0.0, z);
        }

        // List
        let viewport = list_area.inset(0.0, 4.0);
        p.fill_rounded_rect(viewport, 8.0, c.background, z);
        self.scroll.update(viewport, self.entries.len() as f32 * ROW_H);
        let mut list_targets = Vec::new();
        p.push_clip_rect(viewport);
        p.push_offset(Offset::new(viewport.x, viewport.y - self.scroll.offset()));
        let first = (self.scroll.offset() / ROW_H).floor().max(0.0) as usize;
        let count = (viewport.h / ROW_H).ceil() as usize + 1;
        for (i, entry) in self.entries.iter().enumerate().skip(first).take(count) {
            let r = Rect::new(0.0, i as f32 * ROW_H, viewport.w, ROW_H);
            let is_selected = !entry.is_dir && self.selected.as_deref() == Some(entry.path.as_path());
            if is_selected {
                p.fill_rect(r, c.accent_soft, z + 1);
            } else if self.highlighted == Some(i) || ctx.hovered(p, r) {
                p.fill_rect(r, c.card_hover, z + 1);
            }
            let icon = Rect::new(r.x + 10.0, r.y + 10.0, 16.0, 16.0);
            let icon_color = if entry.is_dir { c.warning } else { c.text_muted };
            p.fill_rounded_rect(icon, if entry.is_dir { 3.0 } else { 1.0 }, icon_color, z + 2);
            let name = if self.is_global_search() { entry.path.display().to_string() } else { entry.name.clone() };
            let text = Rect::new(icon.right() + 10.0, r.y, (r.w - 46.0).max(0.0), r.h);
            let color = if entry.is_dir { c.text_primary } else { c.text_secondary };
            widgets::label(p, ctx, text, &name, FontRole::Ui, color, 0.0, z + 2);
            list_targets.push((p.current_offset().apply_rect(r), wrap(AddAppTarget::Entry(i))));
        }
        p.pop_offset();
        widgets::scrollbar(p, ctx, viewport, self.scroll.offset(), self.scroll.max_offset(), z + 3);
        p.pop_clip();

        DialogRenderResult { panel, targets, list_viewport: Some(viewport), list_targets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn show_lists_and_navigates() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("app.sh"), "").unwrap();
        let mut d = AddAppDialog::new(8);
        d.show(dir.path());
        assert!(d.is_visible());
        assert_eq!(d.entries().len(), 1);
        d.handle_click(&AddAppTarget::Entry(0), 1);
        assert_eq!(d.dir(), dir.path().join("sub"));
        assert_eq!(d.entries()[0].name, "app.sh");
        d.handle_click(&AddAppTarget::Up, 1);
        assert_eq!(d.dir(), dir.path());
    }

    #[test]
    fn confirm_validates_selection() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("tool");
        fs::write(&file, "").unwrap();
        let mut d = AddAppDialog::new(8);
        d.show(dir.path());
        assert_eq!(d.confirm(), AddAppAction::Handled);
        assert_eq!(d.error(), Some(&ValidationError::NoSelection));
        d.select_path(dir.path());
        d.confirm();
        assert_eq!(d.error(), Some(&ValidationError::PathIsDirectory));
        d.select_path(&dir.path().join("gone"));
        d.confirm();
        assert_eq!(d.error(), Some(&ValidationError::PathMissing));
        d.select_path(&file);
        assert_eq!(d.confirm(), AddAppAction::Confirm(file));
    }

    #[test]
    fn keyboard_moves_and_enter_confirms_file() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a", "b", "c"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        let mut d = AddAppDialog::new(8);
        d.show(dir.path());
        d.handle_key(KeyEvent::plain(KeyCode::ArrowDown));
        d.handle_key(KeyEvent::plain(KeyCode::ArrowDown));
        assert_eq!(d.highlighted(), Some(1));
        d.handle_key(KeyEvent::plain(KeyCode::End));
        assert_eq!(d.highlighted(), Some(2));
        assert_eq!(d.handle_key(KeyEvent::plain(KeyCode::Enter)), AddAppAction::Confirm(dir.path().join("c")));
        assert_eq!(d.handle_key(KeyEvent::plain(KeyCode::Escape)), AddAppAction::Cancel);
    }

    #[test]
    fn typing_filters_and_missing_dir_shows_message() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("alpha"), "").unwrap();
        fs::write(dir.path().join("beta"), "").unwrap();
        let mut d = AddAppDialog::new(8);
        d.show(dir.path());
        d.handle_text("alp");
        assert_eq!(d.entries().len(), 1);
        d.handle_key(KeyEvent::plain(KeyCode::Backspace));
        assert_eq!(d.query(), "al");

        d.navigate(&dir.path().join("missing"));
        assert!(d.entries().is_empty());
        assert_eq!(d.message(), Some("Directory unavailable"));
        assert!(d.is_visible());
    }

    #[test]
    fn global_query_waits_for_enter() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("alpha"), "").unwrap();
        let mut d = AddAppDialog::new(0);
        d.show(dir.path());
        assert_eq!(d.entries().len(), 1);

        d.handle_text("*alp");
        assert!(d.is_search_pending());
        assert!(d.entries().is_empty());
        assert_eq!(d.message(), Some(SEARCH_HINT));
        d.handle_key(KeyEvent::plain(KeyCode::Backspace));
        assert!(d.is_search_pending());

        assert_eq!(d.handle_key(KeyEvent::plain(KeyCode::Enter)), AddAppAction::Handled);
        assert!(!d.is_search_pending());
        assert_eq!(d.message(), Some(NO_MATCHES));
        assert!(d.error().is_none());

        d.set_query("*");
        assert!(!d.is_search_pending());
        assert_eq!(d.message(), None);
    }

    #[test]
    fn hide_resets_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut d = AddAppDialog::new(8);
        d.show(dir.path());
        d.confirm();
        d.hide();
        assert!(!d.is_visible());
        assert!(d.error().is_none());
        assert!(d.query().is_empty());
    }
}
