//! Full-screen hub overview: collapsible header, search, widget pager and
//! a scrollable grid of destination cards.

use colony_core::{FontRole, GradientAxis, Offset, Painter, Rect};

use super::widgets::{self, ButtonKind};
use super::PanelContext;
use crate::content::AppContent;
use crate::events::{push_text, KeyCode, KeyEvent};
use crate::router::HubTarget;
use crate::scroll::ScrollViewport;

const HEADER_EXPANDED: f32 = 150.0;
const HEADER_COLLAPSED: f32 = 64.0;
const SEARCH_ROW: f32 = 56.0;
const WIDGET_ROW: f32 = 96.0;
const CARD_MIN_W: f32 = 220.0;
const CARD_GAP: f32 = 14.0;

/// Card grid metrics from the last render, used by keyboard scrolling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridMetrics {
    pub columns: usize,
    pub card_height: f32,
}

impl Default for GridMetrics {
    fn default() -> Self {
        Self { columns: 1, card_height: 96.0 }
    }
}

impl GridMetrics {
    /// Content-space top of the card at `position` among visible branches.
    pub fn card_top(&self, position: usize) -> f32 {
        (position / self.columns.max(1)) as f32 * (self.card_height + CARD_GAP)
    }
}

#[derive(Clone, Debug, Default)]
pub struct HubState {
    query: String,
    search_focused: bool,
    collapsed: bool,
    /// 0 = expanded, 1 = collapsed; eased toward `collapsed` by `tick`.
    collapse_progress: f32,
    widget_page: usize,
    focused: Option<usize>,
    pub scroll: ScrollViewport,
    grid: GridMetrics,
}

/// What a hub key press asks the application to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HubAction {
    None,
    Handled,
    /// Leave the hub.
    Exit,
    /// Navigate to the branch at this index.
    Activate(usize),
}

impl HubState {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn search_focused(&self) -> bool {
        self.search_focused
    }

    pub fn set_search_focused(&mut self, focused: bool) {
        self.search_focused = focused;
    }

    pub fn focused_branch(&self) -> Option<usize> {
        self.focused
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn widget_page(&self) -> usize {
        self.widget_page
    }

    /// Reset transient state when the hub is entered.
    pub fn enter(&mut self, content: &AppContent) {
        self.search_focused = false;
        self.scroll.scroll_to_top();
        self.focused = self.visible_branches(content).first().copied();
    }

    pub fn set_query(&mut self, content: &AppContent, query: &str) {
        self.query = query.to_string();
        self.after_query_change(content);
    }

    pub fn clear_query(&mut self, content: &AppContent) {
        self.set_query(content, "");
    }

    fn after_query_change(&mut self, content: &AppContent) {
        self.scroll.scroll_to_top();
        let visible = self.visible_branches(content);
        if self.focused.is_none_or(|f| !visible.contains(&f)) {
            self.focused = visible.first().copied();
        }
    }

    /// Indices of branches matching the current query, in content order.
    pub fn visible_branches(&self, content: &AppContent) -> Vec<usize> {
        content
            .hub
            .branches
            .iter()
            .enumerate()
            .filter(|(_, b)| b.matches(&self.query))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn toggle_collapsed(&mut self) {
        self.collapsed = !self.collapsed;
    }

    pub fn page_widgets(&mut self, content: &AppContent, forward: bool) {
        let n = content.hub.widgets.len();
        if n == 0 {
            return;
        }
        self.widget_page = if forward { (self.widget_page + 1) % n } else { (self.widget_page + n - 1) % n };
    }

    pub fn focus_branch(&mut self, index: usize) {
        self.focused = Some(index);
    }

    /// Ease the header animation; returns whether it is still moving.
    pub fn tick(&mut self, dt: f32, duration: f32, reduce_motion: bool) -> bool {
        let target = if self.collapsed { 1.0 } else { 0.0 };
        if reduce_motion || duration <= 0.0 {
            self.collapse_progress = target;
            return false;
        }
        let step = dt / duration;
        if self.collapse_progress < target {
            self.collapse_progress = (self.collapse_progress + step).min(target);
        } else {
            self.collapse_progress = (self.collapse_progress - step).max(target);
        }
        self.collapse_progress != target
    }

    fn move_focus(&mut self, content: &AppContent, delta: isize) {
        let visible = self.visible_branches(content);
        if visible.is_empty() {
            self.focused = None;
            return;
        }
        let n = visible.len() as isize;
        let cur = self.focused.and_then(|f| visible.iter().position(|v| *v == f));
        let next = match cur {
            Some(pos) => (pos as isize + delta).rem_euclid(n) as usize,
            None if delta >= 0 => 0,
            None => visible.len() - 1,
        };
        self.set_focus_position(&visible, next);
    }

    fn set_focus_position(&mut self, visible: &[usize], position: usize) {
        let Some(&branch) = visible.get(position) else { return };
        self.focused = Some(branch);
        let top = self.grid.card_top(position);
        self.scroll.ensure_visible(top, self.grid.card_height);
    }

    pub fn handle_key(&mut self, content: &AppContent, event: KeyEvent) -> HubAction {
        let cols = self.grid.columns.max(1) as isize;
        match event.key {
            KeyCode::Escape => {
                if !self.query.is_empty() {
                    self.clear_query(content);
                    HubAction::Handled
                } else if self.search_focused {
                    self.search_focused = false;
                    HubAction::Handled
                } else {
                    HubAction::Exit
                }
            }
            KeyCode::Backspace if self.search_focused => {
                if self.query.pop().is_some() {
                    self.after_query_change(content);
                }
                HubAction::Handled
            }
            KeyCode::Enter => match self.focused {
                Some(i) => HubAction::Activate(i),
                None => HubAction::None,
            },
            KeyCode::Tab => {
                self.move_focus(content, if event.modifiers.shift { -1 } else { 1 });
                HubAction::Handled
            }
            KeyCode::ArrowRight => {
                self.move_focus(content, 1);
                HubAction::Handled
            }
            KeyCode::ArrowLeft => {
                self.move_focus(content, -1);
                HubAction::Handled
            }
            KeyCode::ArrowDown => {
                self.move_focus(content, cols);
                HubAction::Handled
            }
            KeyCode::ArrowUp => {
                self.move_focus(content, -cols);
                HubAction::Handled
            }
            KeyCode::Home => {
                let visible = self.visible_branches(content);
                self.set_focus_position(&visible, 0);
                HubAction::Handled
            }
            KeyCode::End => {
                let visible = self.visible_branches(content);
                self.set_focus_position(&visible, visible.len().saturating_sub(1));
                HubAction::Handled
            }
            KeyCode::PageUp | KeyCode::PageDown => {
                let h = self.scroll.viewport().h;
                self.scroll.page_by(h, event.key == KeyCode::PageDown);
                HubAction::Handled
            }
            _ => HubAction::None,
        }
    }

    /// Text input: `/` focuses the search field; typing edits it once
    /// focused.
    pub fn handle_text(&mut self, content: &AppContent, text: &str) -> bool {
        if !self.search_focused {
            if text == "/" {
                self.search_focused = true;
                return true;
            }
            return false;
        }
        if push_text(&mut self.query, text) {
            self.after_query_change(content);
        }
        true
    }
}

pub struct HubRenderResult {
    /// Absolute rectangles in priority order.
    pub targets: Vec<(Rect, HubTarget)>,
    /// Clip for targets inside the card grid.
    pub grid_viewport: Rect,
    pub grid_targets: Vec<(Rect, HubTarget)>,
    pub visible: Vec<usize>,
    pub highlight: String,
}

pub fn render(p: &mut Painter, ctx: &PanelContext, rect: Rect, state: &mut HubState, content: &AppContent, z: i32) -> HubRenderResult {
    let c = ctx.colors;
    let hub = &content.hub;
    p.fill_rect(rect, c.background, z);
    p.push_clip_rect(rect);

    let mut targets = Vec::new();
    let pad = 28.0;
    let inner = rect.inset(pad, 0.0);

    // Header
    let t = state.collapse_progress;
    let header_h = HEADER_EXPANDED + (HEADER_COLLAPSED - HEADER_EXPANDED) * t;
    let (header, rest) = rect.take_top(header_h);
    p.fill_gradient(header, c.accent_soft, c.background, GradientAxis::Vertical, 0.0, z + 1);
    let headline = ctx.loc.get(&hub.headline_key, ctx.tr("hub.headline"));
    let role = if state.collapsed { FontRole::Headline } else { FontRole::Display };
    let head_h = ctx.measurer.line_height(ctx.style(role));
    let title = Rect::new(inner.x, header.y + 16.0, (inner.w - 140.0).max(0.0), head_h);
    widgets::label(p, ctx, title, headline, role, c.text_primary, 0.0, z + 2);
    if t < 0.5 {
        let desc = ctx.loc.get(&hub.description_key, ctx.tr("hub.description"));
        let style = ctx.style(FontRole::Body);
        let lines = colony_text::wrap_text_to_width(Some(ctx.measurer), style, desc, title.w);
        let mut y = title.bottom() + 6.0;
        for line in lines.into_iter().take(2) {
            p.text([inner.x, y], line, style.size, c.text_secondary.fade(1.0 - t * 2.0), FontRole::Body, z + 2);
            y += ctx.measurer.line_height(style);
        }
    }
    let toggle = Rect::new(inner.right() - 120.0, header.y + 16.0, 120.0, 32.0);
    let toggle_label = if state.collapsed { ctx.tr("hub.expand") } else { ctx.tr("hub.collapse") };
    widgets::button(p, ctx, toggle, toggle_label, ButtonKind::Secondary, z + 3);
    targets.push((toggle, HubTarget::CollapseToggle));

    // Search row
    let (search_row, rest) = rest.take_top(SEARCH_ROW);
    let visible = state.visible_branches(content);
    let highlight = ctx.loc.plural("hub.destinations", visible.len());
    let search_w = (inner.w - 320.0).clamp(160.0, 460.0).min(inner.w);
    let search = Rect::new(inner.x, search_row.y + 8.0, search_w, 40.0);
    widgets::text_field(p, ctx, search, &state.query, ctx.tr("hub.search"), state.search_focused, false, z + 2);
    targets.push((search, HubTarget::SearchBox));
    let mut x = search.right() + 10.0;
    if !state.query.is_empty() {
        let clear = Rect::new(x, search.y, 80.0, 40.0);
        widgets::button(p, ctx, clear, ctx.tr("hub.clear"), ButtonKind::Secondary, z + 2);
        targets.push((clear, HubTarget::SearchClear));
        x = clear.right() + 10.0;
    }
    let count = Rect::new(x, search.y, (inner.right() - x).max(0.0), 40.0);
    widgets::label(p, ctx, count, &highlight, FontRole::Ui, c.text_muted, 6.0, z + 2);

    // Widget pager
    let rest = if hub.widgets.is_empty() {
        rest
    } else {
        let (row, rest) = rest.take_top(WIDGET_ROW);
        let prev = Rect::new(inner.x, row.y + 26.0, 36.0, 36.0);
        let next = Rect::new(inner.right() - 36.0, row.y + 26.0, 36.0, 36.0);
        let card = Rect::new(prev.right() + 10.0, row.y + 8.0, (next.x - prev.right() - 20.0).max(0.0), WIDGET_ROW - 16.0);
        let page = state.widget_page.min(hub.widgets.len() - 1);
        let w = &hub.widgets[page];
        p.fill_rounded_rect(card, 10.0, c.surface_alt, z + 1);
        let (t_rect, b_rect) = card.inset(14.0, 8.0).take_top(28.0);
        widgets::label(p, ctx, t_rect, &w.title, FontRole::Ui, c.text_primary, 0.0, z + 2);
        widgets::label(p, ctx, Rect { h: 28.0, ..b_rect }, &w.body, FontRole::Body, c.text_secondary, 0.0, z + 2);
        let dots = format!("{}/{}", page + 1, hub.widgets.len());
        let d = Rect::new(card.right() - 60.0, card.y + 8.0, 50.0, 24.0);
        widgets::label(p, ctx, d, &dots, FontRole::Ui, c.text_muted, 0.0, z + 2);
        widgets::button(p, ctx, prev, "<", ButtonKind::Secondary, z + 2);
        widgets::button(p, ctx, next, ">", ButtonKind::Secondary, z + 2);
        targets.push((prev, HubTarget::PagerPrev));
        targets.push((next, HubTarget::PagerNext));
        rest
    };

    // Grid + detail split
    let body = rest.inset(pad, 12.0);
    let detail_w = if body.w > 760.0 { (body.w * 0.3).min(320.0) } else { 0.0 };
    let (grid_rect, detail_rect) = body.take_left(body.w - detail_w - if detail_w > 0.0 { 16.0 } else { 0.0 });
    let detail_rect = Rect { x: detail_rect.right() - detail_w, w: detail_w, ..detail_rect };

    let columns = (((grid_rect.w + CARD_GAP) / (CARD_MIN_W + CARD_GAP)).floor() as usize).max(1);
    let card_w = ((grid_rect.w - CARD_GAP * (columns as f32 - 1.0)) / columns as f32).max(0.0);
    state.grid = GridMetrics { columns, card_height: ctx.row(96.0) };
    let rows = visible.len().div_ceil(columns);
    let content_h = if rows == 0 { 0.0 } else { rows as f32 * (state.grid.card_height + CARD_GAP) - CARD_GAP };
    state.scroll.update(grid_rect, content_h);

    let mut grid_targets = Vec::new();
    if visible.is_empty() {
        let r = Rect::new(grid_rect.x, grid_rect.y, grid_rect.w, 40.0);
        widgets::label(p, ctx, r, ctx.tr("hub.no_results"), FontRole::Body, c.text_muted, 0.0, z + 2);
    }
    p.push_clip_rect(grid_rect);
    p.push_offset(Offset::new(grid_rect.x, grid_rect.y - state.scroll.offset()));
    let desc_style = ctx.style(FontRole::Body);
    for (pos, &branch_idx) in visible.iter().enumerate() {
        let top = state.grid.card_top(pos);
        if !state.scroll.is_visible(top, state.grid.card_height) {
            continue;
        }
        let col = pos % columns;
        let r = Rect::new(col as f32 * (card_w + CARD_GAP), top, card_w, state.grid.card_height);
        let branch = &hub.branches[branch_idx];
        let focused = state.focused == Some(branch_idx);
        let bg = if ctx.hovered(p, r) { c.card_hover } else { c.card };
        p.fill_rounded_rect(r, 12.0, bg, z + 2);
        if focused {
            p.stroke_rect(r, 2.0, 12.0, c.accent, z + 3);
        }
        let (title_r, desc_r) = r.inset(14.0, 10.0).take_top(26.0);
        widgets::label(p, ctx, title_r, &branch.title, FontRole::Ui, c.text_primary, 0.0, z + 4);
        let lines = colony_text::wrap_text_to_width(Some(ctx.measurer), desc_style, &branch.description, desc_r.w);
        let mut y = desc_r.y;
        for line in lines.into_iter().take(2) {
            if y + ctx.measurer.line_height(desc_style) > r.bottom() {
                break;
            }
            p.text([desc_r.x, y], line, desc_style.size, c.text_secondary, FontRole::Body, z + 4);
            y += ctx.measurer.line_height(desc_style);
        }
        grid_targets.push((p.current_offset().apply_rect(r), HubTarget::Branch(branch_idx)));
    }
    p.pop_offset();
    widgets::scrollbar(p, ctx, grid_rect, state.scroll.offset(), state.scroll.max_offset(), z + 5);
    p.pop_clip();

    // Detail
    if detail_w > 0.0
        && let Some(branch) = state.focused.and_then(|i| hub.branches.get(i))
    {
        p.fill_rounded_rect(detail_rect, 12.0, c.surface, z + 1);
        let inner = detail_rect.inset(18.0, 18.0);
        let (t, rest) = inner.take_top(34.0);
        widgets::label(p, ctx, t, &branch.title, FontRole::Headline, c.text_primary, 0.0, z + 2);
        let mut y = rest.y + 6.0;
        for line in colony_text::wrap_text_to_width(Some(ctx.measurer), desc_style, &branch.description, rest.w) {
            if y > rest.bottom() - 60.0 {
                break;
            }
            p.text([rest.x, y], line, desc_style.size, c.text_secondary, FontRole::Body, z + 2);
            y += ctx.measurer.line_height(desc_style);
        }
        let open = Rect::new(rest.x, rest.bottom() - 40.0, rest.w.min(160.0), 40.0);
        widgets::button(p, ctx, open, ctx.tr("hub.open"), ButtonKind::Primary, z + 2);
        targets.push((open, HubTarget::DetailAction));
    }

    p.pop_clip();
    HubRenderResult { targets, grid_viewport: grid_rect, grid_targets, visible, highlight }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::HubBranch;

    fn content(titles: &[&str]) -> AppContent {
        let mut c = AppContent::default();
        c.hub.branches = titles
            .iter()
            .enumerate()
            .map(|(i, t)| HubBranch { id: format!("b{i}"), title: t.to_string(), ..Default::default() })
            .collect();
        c
    }

    #[test]
    fn query_filters_and_refocuses() {
        let c = content(&["Network Monitor", "Disk Usage", "Display"]);
        let mut hub = HubState::default();
        hub.enter(&c);
        assert_eq!(hub.focused_branch(), Some(0));
        hub.set_query(&c, "DIS");
        assert_eq!(hub.visible_branches(&c), vec![1, 2]);
        assert_eq!(hub.focused_branch(), Some(1));
    }

    #[test]
    fn arrows_wrap_over_visible_branches() {
        let c = content(&["a", "b", "c"]);
        let mut hub = HubState::default();
        hub.enter(&c);
        hub.handle_key(&c, KeyEvent::plain(KeyCode::ArrowLeft));
        assert_eq!(hub.focused_branch(), Some(2));
        hub.handle_key(&c, KeyEvent::plain(KeyCode::Tab));
        assert_eq!(hub.focused_branch(), Some(0));
        hub.handle_key(&c, KeyEvent::shifted(KeyCode::Tab));
        assert_eq!(hub.focused_branch(), Some(2));
        hub.handle_key(&c, KeyEvent::plain(KeyCode::Home));
        assert_eq!(hub.focused_branch(), Some(0));
        hub.handle_key(&c, KeyEvent::plain(KeyCode::End));
        assert_eq!(hub.focused_branch(), Some(2));
        assert_eq!(hub.handle_key(&c, KeyEvent::plain(KeyCode::Enter)), HubAction::Activate(2));
    }

    #[test]
    fn slash_focuses_search_and_escape_unwinds() {
        let c = content(&["Disk Usage"]);
        let mut hub = HubState::default();
        assert!(!hub.handle_text(&c, "x"));
        assert!(hub.handle_text(&c, "/"));
        assert!(hub.search_focused());
        hub.handle_text(&c, "dis");
        hub.handle_key(&c, KeyEvent::plain(KeyCode::Backspace));
        assert_eq!(hub.query(), "di");
        assert_eq!(hub.handle_key(&c, KeyEvent::plain(KeyCode::Escape)), HubAction::Handled);
        assert_eq!(hub.query(), "");
        assert_eq!(hub.handle_key(&c, KeyEvent::plain(KeyCode::Escape)), HubAction::Handled);
        assert!(!hub.search_focused());
        assert_eq!(hub.handle_key(&c, KeyEvent::plain(KeyCode::Escape)), HubAction::Exit);
    }

    #[test]
    fn collapse_animation_respects_reduce_motion() {
        let mut hub = HubState::default();
        hub.toggle_collapsed();
        assert!(hub.tick(0.1, 0.4, false));
        assert!(!hub.tick(0.5, 0.4, false));
        hub.toggle_collapsed();
        assert!(!hub.tick(0.01, 0.4, true));
    }

    #[test]
    fn pager_wraps() {
        let mut c = content(&[]);
        c.hub.widgets = vec![Default::default(), Default::default()];
        let mut hub = HubState::default();
        hub.page_widgets(&c, false);
        assert_eq!(hub.widget_page(), 1);
        hub.page_widgets(&c, true);
        assert_eq!(hub.widget_page(), 0);
    }
}
