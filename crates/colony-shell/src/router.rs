//! Frame-to-frame hit map and click precedence.
//!
//! Rendering produces a [`FrameHitMap`]; the next pointer dispatch takes it
//! out of the application (consume-and-clear), so rectangles are never
//! reused past the frame that drew them.

use colony_config::AppearanceKey;
use colony_core::{HitIndex, HitItem, Rect};

use crate::dialogs::DialogTarget;
use crate::layout::Divider;
use crate::selection::{NavEntry, Selection};

#[derive(Clone, Debug, PartialEq)]
pub enum HubTarget {
    CollapseToggle,
    SearchBox,
    SearchClear,
    PagerPrev,
    PagerNext,
    Branch(usize),
    DetailAction,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SettingsTarget {
    ThemeCard(String),
    LanguageCard(String),
    Toggle(String),
    Slider(AppearanceKey),
    CreateTheme,
}

/// Regions that accept wheel input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollArea {
    Hub,
    Settings,
    Dialog,
}

#[derive(Clone, Debug, PartialEq)]
pub enum HitTarget {
    Nav(NavEntry),
    HubToggle,
    LibraryItem(Selection),
    AddApp,
    HeroAction,
    HeroEdit,
    Settings(SettingsTarget),
    Divider(Divider),
    Hub(HubTarget),
    Dialog(DialogTarget),
    Scroll(ScrollArea),
}

impl HitTarget {
    fn is_dialog(&self) -> bool {
        matches!(self, HitTarget::Dialog(_))
    }

    fn is_scroll(&self) -> bool {
        matches!(self, HitTarget::Scroll(_))
    }
}

/// Which input layer owned the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Main,
    Hub,
    Dialog,
}

/// Outcome of resolving a click against the previous frame.
#[derive(Clone, Debug)]
pub enum ClickRoute {
    Target(HitItem<HitTarget>),
    /// Inside the dialog panel but on nothing interactive.
    DialogMiss,
    /// Outside the visible dialog: cancels it.
    OutsideDialog,
    /// Hub background; defocuses the search field.
    HubMiss,
    Miss,
}

/// Z bands used when recording targets.
pub mod z {
    pub const MAIN: i32 = 0;
    pub const DIVIDER: i32 = 50;
    pub const HUB: i32 = 100;
    pub const TOP_BAR: i32 = 150;
    pub const STATUS: i32 = 160;
    pub const DIALOG: i32 = 300;
}

#[derive(Clone, Debug)]
pub struct FrameHitMap {
    layer: Layer,
    dialog_panel: Option<Rect>,
    index: HitIndex<HitTarget>,
}

impl FrameHitMap {
    pub fn new(layer: Layer) -> Self {
        Self { layer, dialog_panel: None, index: HitIndex::new() }
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn set_dialog_panel(&mut self, panel: Rect) {
        self.layer = Layer::Dialog;
        self.dialog_panel = Some(panel);
    }

    pub fn index(&self) -> &HitIndex<HitTarget> {
        &self.index
    }

    pub fn push(&mut self, rect: Rect, clip: Option<Rect>, z: i32, target: HitTarget) {
        self.index.push(rect, clip, z, target);
    }

    /// Record a panel's `(rect, target)` pairs, all in absolute coordinates.
    pub fn push_all<T>(&mut self, items: impl IntoIterator<Item = (Rect, T)>, clip: Option<Rect>, z: i32, wrap: impl Fn(T) -> HitTarget) {
        for (rect, t) in items {
            self.index.push(rect, clip, z, wrap(t));
        }
    }

    pub fn targets(&self) -> impl Iterator<Item = &HitTarget> {
        self.index.iter().map(|it| &it.target)
    }

    /// Resolve a click: a visible dialog owns every click, then the hub,
    /// then the main interface.
    pub fn route_click(&self, pos: [f32; 2]) -> ClickRoute {
        let [x, y] = pos;
        match self.layer {
            Layer::Dialog => {
                let inside = self.dialog_panel.is_some_and(|panel| panel.contains(x, y));
                if !inside {
                    return ClickRoute::OutsideDialog;
                }
                match self.index.topmost_where(pos, HitTarget::is_dialog) {
                    Some(item) => ClickRoute::Target(item.clone()),
                    None => ClickRoute::DialogMiss,
                }
            }
            Layer::Hub => match self.index.topmost_where(pos, |t| !t.is_scroll()) {
                Some(item) => ClickRoute::Target(item.clone()),
                None => ClickRoute::HubMiss,
            },
            Layer::Main => match self.index.topmost_where(pos, |t| !t.is_scroll()) {
                Some(item) => ClickRoute::Target(item.clone()),
                None => ClickRoute::Miss,
            },
        }
    }

    /// Scrollable region under `pos`, if any.
    pub fn scroll_area_at(&self, pos: [f32; 2]) -> Option<ScrollArea> {
        match self.index.topmost_where(pos, HitTarget::is_scroll)?.target {
            HitTarget::Scroll(area) => Some(area),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogs::{CustomThemeTarget, DialogTarget};

    #[test]
    fn dialog_layer_swallows_everything() {
        let mut map = FrameHitMap::new(Layer::Main);
        map.push(Rect::new(0.0, 0.0, 500.0, 500.0), None, z::MAIN, HitTarget::AddApp);
        map.set_dialog_panel(Rect::new(100.0, 100.0, 200.0, 200.0));
        map.push(
            Rect::new(120.0, 120.0, 50.0, 20.0),
            None,
            z::DIALOG,
            HitTarget::Dialog(DialogTarget::CustomTheme(CustomThemeTarget::Save)),
        );
        assert!(matches!(map.route_click([10.0, 10.0]), ClickRoute::OutsideDialog));
        assert!(matches!(map.route_click([250.0, 250.0]), ClickRoute::DialogMiss));
        match map.route_click([130.0, 125.0]) {
            ClickRoute::Target(item) => assert!(item.target.is_dialog()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn scroll_regions_are_not_click_targets() {
        let mut map = FrameHitMap::new(Layer::Hub);
        map.push(Rect::new(0.0, 0.0, 100.0, 100.0), None, z::HUB, HitTarget::Scroll(ScrollArea::Hub));
        map.push(Rect::new(0.0, 0.0, 40.0, 40.0), None, z::HUB, HitTarget::Hub(HubTarget::Branch(3)));
        assert!(matches!(map.route_click([60.0, 60.0]), ClickRoute::HubMiss));
        assert_eq!(map.scroll_area_at([10.0, 10.0]), Some(ScrollArea::Hub));
        match map.route_click([10.0, 10.0]) {
            ClickRoute::Target(item) => assert_eq!(item.target, HitTarget::Hub(HubTarget::Branch(3))),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn main_layer_miss() {
        let map = FrameHitMap::new(Layer::Main);
        assert!(matches!(map.route_click([1.0, 1.0]), ClickRoute::Miss));
        assert_eq!(map.scroll_area_at([1.0, 1.0]), None);
    }
}
