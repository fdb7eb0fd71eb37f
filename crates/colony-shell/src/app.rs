//! The launcher application: owns every piece of shell state, turns input
//! events into state changes and state into one display list per frame.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use colony_config::{AppearanceKey, SettingsStore};
use colony_core::{DisplayList, HitItem, Painter, Rect, Viewport};
use colony_text::{TextMeasurer, WrapCache};
use tracing::{debug, info, warn};

use crate::content::{self, AppContent};
use crate::dialogs::{AddAppAction, CustomThemeAction, DialogKind, DialogTarget, Dialogs, EditAppAction};
use crate::events::{EventResult, InputEvent, KeyCode, KeyEvent, MouseButton, MouseEvent};
use crate::layout::{Divider, LayoutConstraints, LayoutEngine};
use crate::localization::{self, Localization};
use crate::panels::hub::{self, HubAction, HubState};
use crate::panels::settings_panel::{self, SettingsPanelState, SettingsView, toggle_enabled};
use crate::panels::{PanelContext, chrome, hero, library, nav_rail, widgets};
use crate::router::{ClickRoute, FrameHitMap, HitTarget, HubTarget, Layer, ScrollArea, SettingsTarget, z};
use crate::scroll::WHEEL_STEP;
use crate::selection::{NavEntry, NavState, Selection};
use crate::theme::ThemeManager;
use crate::visuals::ProgramVisualsCache;

const WRAP_CACHE_ENTRIES: usize = 512;

/// Startup options that do not live in the settings document.
#[derive(Clone, Debug)]
pub struct AppOptions {
    pub title: String,
    pub locales_dir: PathBuf,
    pub fallback_language: String,
    pub global_search_cap: usize,
    /// Largest delta fed to animations, in seconds.
    pub max_frame_delta: f32,
    /// Where the add-app dialog starts browsing.
    pub browse_dir: PathBuf,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            title: "Colony Launcher".to_string(),
            locales_dir: PathBuf::from("locales"),
            fallback_language: "en".to_string(),
            global_search_cap: 512,
            max_frame_delta: 0.25,
            browse_dir: content::default_browse_dir(),
        }
    }
}

/// Top-level interface state. Dialogs layer over either.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interface {
    Main,
    Hub,
}

#[derive(Clone, Copy, Debug)]
struct DividerDrag {
    divider: Divider,
    start_x: f32,
    start_width: f32,
}

/// Process invocation resolved from a program entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl LaunchCommand {
    /// Python scripts run through the configured interpreter.
    pub fn resolve(command: &str, args: &[String], python: Option<&Path>) -> Self {
        let is_script = Path::new(command).extension().is_some_and(|e| e.eq_ignore_ascii_case("py"));
        if is_script {
            let interpreter = python.map(|p| p.display().to_string()).unwrap_or_else(|| "python3".to_string());
            let mut all = vec![command.to_string()];
            all.extend(args.iter().cloned());
            Self { program: interpreter, args: all }
        } else {
            Self { program: command.to_string(), args: args.to_vec() }
        }
    }

    /// Spawn on a worker thread so process creation never blocks a frame.
    fn spawn_detached(self) {
        let worker = std::thread::Builder::new().name("colony-launch".into()).spawn(move || {
            match Command::new(&self.program).args(&self.args).spawn() {
                Ok(child) => info!(pid = child.id(), program = %self.program, "launched"),
                Err(error) => warn!(%error, program = %self.program, "launch failed"),
            }
        });
        if let Err(error) = worker {
            warn!(%error, "failed to start launch worker");
        }
    }
}

pub struct Application {
    options: AppOptions,
    content: AppContent,
    themes: ThemeManager,
    settings: SettingsStore,
    loc: Localization,
    languages: Vec<String>,
    measurer: Arc<dyn TextMeasurer>,
    wraps: WrapCache,
    visuals: ProgramVisualsCache,
    layout: LayoutEngine,
    interface: Interface,
    hub: HubState,
    hub_highlight: String,
    settings_panel: SettingsPanelState,
    dialogs: Dialogs,
    nav: NavState,
    /// Targets from the last rendered frame; taken by the next click.
    hits: Option<FrameHitMap>,
    pointer: [f32; 2],
    drag: Option<DividerDrag>,
    /// Program awaiting a second Launch press when confirmation is on.
    pending_launch: Option<String>,
    status: String,
}

impl Application {
    pub fn new(content: AppContent, settings: SettingsStore, measurer: Arc<dyn TextMeasurer>, options: AppOptions) -> Self {
        let state = settings.get().clone();
        let mut themes = ThemeManager::new();
        themes.load_custom(&state.custom_schemes);
        if !themes.set_active(&state.theme) {
            warn!(theme = %state.theme, "unknown theme in settings; keeping default");
        }
        themes.set_appearance(state.appearance);

        let loc = Localization::load(&options.locales_dir, &state.language, &options.fallback_language);
        let languages = localization::available_languages(&options.locales_dir);

        let mut layout = LayoutEngine::new(LayoutConstraints::default());
        layout.set_show_status_bar(toggle_enabled(&state, "show_status_bar"));

        let mut visuals = ProgramVisualsCache::new();
        visuals.rebuild(&content, themes.colors(), &themes.active().typography);

        info!(
            channels = content.channels.len(),
            programs = content.programs.len(),
            theme = %themes.active().id,
            language = %loc.language(),
            "application ready"
        );

        Self {
            dialogs: Dialogs::new(options.global_search_cap),
            options,
            content,
            themes,
            settings,
            loc,
            languages,
            measurer,
            wraps: WrapCache::new(WRAP_CACHE_ENTRIES),
            visuals,
            layout,
            interface: Interface::Main,
            hub: HubState::default(),
            hub_highlight: String::new(),
            settings_panel: SettingsPanelState::default(),
            nav: NavState::default(),
            hits: None,
            pointer: [-1.0, -1.0],
            drag: None,
            pending_launch: None,
            status: String::new(),
        }
    }

    pub fn content(&self) -> &AppContent {
        &self.content
    }

    pub fn themes(&self) -> &ThemeManager {
        &self.themes
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn localization(&self) -> &Localization {
        &self.loc
    }

    pub fn dialogs(&self) -> &Dialogs {
        &self.dialogs
    }

    pub fn dialogs_mut(&mut self) -> &mut Dialogs {
        &mut self.dialogs
    }

    pub fn nav(&self) -> &NavState {
        &self.nav
    }

    pub fn selection(&self) -> Option<Selection> {
        self.nav.selection(&self.content)
    }

    pub fn interface(&self) -> Interface {
        self.interface
    }

    pub fn hub(&self) -> &HubState {
        &self.hub
    }

    /// "N destinations" text from the last hub frame.
    pub fn hub_highlight(&self) -> &str {
        &self.hub_highlight
    }

    pub fn layout(&self) -> &LayoutEngine {
        &self.layout
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn title(&self) -> &str {
        &self.options.title
    }

    /// Hit map waiting for the next click, if the last frame's is unused.
    pub fn hit_map(&self) -> Option<&FrameHitMap> {
        self.hits.as_ref()
    }

    pub fn select(&mut self, selection: Selection) {
        self.pending_launch = None;
        if matches!(selection, Selection::Settings(_)) {
            self.settings_panel.scroll.scroll_to_top();
        }
        self.nav.select(&self.content, selection);
    }

    pub fn enter_hub(&mut self) {
        self.interface = Interface::Hub;
        self.hub.enter(&self.content);
    }

    pub fn exit_hub(&mut self) {
        self.interface = Interface::Main;
        self.hub.set_search_focused(false);
    }

    pub fn set_hub_query(&mut self, query: &str) {
        self.hub.set_query(&self.content, query);
    }

    pub fn open_add_app(&mut self) {
        self.dialogs.show_add_app(&self.options.browse_dir);
    }

    pub fn open_custom_theme(&mut self) {
        self.dialogs.show_custom_theme(&self.themes.active().colors);
    }

    /// Open the edit dialog for a user-added program.
    pub fn open_edit_app(&mut self, id: &str) -> bool {
        if !AppContent::is_user_program(id) {
            return false;
        }
        let Some(view) = self.content.program(id) else { return false };
        let accent = view.accent_or(self.themes.colors().accent);
        self.dialogs.show_edit_app(id, view.title(), accent);
        true
    }

    /// Drop every cached layout and rebuild per-program visuals; required
    /// after theme, appearance, language or content changes.
    fn rebuild_chrome(&mut self) {
        self.wraps.clear();
        self.visuals.rebuild(&self.content, self.themes.colors(), &self.themes.active().typography);
        self.layout.set_show_status_bar(toggle_enabled(self.settings.get(), "show_status_bar"));
        debug!(generation = self.visuals.generation(), "chrome rebuilt");
    }

    fn persist_settings(&mut self) {
        if let Err(error) = self.settings.save() {
            warn!(%error, "failed to save settings");
        }
    }

    pub fn set_theme(&mut self, id: &str) -> bool {
        if !self.themes.set_active(id) {
            return false;
        }
        let id = id.to_string();
        self.settings.update(|s| s.theme = id);
        self.persist_settings();
        self.rebuild_chrome();
        self.status = self.loc.format("status.theme", &[("name", self.themes.active().name.as_str())]);
        true
    }

    pub fn set_language(&mut self, language: &str) {
        self.loc = Localization::load(&self.options.locales_dir, language, &self.options.fallback_language);
        let active = self.loc.language().to_string();
        self.settings.update(|s| s.language = active.clone());
        self.persist_settings();
        self.rebuild_chrome();
        self.status = self.loc.format("status.language", &[("name", active.as_str())]);
    }

    pub fn set_toggle(&mut self, key: &str, on: bool) {
        let key = key.to_string();
        self.settings.update(|s| {
            s.toggles.insert(key, on);
        });
        self.persist_settings();
        self.layout.set_show_status_bar(toggle_enabled(self.settings.get(), "show_status_bar"));
    }

    pub fn set_appearance(&mut self, key: AppearanceKey, value: f32) {
        let mut appearance = self.themes.appearance();
        appearance.set(key, value);
        self.themes.set_appearance(appearance);
        let appearance = self.themes.appearance();
        self.settings.update(|s| s.appearance = appearance);
        self.persist_settings();
        self.rebuild_chrome();
    }

    /// Launch the selected program on a worker thread. Returns whether a
    /// process launch was started.
    pub fn launch_selected(&mut self) -> bool {
        let Some(Selection::Program(id)) = self.selection() else { return false };
        let Some(view) = self.content.program(&id) else { return false };
        let name = view.title().to_string();
        let Some(command) = view.command.clone() else {
            self.status = self.loc.format("status.no_command", &[("name", name.as_str())]);
            return false;
        };
        let settings = self.settings.get();
        if toggle_enabled(settings, "confirm_launch") && self.pending_launch.as_deref() != Some(id.as_str()) {
            self.pending_launch = Some(id);
            self.status = self.loc.format("status.confirm_launch", &[("name", name.as_str())]);
            return false;
        }
        self.pending_launch = None;
        let launch = LaunchCommand::resolve(&command, &view.args, settings.python_path.as_deref());
        self.status = self.loc.format("status.launching", &[("name", name.as_str())]);
        info!(program = %id, command = %launch.program, "launching");
        launch.spawn_detached();
        true
    }

    /// Validate the add-app selection and, when it passes, add the program.
    pub fn confirm_add_app(&mut self) -> EventResult {
        let action = self.dialogs.add_app.confirm();
        self.apply_add_app(action)
    }

    fn add_application(&mut self, path: &Path) {
        let accent = self.themes.colors().accent;
        match self.content.add_user_program(path, accent) {
            Ok(id) => {
                let name = self.content.program(&id).map(|v| v.title().to_string()).unwrap_or_default();
                info!(%id, path = %path.display(), "added user program");
                self.dialogs.add_app.hide();
                self.rebuild_chrome();
                self.select(Selection::Program(id));
                self.status = self.loc.format("status.added", &[("name", name.as_str())]);
            }
            Err(error) => self.dialogs.add_app.set_error(error),
        }
    }

    fn apply_add_app(&mut self, action: AddAppAction) -> EventResult {
        match action {
            AddAppAction::None => EventResult::Ignored,
            AddAppAction::Handled => EventResult::Handled,
            AddAppAction::Cancel => {
                self.dialogs.add_app.hide();
                EventResult::Handled
            }
            AddAppAction::Confirm(path) => {
                self.add_application(&path);
                EventResult::Handled
            }
        }
    }

    fn apply_edit_app(&mut self, action: EditAppAction) -> EventResult {
        match action {
            EditAppAction::None => EventResult::Ignored,
            EditAppAction::Handled => EventResult::Handled,
            EditAppAction::Cancel => {
                self.dialogs.edit_app.hide();
                EventResult::Handled
            }
            EditAppAction::Save { id, name, accent } => {
                match self.content.edit_user_program(&id, &name, accent) {
                    Ok(()) => {
                        self.dialogs.edit_app.hide();
                        self.rebuild_chrome();
                        self.status = self.loc.format("status.updated", &[("name", name.as_str())]);
                    }
                    Err(error) => self.dialogs.edit_app.set_error(error),
                }
                EventResult::Handled
            }
        }
    }

    fn apply_custom_theme(&mut self, action: CustomThemeAction) -> EventResult {
        match action {
            CustomThemeAction::None => EventResult::Ignored,
            CustomThemeAction::Handled => EventResult::Handled,
            CustomThemeAction::Cancel => {
                self.dialogs.custom_theme.hide();
                EventResult::Handled
            }
            CustomThemeAction::Save(scheme) => {
                let id = match self.themes.add_scheme(scheme) {
                    Ok(added) => added.id.clone(),
                    Err(error) => {
                        self.dialogs.custom_theme.set_error(error);
                        return EventResult::Handled;
                    }
                };
                info!(%id, "custom scheme created");
                let records = self.themes.custom_records();
                self.settings.update(|s| s.custom_schemes = records);
                self.dialogs.custom_theme.hide();
                self.set_theme(&id);
                EventResult::Handled
            }
        }
    }

    /// Navigate to a hub branch's target and leave the hub.
    fn activate_branch(&mut self, index: usize) {
        let Some(branch) = self.content.hub.branches.get(index) else { return };
        let program = branch.program.clone().filter(|p| self.content.program(p).is_some());
        let channel = branch.channel.as_deref().and_then(|c| self.content.channel_index(c));
        debug!(branch = %branch.id, "hub branch activated");
        self.exit_hub();
        if let Some(idx) = channel {
            self.nav.activate(NavEntry::Channel(idx));
        }
        if let Some(id) = program {
            self.select(Selection::Program(id));
        }
    }

    /// Advance animations. Returns whether another frame is needed.
    pub fn tick(&mut self, dt: f32) -> bool {
        let dt = if dt.is_finite() { dt.clamp(0.0, self.options.max_frame_delta) } else { 0.0 };
        let reduce_motion = toggle_enabled(self.settings.get(), "reduce_motion");
        self.hub.tick(dt, self.themes.active().motion.panel_slide, reduce_motion)
    }

    pub fn handle_event(&mut self, event: InputEvent) -> EventResult {
        match event {
            InputEvent::PointerMove { x, y } => {
                self.pointer = [x, y];
                if let Some(drag) = self.drag {
                    self.layout.drag_divider(drag.divider, drag.start_width, x - drag.start_x);
                }
                // Hover styling follows the pointer.
                EventResult::Handled
            }
            InputEvent::PointerUp { x, y } => {
                self.pointer = [x, y];
                EventResult::from_bool(self.drag.take().is_some())
            }
            InputEvent::PointerDown(mouse) => {
                self.pointer = mouse.pos();
                self.handle_click(mouse)
            }
            InputEvent::Wheel { x, y, dy } => {
                self.pointer = [x, y];
                self.handle_wheel([x, y], dy)
            }
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Text(text) => self.handle_text(&text),
        }
    }

    fn expected_layer(&self) -> Layer {
        if self.dialogs.any_visible() {
            Layer::Dialog
        } else if self.interface == Interface::Hub {
            Layer::Hub
        } else {
            Layer::Main
        }
    }

    fn handle_click(&mut self, mouse: MouseEvent) -> EventResult {
        if mouse.button != MouseButton::Left {
            return EventResult::Ignored;
        }
        let Some(map) = self.hits.take() else {
            debug!("click without a rendered frame; ignored");
            return EventResult::Ignored;
        };
        // The map is spent from here on, so every path asks for a new frame.
        if map.layer() != self.expected_layer() {
            debug!(layer = ?map.layer(), "stale hit map; click ignored");
            return EventResult::Handled;
        }
        match map.route_click(mouse.pos()) {
            ClickRoute::OutsideDialog => self.dialogs.hide_all(),
            ClickRoute::DialogMiss | ClickRoute::Miss => {}
            ClickRoute::HubMiss => self.hub.set_search_focused(false),
            ClickRoute::Target(item) => self.activate_target(item, mouse),
        }
        EventResult::Handled
    }

    fn activate_target(&mut self, item: HitItem<HitTarget>, mouse: MouseEvent) {
        match item.target {
            HitTarget::Nav(entry) => {
                self.pending_launch = None;
                if entry == NavEntry::Settings {
                    self.settings_panel.scroll.scroll_to_top();
                }
                self.nav.activate(entry);
            }
            HitTarget::HubToggle => match self.interface {
                Interface::Main => self.enter_hub(),
                Interface::Hub => self.exit_hub(),
            },
            HitTarget::LibraryItem(selection) => {
                let is_program = matches!(selection, Selection::Program(_));
                self.select(selection);
                if is_program && mouse.click_count >= 2 {
                    self.launch_selected();
                }
            }
            HitTarget::AddApp => self.open_add_app(),
            HitTarget::HeroAction => {
                self.launch_selected();
            }
            HitTarget::HeroEdit => {
                if let Some(Selection::Program(id)) = self.selection() {
                    self.open_edit_app(&id);
                }
            }
            HitTarget::Settings(target) => self.activate_settings(target, item.rect, mouse.x),
            HitTarget::Divider(divider) => {
                self.drag = Some(DividerDrag { divider, start_x: mouse.x, start_width: self.layout.width_of(divider) });
            }
            HitTarget::Hub(target) => self.activate_hub(target, mouse.click_count),
            HitTarget::Dialog(target) => self.activate_dialog(target, mouse.click_count),
            HitTarget::Scroll(_) => {}
        }
    }

    fn activate_settings(&mut self, target: SettingsTarget, rect: Rect, x: f32) {
        match target {
            SettingsTarget::ThemeCard(id) => {
                self.set_theme(&id);
            }
            SettingsTarget::LanguageCard(language) => self.set_language(&language),
            SettingsTarget::Toggle(key) => {
                let on = toggle_enabled(self.settings.get(), &key);
                self.set_toggle(&key, !on);
            }
            SettingsTarget::Slider(key) => self.set_appearance(key, widgets::slider_value_at(rect, x)),
            SettingsTarget::CreateTheme => self.open_custom_theme(),
        }
    }

    fn activate_hub(&mut self, target: HubTarget, click_count: u32) {
        match target {
            HubTarget::CollapseToggle => self.hub.toggle_collapsed(),
            HubTarget::SearchBox => self.hub.set_search_focused(true),
            HubTarget::SearchClear => self.hub.clear_query(&self.content),
            HubTarget::PagerPrev => self.hub.page_widgets(&self.content, false),
            HubTarget::PagerNext => self.hub.page_widgets(&self.content, true),
            HubTarget::Branch(index) => {
                self.hub.set_search_focused(false);
                self.hub.focus_branch(index);
                if click_count >= 2 {
                    self.activate_branch(index);
                }
            }
            HubTarget::DetailAction => {
                if let Some(index) = self.hub.focused_branch() {
                    self.activate_branch(index);
                }
            }
        }
    }

    fn activate_dialog(&mut self, target: DialogTarget, click_count: u32) {
        match target {
            DialogTarget::AddApp(t) => {
                let action = self.dialogs.add_app.handle_click(&t, click_count);
                self.apply_add_app(action);
            }
            DialogTarget::EditApp(t) => {
                let action = self.dialogs.edit_app.handle_click(&t);
                self.apply_edit_app(action);
            }
            DialogTarget::CustomTheme(t) => {
                let action = self.dialogs.custom_theme.handle_click(&t, &self.themes);
                self.apply_custom_theme(action);
            }
        }
    }

    fn handle_wheel(&mut self, pos: [f32; 2], dy: f32) -> EventResult {
        match self.dialogs.visible() {
            Some(DialogKind::AddApp) => {
                self.dialogs.add_app.handle_wheel(dy);
                return EventResult::Handled;
            }
            Some(DialogKind::CustomTheme) => {
                self.dialogs.custom_theme.handle_wheel(dy);
                return EventResult::Handled;
            }
            Some(DialogKind::EditApp) => return EventResult::Handled,
            None => {}
        }
        let Some(area) = self.hits.as_ref().and_then(|m| m.scroll_area_at(pos)) else {
            return EventResult::Ignored;
        };
        match area {
            ScrollArea::Hub => self.hub.scroll.scroll_by(dy * WHEEL_STEP),
            ScrollArea::Settings => self.settings_panel.scroll.scroll_by(dy * WHEEL_STEP),
            ScrollArea::Dialog => return EventResult::Ignored,
        }
        EventResult::Handled
    }

    fn handle_key(&mut self, key: KeyEvent) -> EventResult {
        if let Some(kind) = self.dialogs.visible() {
            // A visible dialog swallows every key.
            match kind {
                DialogKind::AddApp => {
                    let action = self.dialogs.add_app.handle_key(key);
                    self.apply_add_app(action);
                }
                DialogKind::EditApp => {
                    let action = self.dialogs.edit_app.handle_key(key);
                    self.apply_edit_app(action);
                }
                DialogKind::CustomTheme => {
                    let action = self.dialogs.custom_theme.handle_key(key, &self.themes);
                    self.apply_custom_theme(action);
                }
            }
            return EventResult::Handled;
        }

        if self.interface == Interface::Hub {
            return match self.hub.handle_key(&self.content, key) {
                HubAction::None => EventResult::Ignored,
                HubAction::Handled => EventResult::Handled,
                HubAction::Exit => {
                    self.exit_hub();
                    EventResult::Handled
                }
                HubAction::Activate(index) => {
                    self.activate_branch(index);
                    EventResult::Handled
                }
            };
        }

        match key.key {
            KeyCode::ArrowUp | KeyCode::ArrowDown => {
                self.pending_launch = None;
                self.nav.step_item(&self.content, key.key == KeyCode::ArrowDown);
            }
            KeyCode::ArrowLeft | KeyCode::ArrowRight => {
                self.pending_launch = None;
                self.nav.step_channel(&self.content, key.key == KeyCode::ArrowRight);
            }
            KeyCode::Enter => {
                self.launch_selected();
            }
            KeyCode::PageUp | KeyCode::PageDown if self.nav.active() == NavEntry::Settings => {
                let h = self.settings_panel.scroll.viewport().h;
                self.settings_panel.scroll.page_by(h, key.key == KeyCode::PageDown);
            }
            _ => return EventResult::Ignored,
        }
        EventResult::Handled
    }

    fn handle_text(&mut self, text: &str) -> EventResult {
        let handled = match self.dialogs.visible() {
            Some(DialogKind::AddApp) => self.dialogs.add_app.handle_text(text),
            Some(DialogKind::EditApp) => self.dialogs.edit_app.handle_text(text),
            Some(DialogKind::CustomTheme) => self.dialogs.custom_theme.handle_text(text),
            None if self.interface == Interface::Hub => self.hub.handle_text(&self.content, text),
            None => false,
        };
        EventResult::from_bool(handled)
    }

    /// Paint one frame and replace the hit map the next click resolves
    /// against.
    pub fn render_frame(&mut self, viewport: Viewport) -> DisplayList {
        let colors = *self.themes.colors();
        let typography = self.themes.active().typography;
        let frame = self.layout.compute(viewport.width as f32, viewport.height as f32);
        let window = Rect::new(0.0, 0.0, viewport.width as f32, viewport.height as f32);
        let ctx = PanelContext {
            colors: &colors,
            typography: &typography,
            measurer: self.measurer.as_ref(),
            loc: &self.loc,
            density: self.themes.density_scale(),
            pointer: self.pointer,
        };
        let mut p = Painter::begin_frame(viewport);
        p.clear(colors.background);

        let in_hub = self.interface == Interface::Hub;
        let mut hits = FrameHitMap::new(if in_hub { Layer::Hub } else { Layer::Main });

        let top = chrome::render_top_bar(&mut p, &ctx, frame.top_bar, &self.options.title, in_hub, z::TOP_BAR);
        hits.push(top.hub_toggle, None, z::TOP_BAR, HitTarget::HubToggle);

        if in_hub {
            let r = hub::render(&mut p, &ctx, frame.body(), &mut self.hub, &self.content, z::HUB);
            hits.push(r.grid_viewport, None, z::HUB, HitTarget::Scroll(ScrollArea::Hub));
            hits.push_all(r.targets, None, z::HUB + 20, HitTarget::Hub);
            hits.push_all(r.grid_targets, Some(r.grid_viewport), z::HUB + 10, HitTarget::Hub);
            self.hub_highlight = r.highlight;
        } else {
            let nav = nav_rail::render(&mut p, &ctx, frame.nav_rail, &self.content, self.nav.active(), z::MAIN);
            hits.push_all(nav.entries, Some(frame.nav_rail), z::MAIN + 10, HitTarget::Nav);

            let lib = library::render(&mut p, &ctx, frame.library, &self.content, &self.nav, &mut self.visuals, z::MAIN);
            hits.push_all(lib.items, Some(frame.library), z::MAIN + 10, HitTarget::LibraryItem);
            if let Some(add) = lib.add_button {
                hits.push(add, Some(frame.library), z::MAIN + 20, HitTarget::AddApp);
            }

            match self.nav.selection(&self.content) {
                Some(Selection::Program(id)) => {
                    let view = self.content.programs.get(&id);
                    match (view, self.visuals.get_mut(&id)) {
                        (Some(view), Some(visuals)) => {
                            let editable = AppContent::is_user_program(&id);
                            let r = hero::render_program(&mut p, &ctx, frame.hero, view, visuals, &mut self.wraps, editable, z::MAIN);
                            if let Some(action) = r.action {
                                hits.push(action, Some(frame.hero), z::MAIN + 10, HitTarget::HeroAction);
                            }
                            if let Some(edit) = r.edit {
                                hits.push(edit, Some(frame.hero), z::MAIN + 10, HitTarget::HeroEdit);
                            }
                        }
                        _ => p.fill_rect(frame.hero, colors.background, z::MAIN),
                    }
                }
                Some(Selection::Settings(section)) => {
                    let view = SettingsView {
                        section,
                        themes: &self.themes,
                        settings: self.settings.get(),
                        languages: &self.languages,
                    };
                    let r = settings_panel::render(&mut p, &ctx, frame.hero, &mut self.settings_panel, &view, z::MAIN);
                    hits.push(r.viewport, None, z::MAIN, HitTarget::Scroll(ScrollArea::Settings));
                    hits.push_all(r.targets, Some(r.viewport), z::MAIN + 10, HitTarget::Settings);
                }
                None => p.fill_rect(frame.hero, colors.background, z::MAIN),
            }

            let divider_w = self.layout.constraints().divider_width;
            for divider in [Divider::NavLibrary, Divider::LibraryHero] {
                let r = frame.divider(divider, divider_w);
                let dragging = self.drag.is_some_and(|d| d.divider == divider);
                if dragging || ctx.hovered(&p, r) {
                    let line = Rect::new(r.x + r.w * 0.5 - 1.0, r.y, 2.0, r.h);
                    p.fill_rect(line, colors.accent.with_alpha(160), z::DIVIDER);
                }
                hits.push(r, None, z::DIVIDER, HitTarget::Divider(divider));
            }
        }

        chrome::render_status_bar(&mut p, &ctx, frame.status_bar, &self.status, self.loc.language(), z::STATUS);

        let dialog = match self.dialogs.visible() {
            Some(DialogKind::AddApp) => Some(self.dialogs.add_app.render(&mut p, &ctx, window, z::DIALOG)),
            Some(DialogKind::EditApp) => Some(self.dialogs.edit_app.render(&mut p, &ctx, window, z::DIALOG)),
            Some(DialogKind::CustomTheme) => Some(self.dialogs.custom_theme.render(&mut p, &ctx, window, z::DIALOG)),
            None => None,
        };
        if let Some(r) = dialog {
            hits.set_dialog_panel(r.panel);
            hits.push_all(r.targets, None, z::DIALOG + 20, HitTarget::Dialog);
            if let Some(list) = r.list_viewport {
                hits.push(list, None, z::DIALOG, HitTarget::Scroll(ScrollArea::Dialog));
            }
            hits.push_all(r.list_targets, r.list_viewport, z::DIALOG + 10, HitTarget::Dialog);
        }

        self.hits = Some(hits);
        p.finish()
    }

    /// Flush settings; called by the host before exit.
    pub fn shutdown(&mut self) {
        self.persist_settings();
        info!("launcher shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn python_scripts_use_interpreter() {
        let args = vec!["--fast".to_string()];
        let py = LaunchCommand::resolve("/opt/tool.py", &args, Some(Path::new("/usr/bin/python3.12")));
        assert_eq!(py.program, "/usr/bin/python3.12");
        assert_eq!(py.args, vec!["/opt/tool.py".to_string(), "--fast".to_string()]);

        let default_py = LaunchCommand::resolve("run.PY", &[], None);
        assert_eq!(default_py.program, "python3");

        let native = LaunchCommand::resolve("/usr/bin/true", &args, None);
        assert_eq!(native, LaunchCommand { program: "/usr/bin/true".into(), args });
    }
}
