//! What the nav rail and library currently point at.

use std::collections::HashMap;

use crate::content::AppContent;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SettingsSection {
    Appearance,
    Language,
    General,
}

impl SettingsSection {
    pub const ALL: [SettingsSection; 3] =
        [SettingsSection::Appearance, SettingsSection::Language, SettingsSection::General];

    pub fn label_key(self) -> &'static str {
        match self {
            SettingsSection::Appearance => "settings.appearance",
            SettingsSection::Language => "settings.language",
            SettingsSection::General => "settings.general",
        }
    }
}

/// The item shown in the hero column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    Program(String),
    Settings(SettingsSection),
}

/// A nav rail entry: a content channel or the synthetic settings channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavEntry {
    Channel(usize),
    Settings,
}

/// Active nav entry plus the remembered program per channel.
#[derive(Clone, Debug)]
pub struct NavState {
    active: NavEntry,
    programs: HashMap<String, String>,
    section: SettingsSection,
}

impl Default for NavState {
    fn default() -> Self {
        Self { active: NavEntry::Channel(0), programs: HashMap::new(), section: SettingsSection::Appearance }
    }
}

impl NavState {
    pub fn active(&self) -> NavEntry {
        self.active
    }

    pub fn activate(&mut self, entry: NavEntry) {
        self.active = entry;
    }

    pub fn settings_section(&self) -> SettingsSection {
        self.section
    }

    /// Resolve the hero selection against current content.
    pub fn selection(&self, content: &AppContent) -> Option<Selection> {
        match self.active {
            NavEntry::Settings => Some(Selection::Settings(self.section)),
            NavEntry::Channel(idx) => {
                let channel = content.channels.get(idx)?;
                let remembered = self
                    .programs
                    .get(&channel.id)
                    .filter(|id| channel.programs.contains(id));
                remembered
                    .or_else(|| channel.programs.first())
                    .map(|id| Selection::Program(id.clone()))
            }
        }
    }

    pub fn select(&mut self, content: &AppContent, selection: Selection) {
        match selection {
            Selection::Settings(section) => {
                self.active = NavEntry::Settings;
                self.section = section;
            }
            Selection::Program(id) => {
                if let NavEntry::Channel(idx) = self.active
                    && let Some(channel) = content.channels.get(idx)
                    && channel.programs.contains(&id)
                {
                    self.programs.insert(channel.id.clone(), id);
                    return;
                }
                // Jump to the first channel that lists the program.
                if let Some((idx, channel)) =
                    content.channels.iter().enumerate().find(|(_, c)| c.programs.contains(&id))
                {
                    self.active = NavEntry::Channel(idx);
                    self.programs.insert(channel.id.clone(), id);
                }
            }
        }
    }

    /// Number of nav entries: every channel plus settings.
    pub fn entry_count(content: &AppContent) -> usize {
        content.channels.len() + 1
    }

    fn entry_index(&self, content: &AppContent) -> usize {
        match self.active {
            NavEntry::Channel(i) => i.min(content.channels.len()),
            NavEntry::Settings => content.channels.len(),
        }
    }

    fn entry_at(content: &AppContent, index: usize) -> NavEntry {
        if index < content.channels.len() { NavEntry::Channel(index) } else { NavEntry::Settings }
    }

    /// Move to the previous/next nav entry, wrapping.
    pub fn step_channel(&mut self, content: &AppContent, forward: bool) {
        let n = Self::entry_count(content);
        let cur = self.entry_index(content);
        let next = if forward { (cur + 1) % n } else { (cur + n - 1) % n };
        self.active = Self::entry_at(content, next);
    }

    /// Move within the active channel's programs (or settings sections),
    /// wrapping.
    pub fn step_item(&mut self, content: &AppContent, forward: bool) {
        match self.active {
            NavEntry::Settings => {
                let all = SettingsSection::ALL;
                let cur = all.iter().position(|s| *s == self.section).unwrap_or(0);
                let n = all.len();
                self.section = all[if forward { (cur + 1) % n } else { (cur + n - 1) % n }];
            }
            NavEntry::Channel(idx) => {
                let Some(channel) = content.channels.get(idx) else { return };
                let n = channel.programs.len();
                if n == 0 {
                    return;
                }
                let cur = match self.selection(content) {
                    Some(Selection::Program(id)) => channel.programs.iter().position(|p| *p == id).unwrap_or(0),
                    _ => 0,
                };
                let next = if forward { (cur + 1) % n } else { (cur + n - 1) % n };
                self.programs.insert(channel.id.clone(), channel.programs[next].clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Channel, ProgramView};

    fn content() -> AppContent {
        let mut c = AppContent::default();
        for (ch, progs) in [("games", vec!["a", "b"]), ("tools", vec!["c"])] {
            c.channels.push(Channel {
                id: ch.into(),
                label: ch.into(),
                programs: progs.iter().map(|p| p.to_string()).collect(),
            });
            for p in progs {
                c.programs.insert(p.into(), ProgramView::default());
            }
        }
        c
    }

    #[test]
    fn defaults_to_first_program_and_remembers_per_channel() {
        let c = content();
        let mut nav = NavState::default();
        assert_eq!(nav.selection(&c), Some(Selection::Program("a".into())));
        nav.step_item(&c, true);
        assert_eq!(nav.selection(&c), Some(Selection::Program("b".into())));
        nav.step_channel(&c, true);
        assert_eq!(nav.selection(&c), Some(Selection::Program("c".into())));
        nav.step_channel(&c, false);
        assert_eq!(nav.selection(&c), Some(Selection::Program("b".into())));
    }

    #[test]
    fn settings_is_the_last_nav_entry() {
        let c = content();
        let mut nav = NavState::default();
        nav.step_channel(&c, false);
        assert_eq!(nav.active(), NavEntry::Settings);
        assert_eq!(nav.selection(&c), Some(Selection::Settings(SettingsSection::Appearance)));
        nav.step_item(&c, false);
        assert_eq!(nav.settings_section(), SettingsSection::General);
        nav.step_channel(&c, true);
        assert_eq!(nav.active(), NavEntry::Channel(0));
    }

    #[test]
    fn selecting_foreign_program_switches_channel() {
        let c = content();
        let mut nav = NavState::default();
        nav.select(&c, Selection::Program("c".into()));
        assert_eq!(nav.active(), NavEntry::Channel(1));
        assert_eq!(nav.selection(&c), Some(Selection::Program("c".into())));
    }
}
