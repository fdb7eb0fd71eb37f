//! The launcher catalog: channels, program views and the hub layout.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use colony_core::Rgba;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ContentError, ValidationError};
use crate::theme::slugify;

pub const LOCAL_APPS_CHANNEL: &str = "local-apps";
pub const USER_PROGRAM_PREFIX: &str = "user-";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppContent {
    pub channels: Vec<Channel>,
    pub programs: BTreeMap<String, ProgramView>,
    pub hub: HubConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Channel {
    pub id: String,
    pub label: String,
    pub programs: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Section {
    pub title: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Gradient {
    pub from: String,
    pub to: String,
}

/// Display metadata for one launchable entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProgramView {
    /// Library tile title.
    pub name: String,
    pub heading: String,
    pub tagline: String,
    pub paragraphs: Vec<String>,
    pub sections: Vec<Section>,
    pub highlights: Vec<String>,
    pub gradient: Option<Gradient>,
    pub accent: String,
    pub status: String,
    pub version: String,
    pub install_state: String,
    /// Executable to spawn; `None` for informational entries.
    pub command: Option<String>,
    pub args: Vec<String>,
}

impl ProgramView {
    pub fn title(&self) -> &str {
        if self.name.is_empty() { &self.heading } else { &self.name }
    }

    pub fn heading(&self) -> &str {
        if self.heading.is_empty() { self.title() } else { &self.heading }
    }

    pub fn accent_or(&self, fallback: Rgba) -> Rgba {
        Rgba::parse_hex(&self.accent).unwrap_or(fallback)
    }

    pub fn gradient_or(&self, fallback: (Rgba, Rgba)) -> (Rgba, Rgba) {
        match &self.gradient {
            Some(g) => (
                Rgba::parse_hex(&g.from).unwrap_or(fallback.0),
                Rgba::parse_hex(&g.to).unwrap_or(fallback.1),
            ),
            None => fallback,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HubConfig {
    pub headline_key: String,
    pub description_key: String,
    pub branches: Vec<HubBranch>,
    pub widgets: Vec<HubWidget>,
}

/// A hub destination, optionally pointing at a channel and/or program.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HubBranch {
    pub id: String,
    pub title: String,
    pub description: String,
    pub channel: Option<String>,
    pub program: Option<String>,
}

impl HubBranch {
    /// Case-insensitive substring match on title and description.
    pub fn matches(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        q.is_empty()
            || self.title.to_lowercase().contains(&q)
            || self.description.to_lowercase().contains(&q)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HubWidget {
    pub title: String,
    pub body: String,
}

impl AppContent {
    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let data = fs::read(path).map_err(|source| ContentError::Read { path: path.to_path_buf(), source })?;
        let content: AppContent = serde_json::from_slice(&data)
            .map_err(|source| ContentError::Parse { path: path.to_path_buf(), source })?;
        content.validate()?;
        info!(
            path = %path.display(),
            channels = content.channels.len(),
            programs = content.programs.len(),
            "content loaded"
        );
        Ok(content)
    }

    /// Structural checks that make the catalog unusable when violated.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.channels.is_empty() {
            return Err(ContentError::NoChannels);
        }
        for channel in &self.channels {
            if let Some(missing) = channel.programs.iter().find(|p| !self.programs.contains_key(*p)) {
                return Err(ContentError::UnknownProgram {
                    channel: channel.id.clone(),
                    program: missing.clone(),
                });
            }
        }
        for branch in &self.hub.branches {
            if let Some(ch) = &branch.channel
                && self.channel_index(ch).is_none()
            {
                warn!(branch = %branch.id, channel = %ch, "hub branch targets unknown channel");
            }
        }
        Ok(())
    }

    pub fn channel_index(&self, id: &str) -> Option<usize> {
        self.channels.iter().position(|c| c.id == id)
    }

    pub fn program(&self, id: &str) -> Option<&ProgramView> {
        self.programs.get(id)
    }

    pub fn is_user_program(id: &str) -> bool {
        id.starts_with(USER_PROGRAM_PREFIX)
    }

    /// Append the executable at `path` to the local-apps channel (created on
    /// demand). Returns the new program id.
    pub fn add_user_program(&mut self, path: &Path, accent: Rgba) -> Result<String, ValidationError> {
        let meta = fs::metadata(path).map_err(|_| ValidationError::PathMissing)?;
        if meta.is_dir() {
            return Err(ValidationError::PathIsDirectory);
        }
        let name = display_name_for(path);
        let base = format!("{USER_PROGRAM_PREFIX}{}", slugify(&name));
        let mut id = base.clone();
        let mut n = 2;
        while self.programs.contains_key(&id) {
            id = format!("{base}-{n}");
            n += 1;
        }

        let view = ProgramView {
            name: name.clone(),
            heading: name.clone(),
            tagline: path.display().to_string(),
            accent: accent.to_hex(),
            status: "Installed".to_string(),
            install_state: "local".to_string(),
            command: Some(path.display().to_string()),
            ..ProgramView::default()
        };
        self.programs.insert(id.clone(), view);

        let idx = match self.channel_index(LOCAL_APPS_CHANNEL) {
            Some(idx) => idx,
            None => {
                self.channels.push(Channel {
                    id: LOCAL_APPS_CHANNEL.to_string(),
                    label: "Local Apps".to_string(),
                    programs: Vec::new(),
                });
                self.channels.len() - 1
            }
        };
        self.channels[idx].programs.push(id.clone());
        info!(%id, path = %path.display(), "user program added");
        Ok(id)
    }

    /// Rename / recolor a user-added program.
    pub fn edit_user_program(&mut self, id: &str, name: &str, accent: Rgba) -> Result<(), ValidationError> {
        if !Self::is_user_program(id) {
            return Err(ValidationError::NotEditable(id.to_string()));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::NameRequired);
        }
        let view = self
            .programs
            .get_mut(id)
            .ok_or_else(|| ValidationError::NotEditable(id.to_string()))?;
        view.name = name.to_string();
        view.heading = name.to_string();
        view.accent = accent.to_hex();
        Ok(())
    }
}

/// File stem, falling back to the full file name.
pub fn display_name_for(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Path the add-app dialog opens in when nothing else is known.
pub fn default_browse_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AppContent {
        serde_json::from_str(
            r##"{
                "channels": [{"id": "tools", "label": "Tools", "programs": ["term"]}],
                "programs": {"term": {"name": "Terminal", "accent": "#33AA77"}},
                "hub": {"branches": [{"id": "b", "title": "Disk Usage", "description": "Storage"}]}
            }"##,
        )
        .unwrap()
    }

    #[test]
    fn validation_rejects_dangling_program() {
        let mut c = sample();
        assert!(c.validate().is_ok());
        c.channels[0].programs.push("ghost".into());
        assert!(matches!(c.validate(), Err(ContentError::UnknownProgram { .. })));
        c.channels.clear();
        assert!(matches!(c.validate(), Err(ContentError::NoChannels)));
    }

    #[test]
    fn add_creates_local_channel_and_unique_ids() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("tool.sh");
        fs::write(&exe, "#!/bin/sh\n").unwrap();

        let mut c = sample();
        let first = c.add_user_program(&exe, Rgba::rgb(1, 2, 3)).unwrap();
        let second = c.add_user_program(&exe, Rgba::rgb(1, 2, 3)).unwrap();
        assert_eq!(first, "user-tool");
        assert_eq!(second, "user-tool-2");
        let local = &c.channels[c.channel_index(LOCAL_APPS_CHANNEL).unwrap()];
        assert_eq!(local.programs, vec![first.clone(), second]);
        assert_eq!(c.program(&first).unwrap().title(), "tool");
        assert!(c.validate().is_ok());
    }

    #[test]
    fn add_rejects_directories_and_missing_paths() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = sample();
        assert_eq!(c.add_user_program(dir.path(), Rgba::BLACK), Err(ValidationError::PathIsDirectory));
        assert_eq!(
            c.add_user_program(&dir.path().join("missing"), Rgba::BLACK),
            Err(ValidationError::PathMissing)
        );
    }

    #[test]
    fn only_user_programs_are_editable() {
        let mut c = sample();
        assert!(matches!(c.edit_user_program("term", "X", Rgba::BLACK), Err(ValidationError::NotEditable(_))));
        c.programs.insert("user-x".into(), ProgramView { name: "x".into(), ..Default::default() });
        c.edit_user_program("user-x", "  Renamed ", Rgba::rgb(255, 0, 0)).unwrap();
        let v = c.program("user-x").unwrap();
        assert_eq!(v.title(), "Renamed");
        assert_eq!(v.accent, "#FF0000");
        assert_eq!(c.edit_user_program("user-x", " ", Rgba::BLACK), Err(ValidationError::NameRequired));
    }

    #[test]
    fn branch_matching_is_case_insensitive() {
        let c = sample();
        let b = &c.hub.branches[0];
        assert!(b.matches("DISK"));
        assert!(b.matches("stor"));
        assert!(b.matches(""));
        assert!(!b.matches("network"));
    }

    #[test]
    fn view_fallbacks() {
        let c = sample();
        let v = c.program("term").unwrap();
        assert_eq!(v.heading(), "Terminal");
        assert_eq!(v.accent_or(Rgba::BLACK), Rgba::rgb(0x33, 0xAA, 0x77));
        assert_eq!(v.gradient_or((Rgba::BLACK, Rgba::WHITE)), (Rgba::BLACK, Rgba::WHITE));
    }
}
