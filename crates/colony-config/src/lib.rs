//! Colony launcher configuration.
//!
//! Static launcher configuration comes from `colony.toml` with `COLONY_*`
//! environment overrides. User-mutable settings (theme, language, toggles,
//! custom schemes) live in a JSON document managed by [`SettingsStore`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod settings;

pub use settings::{
    Appearance, AppearanceKey, CustomSchemeRecord, Settings, SettingsStore, SCHEME_COLOR_KEYS,
};

const CONFIG_FILE: &str = "colony.toml";
const APP_HOME_DIR: &str = ".colony";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Root of `colony.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LauncherConfig {
    pub paths: PathsConfig,
    pub window: WindowConfig,
    pub fonts: FontsConfig,
    pub launcher: BehaviorConfig,
}

/// Files the launcher reads and writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Channel/program/hub catalog (JSON).
    pub content: PathBuf,
    /// Settings document; `None` means `~/.colony/settings.json`.
    pub settings: Option<PathBuf>,
    /// Directory holding `<lang>.json` string tables.
    pub locales: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub min_width: u32,
    pub min_height: u32,
}

/// Per-role font files. Anything unset falls back to system fonts.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FontsConfig {
    pub font_path: Option<PathBuf>,
    pub display: Option<PathBuf>,
    pub headline: Option<PathBuf>,
    pub body: Option<PathBuf>,
    pub ui: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    pub fallback_language: String,
    /// Upper bound on results of a `*query` global search.
    pub global_search_cap: usize,
    /// Largest frame delta fed to animations, in seconds.
    pub max_frame_delta: f32,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            content: PathBuf::from("content/colony.json"),
            settings: None,
            locales: PathBuf::from("locales"),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Colony Launcher".to_string(),
            width: 1280,
            height: 800,
            min_width: 640,
            min_height: 480,
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            fallback_language: "en".to_string(),
            global_search_cap: 512,
            max_frame_delta: 0.25,
        }
    }
}

impl LauncherConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&content).map_err(|message| ConfigError::Parse { path: path.to_path_buf(), message })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// `colony.toml` in the working directory, or defaults when absent.
    /// A file that exists but does not parse is reported and ignored.
    pub fn load_or_default() -> Self {
        match Self::load_from_file(CONFIG_FILE) {
            Ok(config) => config,
            Err(ConfigError::Read { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                Self::default()
            }
            Err(error) => {
                tracing::warn!(%error, "ignoring unreadable launcher config");
                Self::default()
            }
        }
    }

    /// Apply `COLONY_*` environment overrides on top of file values.
    pub fn merge_with_env(&mut self) {
        self.merge_with(|key| std::env::var(key).ok());
    }

    /// Same as [`merge_with_env`](Self::merge_with_env) with an injectable lookup.
    pub fn merge_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let path = |key: &str| lookup(key).filter(|v| !v.trim().is_empty()).map(PathBuf::from);

        if let Some(p) = path("COLONY_FONT_PATH") {
            self.fonts.font_path = Some(p);
        }
        if let Some(p) = path("COLONY_DISPLAY_FONT") {
            self.fonts.display = Some(p);
        }
        if let Some(p) = path("COLONY_HEADLINE_FONT") {
            self.fonts.headline = Some(p);
        }
        if let Some(p) = path("COLONY_BODY_FONT") {
            self.fonts.body = Some(p);
        }
        if let Some(p) = path("COLONY_UI_FONT") {
            self.fonts.ui = Some(p);
        }
        if let Some(name) = lookup("COLONY_MODULE_NAME").filter(|v| !v.trim().is_empty()) {
            self.window.title = name;
        }
        if let Some(p) = path("COLONY_CONTENT_PATH") {
            self.paths.content = p;
        }
        if let Some(p) = path("COLONY_SETTINGS_PATH") {
            self.paths.settings = Some(p);
        }
    }

    /// Load from `colony.toml` (or defaults), then apply env overrides.
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }

    /// Resolved settings document location.
    pub fn settings_path(&self) -> PathBuf {
        if let Some(p) = &self.paths.settings {
            return p.clone();
        }
        match dirs::home_dir() {
            Some(mut home) => {
                home.push(APP_HOME_DIR);
                home.push(SETTINGS_FILE);
                home
            }
            None => PathBuf::from(SETTINGS_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_are_sane() {
        let config = LauncherConfig::default();
        assert_eq!(config.launcher.global_search_cap, 512);
        assert_eq!(config.launcher.max_frame_delta, 0.25);
        assert_eq!(config.launcher.fallback_language, "en");
        assert!(config.window.width >= config.window.min_width);
    }

    #[test]
    fn toml_round_trip_and_partial_sections() {
        let parsed = LauncherConfig::from_toml_str(
            r#"
            [window]
            title = "Lab"

            [launcher]
            global_search_cap = 64
            "#,
        )
        .unwrap();
        assert_eq!(parsed.window.title, "Lab");
        assert_eq!(parsed.window.width, 1280);
        assert_eq!(parsed.launcher.global_search_cap, 64);

        let text = toml::to_string_pretty(&parsed).unwrap();
        let again = LauncherConfig::from_toml_str(&text).unwrap();
        assert_eq!(again.launcher.global_search_cap, 64);
    }

    #[test]
    fn env_overrides_take_precedence() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("COLONY_FONT_PATH", "/fonts/base.ttf"),
            ("COLONY_UI_FONT", "/fonts/ui.ttf"),
            ("COLONY_MODULE_NAME", "Colony Nightly"),
            ("COLONY_BODY_FONT", "   "),
        ]);
        let mut config = LauncherConfig::default();
        config.merge_with(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.fonts.font_path.as_deref(), Some(Path::new("/fonts/base.ttf")));
        assert_eq!(config.fonts.ui.as_deref(), Some(Path::new("/fonts/ui.ttf")));
        assert_eq!(config.fonts.body, None);
        assert_eq!(config.window.title, "Colony Nightly");
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = LauncherConfig::load_from_file("/no/such/colony.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn explicit_settings_path_wins() {
        let mut config = LauncherConfig::default();
        config.paths.settings = Some(PathBuf::from("/tmp/s.json"));
        assert_eq!(config.settings_path(), PathBuf::from("/tmp/s.json"));
    }
}
