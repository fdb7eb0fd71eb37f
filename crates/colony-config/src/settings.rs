//! User settings persisted as JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::{fs, io};
use tracing::{debug, warn};

use crate::ConfigError;

/// Color slot names every custom scheme must define, in grid order.
pub const SCHEME_COLOR_KEYS: [&str; 16] = [
    "background",
    "surface",
    "surface_alt",
    "card",
    "card_hover",
    "border",
    "accent",
    "accent_soft",
    "text_primary",
    "text_secondary",
    "text_muted",
    "success",
    "warning",
    "danger",
    "nav_background",
    "hero_overlay",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppearanceKey {
    AccentIntensity,
    BackgroundDepth,
    InterfaceDensity,
}

impl AppearanceKey {
    pub const ALL: [AppearanceKey; 3] = [
        AppearanceKey::AccentIntensity,
        AppearanceKey::BackgroundDepth,
        AppearanceKey::InterfaceDensity,
    ];

    pub fn id(self) -> &'static str {
        match self {
            AppearanceKey::AccentIntensity => "accent_intensity",
            AppearanceKey::BackgroundDepth => "background_depth",
            AppearanceKey::InterfaceDensity => "interface_density",
        }
    }
}

/// Appearance sliders, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Appearance {
    pub accent_intensity: f32,
    pub background_depth: f32,
    pub interface_density: f32,
}

impl Default for Appearance {
    fn default() -> Self {
        Self { accent_intensity: 1.0, background_depth: 0.5, interface_density: 0.0 }
    }
}

fn unit(v: f32) -> f32 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
}

impl Appearance {
    pub fn get(&self, key: AppearanceKey) -> f32 {
        match key {
            AppearanceKey::AccentIntensity => self.accent_intensity,
            AppearanceKey::BackgroundDepth => self.background_depth,
            AppearanceKey::InterfaceDensity => self.interface_density,
        }
    }

    pub fn set(&mut self, key: AppearanceKey, value: f32) {
        let value = unit(value);
        match key {
            AppearanceKey::AccentIntensity => self.accent_intensity = value,
            AppearanceKey::BackgroundDepth => self.background_depth = value,
            AppearanceKey::InterfaceDensity => self.interface_density = value,
        }
    }

    pub fn clamped(self) -> Self {
        Self {
            accent_intensity: unit(self.accent_intensity),
            background_depth: unit(self.background_depth),
            interface_density: unit(self.interface_density),
        }
    }
}

/// A user-authored scheme: id, display name and hex colors keyed by
/// [`SCHEME_COLOR_KEYS`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomSchemeRecord {
    pub id: String,
    pub name: String,
    pub colors: BTreeMap<String, String>,
}

impl CustomSchemeRecord {
    /// Keys from [`SCHEME_COLOR_KEYS`] that are absent.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        SCHEME_COLOR_KEYS
            .iter()
            .copied()
            .filter(|k| !self.colors.contains_key(*k))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub theme: String,
    pub language: String,
    pub toggles: BTreeMap<String, bool>,
    pub appearance: Appearance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python_path: Option<PathBuf>,
    pub custom_schemes: Vec<CustomSchemeRecord>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "colony-dark".to_string(),
            language: "en".to_string(),
            toggles: BTreeMap::new(),
            appearance: Appearance::default(),
            python_path: None,
            custom_schemes: Vec::new(),
        }
    }
}

impl Settings {
    pub fn toggle(&self, key: &str) -> bool {
        self.toggles.get(key).copied().unwrap_or(false)
    }

    /// Clamp appearance values and drop schemes that cannot be built.
    fn sanitize(mut self) -> Self {
        self.appearance = self.appearance.clamped();
        self.custom_schemes.retain(|scheme| {
            let missing = scheme.missing_keys();
            if missing.is_empty() && !scheme.name.trim().is_empty() {
                true
            } else {
                warn!(id = %scheme.id, ?missing, "dropping incomplete custom scheme");
                false
            }
        });
        self
    }
}

/// Owns the settings document and its location; writes only when dirty.
pub struct SettingsStore {
    path: PathBuf,
    state: Settings,
    dirty: bool,
}

impl SettingsStore {
    /// Read `path`. A missing file yields defaults; a malformed one is
    /// reported and replaced by defaults on the next save.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = match fs::read(&path) {
            Ok(data) => match serde_json::from_slice::<Settings>(&data) {
                Ok(parsed) => parsed.sanitize(),
                Err(error) => {
                    warn!(?error, ?path, "failed to parse settings; using defaults");
                    Settings::default()
                }
            },
            Err(error) => {
                if error.kind() != io::ErrorKind::NotFound {
                    warn!(?error, ?path, "failed to read settings");
                }
                Settings::default()
            }
        };
        Self { path, state, dirty: false }
    }

    /// In-memory store that never touches disk until `save` is called.
    pub fn in_memory(path: impl Into<PathBuf>, state: Settings) -> Self {
        Self { path: path.into(), state: state.sanitize(), dirty: false }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> &Settings {
        &self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mutate settings; the store is marked dirty only if something changed.
    pub fn update(&mut self, f: impl FnOnce(&mut Settings)) {
        let before = self.state.clone();
        f(&mut self.state);
        self.state.appearance = self.state.appearance.clamped();
        if self.state != before {
            self.dirty = true;
        }
    }

    pub fn save(&mut self) -> Result<(), ConfigError> {
        if !self.dirty {
            return Ok(());
        }
        write_settings(&self.path, &self.state)?;
        self.dirty = false;
        debug!(path = ?self.path, "settings saved");
        Ok(())
    }
}

impl Drop for SettingsStore {
    fn drop(&mut self) {
        if self.dirty
            && let Err(error) = write_settings(&self.path, &self.state)
        {
            warn!(%error, path = ?self.path, "failed to persist settings during drop");
        }
    }
}

fn write_settings(path: &Path, state: &Settings) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Write { path: parent.to_path_buf(), source })?;
    }
    let json = serde_json::to_string_pretty(state)?;
    fs::write(path, json).map_err(|source| ConfigError::Write { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_scheme(name: &str) -> CustomSchemeRecord {
        CustomSchemeRecord {
            id: format!("custom-{name}"),
            name: name.to_string(),
            colors: SCHEME_COLOR_KEYS.iter().map(|k| (k.to_string(), "#112233".to_string())).collect(),
        }
    }

    #[test]
    fn missing_file_gives_defaults_without_dirtying() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::load(dir.path().join("settings.json"));
        assert_eq!(store.get(), &Settings::default());
        assert!(!store.is_dirty());
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        let store = SettingsStore::load(&path);
        assert_eq!(store.get().theme, "colony-dark");
    }

    #[test]
    fn save_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        {
            let mut store = SettingsStore::load(&path);
            store.update(|s| {
                s.theme = "aurora".into();
                s.toggles.insert("reduce_motion".into(), true);
                s.appearance.set(AppearanceKey::BackgroundDepth, 0.2);
                s.custom_schemes.push(full_scheme("Dusk"));
            });
            assert!(store.is_dirty());
            store.save().unwrap();
            assert!(!store.is_dirty());
        }
        let store = SettingsStore::load(&path);
        assert_eq!(store.get().theme, "aurora");
        assert!(store.get().toggle("reduce_motion"));
        assert!(!store.get().toggle("unknown"));
        assert_eq!(store.get().appearance.background_depth, 0.2);
        assert_eq!(store.get().custom_schemes.len(), 1);
    }

    #[test]
    fn appearance_is_clamped_on_load_and_update() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"appearance":{"accent_intensity":3.5,"background_depth":-1}}"#).unwrap();
        let mut store = SettingsStore::load(&path);
        assert_eq!(store.get().appearance.accent_intensity, 1.0);
        assert_eq!(store.get().appearance.background_depth, 0.0);
        store.update(|s| s.appearance.interface_density = 9.0);
        assert_eq!(store.get().appearance.interface_density, 1.0);
    }

    #[test]
    fn incomplete_custom_schemes_are_dropped() {
        let mut partial = full_scheme("Half");
        partial.colors.remove("accent");
        let store = SettingsStore::in_memory("unused.json", Settings {
            custom_schemes: vec![partial, full_scheme("Whole")],
            ..Settings::default()
        });
        let names: Vec<_> = store.get().custom_schemes.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Whole"]);
    }

    #[test]
    fn no_op_update_stays_clean() {
        let mut store = SettingsStore::in_memory("unused.json", Settings::default());
        store.update(|s| s.theme = "colony-dark".into());
        assert!(!store.is_dirty());
    }
}
