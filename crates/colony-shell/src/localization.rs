//! Per-language string tables keyed by dotted paths.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

/// English strings compiled in so the shell is usable without locale files.
const BUILTIN_EN: &[(&str, &str)] = &[
    ("app.title", "Colony Launcher"),
    ("app.ready", "Ready"),
    ("nav.hub", "Hub"),
    ("nav.settings", "Settings"),
    ("library.add", "Add application"),
    ("library.empty", "No programs in this channel"),
    ("hero.launch", "Launch"),
    ("hero.edit", "Edit"),
    ("hero.version", "Version"),
    ("hero.status", "Status"),
    ("hub.headline", "Where to next?"),
    ("hub.description", "Jump straight to a destination or search for one."),
    ("hub.search", "Search destinations"),
    ("hub.clear", "Clear"),
    ("hub.open", "Open"),
    ("hub.close", "Back"),
    ("hub.collapse", "Collapse"),
    ("hub.expand", "Expand"),
    ("hub.destinations.one", "{count} destination"),
    ("hub.destinations.other", "{count} destinations"),
    ("hub.no_results", "Nothing matches your search"),
    ("settings.appearance", "Appearance"),
    ("settings.language", "Language"),
    ("settings.general", "General"),
    ("settings.themes", "Themes"),
    ("settings.create_theme", "Create custom theme"),
    ("settings.accent_intensity", "Accent intensity"),
    ("settings.background_depth", "Background depth"),
    ("settings.interface_density", "Interface density"),
    ("settings.toggle.reduce_motion", "Reduce motion"),
    ("settings.toggle.show_status_bar", "Show status bar"),
    ("settings.toggle.confirm_launch", "Confirm before launching"),
    ("dialog.cancel", "Cancel"),
    ("dialog.save", "Save"),
    ("dialog.add", "Add"),
    ("dialog.add_app.title", "Add application"),
    ("dialog.add_app.search", "Search (prefix * for global)"),
    ("dialog.add_app.up", "Up"),
    ("dialog.add_app.sort.name", "Sort: name"),
    ("dialog.add_app.sort.modified_asc", "Sort: oldest"),
    ("dialog.add_app.sort.modified_desc", "Sort: newest"),
    ("dialog.add_app.filter.all", "All files"),
    ("dialog.add_app.filter.executables", "Executables"),
    ("dialog.add_app.filter.scripts", "Scripts"),
    ("dialog.edit_app.title", "Edit application"),
    ("dialog.edit_app.name", "Display name"),
    ("dialog.edit_app.accent", "Accent color"),
    ("dialog.custom_theme.title", "Create custom theme"),
    ("dialog.custom_theme.name", "Theme name"),
    ("theme.field.background", "Background"),
    ("theme.field.surface", "Surface"),
    ("theme.field.surface_alt", "Surface (alt)"),
    ("theme.field.card", "Card"),
    ("theme.field.card_hover", "Card hover"),
    ("theme.field.border", "Border"),
    ("theme.field.accent", "Accent"),
    ("theme.field.accent_soft", "Accent (soft)"),
    ("theme.field.text_primary", "Text"),
    ("theme.field.text_secondary", "Secondary text"),
    ("theme.field.text_muted", "Muted text"),
    ("theme.field.success", "Success"),
    ("theme.field.warning", "Warning"),
    ("theme.field.danger", "Danger"),
    ("theme.field.nav_background", "Navigation"),
    ("theme.field.hero_overlay", "Hero overlay"),
    ("status.launching", "Launching {name}..."),
    ("status.confirm_launch", "Launch {name}? Press Launch again to confirm"),
    ("status.no_command", "{name} has nothing to launch"),
    ("status.added", "Added {name}"),
    ("status.updated", "Updated {name}"),
    ("status.theme", "Theme changed to {name}"),
    ("status.language", "Language changed to {name}"),
];

#[derive(Debug, Clone, Default)]
pub struct Localization {
    language: String,
    table: HashMap<String, String>,
    fallback: HashMap<String, String>,
}

impl Localization {
    /// Built-in English only.
    pub fn builtin() -> Self {
        Self { language: "en".to_string(), table: HashMap::new(), fallback: builtin_table() }
    }

    /// Load `<dir>/<language>.json` over `<dir>/<fallback>.json` over the
    /// built-in English strings. A language that fails to load is reported
    /// and the fallback stays active.
    pub fn load(dir: &Path, language: &str, fallback_language: &str) -> Self {
        let mut fallback = builtin_table();
        match read_table(&table_path(dir, fallback_language)) {
            Ok(t) => fallback.extend(t),
            Err(reason) => debug!(%reason, language = fallback_language, "fallback language not loaded"),
        }
        if language == fallback_language {
            return Self { language: language.to_string(), table: HashMap::new(), fallback };
        }
        match read_table(&table_path(dir, language)) {
            Ok(table) => Self { language: language.to_string(), table, fallback },
            Err(reason) => {
                warn!(%reason, language, "failed to load language; using fallback");
                Self { language: fallback_language.to_string(), table: HashMap::new(), fallback }
            }
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Active table, then fallback table, then `fallback`.
    pub fn get<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        self.table
            .get(key)
            .or_else(|| self.fallback.get(key))
            .map(String::as_str)
            .unwrap_or(fallback)
    }

    /// Like [`get`](Self::get) with the key doubling as the fallback.
    pub fn tr<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key, key)
    }

    /// Substitute `{name}` placeholders.
    pub fn format(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut out = self.tr(key).to_string();
        for (name, value) in args {
            out = out.replace(&format!("{{{name}}}"), value);
        }
        out
    }

    /// `"1 destination"` / `"N destinations"` style plurals.
    pub fn plural(&self, key: &str, count: usize) -> String {
        let form = if count == 1 { "one" } else { "other" };
        self.format(&format!("{key}.{form}"), &[("count", &count.to_string())])
    }
}

/// Languages with a table in `dir`, sorted; English is always present.
pub fn available_languages(dir: &Path) -> Vec<String> {
    let mut langs: Vec<String> = fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|e| e.path())
                .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
                .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
                .collect()
        })
        .unwrap_or_default();
    if !langs.iter().any(|l| l == "en") {
        langs.push("en".to_string());
    }
    langs.sort();
    langs.dedup();
    langs
}

fn table_path(dir: &Path, language: &str) -> PathBuf {
    dir.join(format!("{language}.json"))
}

fn builtin_table() -> HashMap<String, String> {
    BUILTIN_EN.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn read_table(path: &Path) -> Result<HashMap<String, String>, String> {
    let data = fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let value: Value = serde_json::from_str(&data).map_err(|e| format!("{}: {e}", path.display()))?;
    let mut out = HashMap::new();
    flatten("", &value, &mut out);
    Ok(out)
}

fn flatten(prefix: &str, value: &Value, out: &mut HashMap<String, String>) {
    let join = |key: &str| if prefix.is_empty() { key.to_string() } else { format!("{prefix}.{key}") };
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                flatten(&join(k), v, out);
            }
        }
        Value::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
        Value::Null => {}
        other => {
            out.insert(prefix.to_string(), other.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, lang: &str, body: &str) {
        fs::write(dir.join(format!("{lang}.json")), body).unwrap();
    }

    #[test]
    fn nested_keys_flatten_and_fall_back_per_key() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "en", r#"{"hub": {"open": "Go"}, "only": {"en": "english"}}"#);
        write(dir.path(), "de", r#"{"hub": {"open": "Öffnen"}}"#);
        let loc = Localization::load(dir.path(), "de", "en");
        assert_eq!(loc.language(), "de");
        assert_eq!(loc.tr("hub.open"), "Öffnen");
        assert_eq!(loc.tr("only.en"), "english");
        assert_eq!(loc.tr("nav.hub"), "Hub");
        assert_eq!(loc.get("missing.key", "literal"), "literal");
    }

    #[test]
    fn broken_language_keeps_fallback() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "fr", "{ nope");
        let loc = Localization::load(dir.path(), "fr", "en");
        assert_eq!(loc.language(), "en");
        assert_eq!(loc.tr("hero.launch"), "Launch");
    }

    #[test]
    fn plurals_and_placeholders() {
        let loc = Localization::builtin();
        assert_eq!(loc.plural("hub.destinations", 1), "1 destination");
        assert_eq!(loc.plural("hub.destinations", 3), "3 destinations");
        assert_eq!(loc.format("status.added", &[("name", "true")]), "Added true");
    }

    #[test]
    fn languages_are_listed_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "pt", "{}");
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        assert_eq!(available_languages(dir.path()), vec!["en".to_string(), "pt".to_string()]);
    }
}
