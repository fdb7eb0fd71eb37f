//! Color schemes, typography and the active-theme manager.

use std::collections::BTreeMap;

use colony_config::{Appearance, CustomSchemeRecord};
use colony_core::Rgba;
use tracing::{debug, warn};

use crate::error::ValidationError;

/// The sixteen semantic color slots every scheme defines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThemeColors {
    pub background: Rgba,
    pub surface: Rgba,
    pub surface_alt: Rgba,
    pub card: Rgba,
    pub card_hover: Rgba,
    pub border: Rgba,
    pub accent: Rgba,
    pub accent_soft: Rgba,
    pub text_primary: Rgba,
    pub text_secondary: Rgba,
    pub text_muted: Rgba,
    pub success: Rgba,
    pub warning: Rgba,
    pub danger: Rgba,
    pub nav_background: Rgba,
    pub hero_overlay: Rgba,
}

/// Named slot with its accessors and label key. Iterated by the custom
/// theme dialog and by (de)serialization of custom schemes.
pub struct ColorField {
    pub name: &'static str,
    pub label_key: &'static str,
    pub get: fn(&ThemeColors) -> Rgba,
    pub get_mut: fn(&mut ThemeColors) -> &mut Rgba,
}

macro_rules! color_fields {
    ($($field:ident),* $(,)?) => {
        pub const COLOR_FIELDS: &[ColorField] = &[
            $(ColorField {
                name: stringify!($field),
                label_key: concat!("theme.field.", stringify!($field)),
                get: {
                    fn get(c: &ThemeColors) -> Rgba {
                        c.$field
                    }
                    get
                },
                get_mut: {
                    fn get_mut(c: &mut ThemeColors) -> &mut Rgba {
                        &mut c.$field
                    }
                    get_mut
                },
            }),*
        ];
    };
}

color_fields!(
    background,
    surface,
    surface_alt,
    card,
    card_hover,
    border,
    accent,
    accent_soft,
    text_primary,
    text_secondary,
    text_muted,
    success,
    warning,
    danger,
    nav_background,
    hero_overlay,
);

impl ThemeColors {
    pub fn field(&self, name: &str) -> Option<Rgba> {
        COLOR_FIELDS.iter().find(|f| f.name == name).map(|f| (f.get)(self))
    }

    pub fn to_hex_map(&self) -> BTreeMap<String, String> {
        COLOR_FIELDS
            .iter()
            .map(|f| (f.name.to_string(), (f.get)(self).to_hex()))
            .collect()
    }

    /// Build from a complete `name -> hex` map.
    pub fn from_hex_map(map: &BTreeMap<String, String>) -> Result<Self, ValidationError> {
        let mut colors = presets::colony_dark().colors;
        for field in COLOR_FIELDS {
            let invalid = || ValidationError::InvalidColor { field: field.name.to_string() };
            let hex = map.get(field.name).ok_or_else(invalid)?;
            *(field.get_mut)(&mut colors) = Rgba::parse_hex(hex.trim()).map_err(|_| invalid())?;
        }
        Ok(colors)
    }
}

/// Pixel sizes per font role.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Typography {
    pub display: f32,
    pub headline: f32,
    pub body: f32,
    pub ui: f32,
}

impl Default for Typography {
    fn default() -> Self {
        Self { display: 34.0, headline: 22.0, body: 15.0, ui: 14.0 }
    }
}

/// Animation durations in seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    pub hover_fade: f32,
    pub panel_slide: f32,
}

impl Default for Motion {
    fn default() -> Self {
        Self { hover_fade: 0.12, panel_slide: 0.22 }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ColorScheme {
    pub id: String,
    pub name: String,
    pub colors: ThemeColors,
    pub typography: Typography,
    pub motion: Motion,
    pub custom: bool,
}

impl ColorScheme {
    pub fn custom(name: &str, colors: ThemeColors) -> Self {
        Self {
            id: format!("custom-{}", slugify(name)),
            name: name.trim().to_string(),
            colors,
            typography: Typography::default(),
            motion: Motion::default(),
            custom: true,
        }
    }

    pub fn to_record(&self) -> CustomSchemeRecord {
        CustomSchemeRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            colors: self.colors.to_hex_map(),
        }
    }

    pub fn from_record(record: &CustomSchemeRecord) -> Result<Self, ValidationError> {
        let colors = ThemeColors::from_hex_map(&record.colors)?;
        let mut scheme = ColorScheme::custom(&record.name, colors);
        if !record.id.is_empty() {
            scheme.id = record.id.clone();
        }
        Ok(scheme)
    }
}

/// Lowercase ASCII slug; runs of other characters collapse to one `-`.
pub fn slugify(name: &str) -> String {
    let mut out = String::new();
    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    if out.is_empty() { "item".to_string() } else { out }
}

pub mod presets {
    use super::*;

    const fn hex(v: u32) -> Rgba {
        Rgba::rgb((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }

    fn builtin(id: &str, name: &str, colors: ThemeColors) -> ColorScheme {
        ColorScheme {
            id: id.to_string(),
            name: name.to_string(),
            colors,
            typography: Typography::default(),
            motion: Motion::default(),
            custom: false,
        }
    }

    pub fn colony_dark() -> ColorScheme {
        builtin("colony-dark", "Colony Dark", ThemeColors {
            background: hex(0x0F1117),
            surface: hex(0x171A23),
            surface_alt: hex(0x1E2230),
            card: hex(0x232838),
            card_hover: hex(0x2C3347),
            border: hex(0x323A50),
            accent: hex(0x5B8CFF),
            accent_soft: hex(0x2A3B66),
            text_primary: hex(0xF2F4F8),
            text_secondary: hex(0xB8BFCF),
            text_muted: hex(0x7A8299),
            success: hex(0x3CCB7F),
            warning: hex(0xF5B83D),
            danger: hex(0xF0555A),
            nav_background: hex(0x12141C),
            hero_overlay: Rgba::rgba(8, 10, 16, 180),
        })
    }

    pub fn colony_light() -> ColorScheme {
        builtin("colony-light", "Colony Light", ThemeColors {
            background: hex(0xF4F5F9),
            surface: hex(0xFFFFFF),
            surface_alt: hex(0xEDEFF5),
            card: hex(0xFFFFFF),
            card_hover: hex(0xE8ECF6),
            border: hex(0xD5DAE6),
            accent: hex(0x2F6BF0),
            accent_soft: hex(0xD6E2FD),
            text_primary: hex(0x151925),
            text_secondary: hex(0x414A60),
            text_muted: hex(0x7C859A),
            success: hex(0x1E9E5A),
            warning: hex(0xC98A12),
            danger: hex(0xD23A3F),
            nav_background: hex(0xE9ECF3),
            hero_overlay: Rgba::rgba(255, 255, 255, 170),
        })
    }

    pub fn aurora() -> ColorScheme {
        builtin("aurora", "Aurora", ThemeColors {
            background: hex(0x0B1416),
            surface: hex(0x102024),
            surface_alt: hex(0x16292E),
            card: hex(0x1A3338),
            card_hover: hex(0x224148),
            border: hex(0x2A4C52),
            accent: hex(0x38E0B0),
            accent_soft: hex(0x1C4F46),
            text_primary: hex(0xE8FBF6),
            text_secondary: hex(0xA9CFC7),
            text_muted: hex(0x6F958E),
            success: hex(0x5EE38A),
            warning: hex(0xF2C35B),
            danger: hex(0xF06A75),
            nav_background: hex(0x0A1113),
            hero_overlay: Rgba::rgba(6, 14, 16, 170),
        })
    }

    pub fn ember() -> ColorScheme {
        builtin("ember", "Ember", ThemeColors {
            background: hex(0x16100E),
            surface: hex(0x201714),
            surface_alt: hex(0x2A1E1A),
            card: hex(0x322420),
            card_hover: hex(0x3E2D27),
            border: hex(0x4A352E),
            accent: hex(0xFF7A3D),
            accent_soft: hex(0x5A2E1C),
            text_primary: hex(0xFBEFE9),
            text_secondary: hex(0xD8B9AC),
            text_muted: hex(0x9A7C70),
            success: hex(0x7BCB6A),
            warning: hex(0xFFC247),
            danger: hex(0xFF5A5F),
            nav_background: hex(0x120C0A),
            hero_overlay: Rgba::rgba(18, 10, 8, 175),
        })
    }

    pub fn all() -> Vec<ColorScheme> {
        vec![colony_dark(), colony_light(), aurora(), ember()]
    }
}

/// Owns every known scheme and the appearance-adjusted active palette.
#[derive(Clone, Debug)]
pub struct ThemeManager {
    schemes: Vec<ColorScheme>,
    active: usize,
    appearance: Appearance,
    effective: ThemeColors,
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeManager {
    pub fn new() -> Self {
        let schemes = presets::all();
        let effective = schemes[0].colors;
        let mut manager = Self { schemes, active: 0, appearance: Appearance::default(), effective };
        manager.refresh();
        manager
    }

    /// Register persisted custom schemes, skipping broken or duplicate ones.
    pub fn load_custom(&mut self, records: &[CustomSchemeRecord]) {
        for record in records {
            match ColorScheme::from_record(record) {
                Ok(scheme) => {
                    if let Err(error) = self.add_scheme(scheme) {
                        warn!(%error, name = %record.name, "skipping custom scheme");
                    }
                }
                Err(error) => warn!(%error, name = %record.name, "skipping custom scheme"),
            }
        }
    }

    pub fn schemes(&self) -> &[ColorScheme] {
        &self.schemes
    }

    pub fn active(&self) -> &ColorScheme {
        &self.schemes[self.active]
    }

    /// The active palette after appearance adjustments.
    pub fn colors(&self) -> &ThemeColors {
        &self.effective
    }

    pub fn appearance(&self) -> Appearance {
        self.appearance
    }

    /// Row-height multiplier from interface density (1.0 comfortable).
    pub fn density_scale(&self) -> f32 {
        1.0 - 0.25 * self.appearance.interface_density
    }

    pub fn set_appearance(&mut self, appearance: Appearance) {
        self.appearance = appearance.clamped();
        self.refresh();
    }

    /// Activate `id`; unknown ids leave the current scheme active.
    pub fn set_active(&mut self, id: &str) -> bool {
        match self.schemes.iter().position(|s| s.id == id) {
            Some(idx) => {
                self.active = idx;
                self.refresh();
                debug!(theme = id, "theme activated");
                true
            }
            None => false,
        }
    }

    pub fn has_name(&self, name: &str) -> bool {
        let name = name.trim();
        self.schemes.iter().any(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Add a scheme; names are unique case-insensitively and ids are made
    /// unique by suffixing.
    pub fn add_scheme(&mut self, mut scheme: ColorScheme) -> Result<&ColorScheme, ValidationError> {
        if scheme.name.trim().is_empty() {
            return Err(ValidationError::NameRequired);
        }
        if self.has_name(&scheme.name) {
            return Err(ValidationError::DuplicateName);
        }
        let base = scheme.id.clone();
        let mut n = 2;
        while self.schemes.iter().any(|s| s.id == scheme.id) {
            scheme.id = format!("{base}-{n}");
            n += 1;
        }
        self.schemes.push(scheme);
        Ok(&self.schemes[self.schemes.len() - 1])
    }

    pub fn custom_records(&self) -> Vec<CustomSchemeRecord> {
        self.schemes.iter().filter(|s| s.custom).map(ColorScheme::to_record).collect()
    }

    fn refresh(&mut self) {
        self.effective = apply_appearance(&self.schemes[self.active].colors, self.appearance);
    }
}

/// Accent intensity pulls accents toward the surface; background depth
/// darkens (depth > 0.5) or lifts (depth < 0.5) the background layers.
pub fn apply_appearance(base: &ThemeColors, appearance: Appearance) -> ThemeColors {
    let mut c = *base;
    let fade = 1.0 - appearance.accent_intensity;
    c.accent = base.accent.mix(base.surface, fade * 0.7);
    c.accent_soft = base.accent_soft.mix(base.surface, fade * 0.7);

    let depth = (appearance.background_depth - 0.5) * 2.0;
    let shift = |color: Rgba| {
        if depth >= 0.0 {
            color.mix(Rgba::BLACK, depth * 0.45)
        } else {
            color.mix(Rgba::WHITE, -depth * 0.12)
        }
    };
    c.background = shift(base.background);
    c.nav_background = shift(base.nav_background);
    c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_table_covers_every_slot_in_order() {
        let names: Vec<_> = COLOR_FIELDS.iter().map(|f| f.name).collect();
        assert_eq!(names, colony_config::SCHEME_COLOR_KEYS.to_vec());
        let dark = presets::colony_dark().colors;
        assert_eq!(dark.field("accent"), Some(dark.accent));
        assert_eq!(dark.field("nope"), None);
    }

    #[test]
    fn hex_map_round_trip() {
        let colors = presets::aurora().colors;
        let back = ThemeColors::from_hex_map(&colors.to_hex_map()).unwrap();
        assert_eq!(back, colors);
    }

    #[test]
    fn bad_hex_names_the_field() {
        let mut map = presets::ember().colors.to_hex_map();
        map.insert("border".into(), "#GG0000".into());
        assert_eq!(
            ThemeColors::from_hex_map(&map),
            Err(ValidationError::InvalidColor { field: "border".into() })
        );
    }

    #[test]
    fn duplicate_names_rejected_case_insensitively() {
        let mut themes = ThemeManager::new();
        let err = themes.add_scheme(ColorScheme::custom("aurora", presets::aurora().colors));
        assert_eq!(err.unwrap_err(), ValidationError::DuplicateName);
        let added = themes.add_scheme(ColorScheme::custom("Night Owl", presets::aurora().colors)).unwrap();
        assert_eq!(added.id, "custom-night-owl");
        assert_eq!(themes.custom_records().len(), 1);
    }

    #[test]
    fn unknown_theme_keeps_current() {
        let mut themes = ThemeManager::new();
        assert!(themes.set_active("ember"));
        assert!(!themes.set_active("missing"));
        assert_eq!(themes.active().id, "ember");
    }

    #[test]
    fn full_accent_intensity_is_identity() {
        let mut themes = ThemeManager::new();
        themes.set_appearance(Appearance { accent_intensity: 1.0, background_depth: 0.5, interface_density: 0.0 });
        assert_eq!(themes.colors(), &presets::colony_dark().colors);
        themes.set_appearance(Appearance { accent_intensity: 0.0, background_depth: 1.0, interface_density: 1.0 });
        assert_ne!(themes.colors().accent, presets::colony_dark().colors.accent);
        assert!(themes.colors().background.relative_luminance() <= presets::colony_dark().colors.background.relative_luminance());
        assert_eq!(themes.density_scale(), 0.75);
    }

    #[test]
    fn slugs_are_stable() {
        assert_eq!(slugify("  Night Owl!! "), "night-owl");
        assert_eq!(slugify("***"), "item");
    }
}
