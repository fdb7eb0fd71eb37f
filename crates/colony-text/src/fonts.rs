//! Font-role resolution and fontdue-backed measurement.
//!
//! Each role resolves, in order: its own configured path, the shared
//! `font_path`, then a list of system families found through fontdb. Only
//! when every candidate fails is the role reported as unusable.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use colony_core::FontRole;
use fontdb::{Database, Family, Query};
use fontdue::{Font, FontSettings};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::measure::{TextMeasurer, TextStyle};

#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read font file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse font {origin}: {reason}")]
    Parse { origin: String, reason: &'static str },
    #[error("no usable font found for the {0:?} role")]
    NoUsableFont(FontRole),
}

/// Where each role's face should come from.
#[derive(Clone, Debug, Default)]
pub struct FontSources {
    /// Shared override used by any role without its own path.
    pub font_path: Option<PathBuf>,
    pub roles: HashMap<FontRole, PathBuf>,
}

impl FontSources {
    pub fn with_role(mut self, role: FontRole, path: impl Into<PathBuf>) -> Self {
        self.roles.insert(role, path.into());
        self
    }
}

/// System families tried when no explicit path works, most preferred first.
fn fallback_families(role: FontRole) -> &'static [&'static str] {
    match role {
        FontRole::Display | FontRole::Headline => {
            &["Inter Display", "Inter", "Segoe UI Semibold", "Noto Sans", "DejaVu Sans", "Liberation Sans"]
        }
        FontRole::Body => &["Inter", "Segoe UI", "Noto Sans", "DejaVu Sans", "Liberation Sans"],
        FontRole::Ui => &["Inter", "Segoe UI", "Cantarell", "Noto Sans", "DejaVu Sans"],
    }
}

/// One loaded face per role. Roles resolving to the same file share a face.
pub struct FontSet {
    faces: HashMap<FontRole, Arc<Font>>,
}

impl FontSet {
    pub fn load(sources: &FontSources) -> Result<Self, FontError> {
        let mut by_path: HashMap<PathBuf, Arc<Font>> = HashMap::new();
        let mut db: Option<Database> = None;
        let mut faces = HashMap::new();

        for role in FontRole::ALL {
            let explicit = sources.roles.get(&role).into_iter().chain(sources.font_path.as_ref());
            let mut chosen: Option<Arc<Font>> = None;
            for path in explicit {
                if let Some(font) = by_path.get(path) {
                    chosen = Some(font.clone());
                    break;
                }
                match load_file(path) {
                    Ok(font) => {
                        let font = Arc::new(font);
                        by_path.insert(path.clone(), font.clone());
                        chosen = Some(font);
                        break;
                    }
                    Err(error) => warn!(%error, ?role, "configured font unusable; trying next candidate"),
                }
            }

            if chosen.is_none() {
                let db = db.get_or_insert_with(|| {
                    let mut db = Database::new();
                    db.load_system_fonts();
                    debug!(faces = db.len(), "loaded system font database");
                    db
                });
                chosen = load_system(db, role).map(Arc::new);
            }

            match chosen {
                Some(font) => {
                    faces.insert(role, font);
                }
                None => return Err(FontError::NoUsableFont(role)),
            }
        }
        info!(roles = faces.len(), "fonts resolved");
        Ok(Self { faces })
    }

    /// Build from an already-parsed face used for every role.
    pub fn single(font: Font) -> Self {
        let font = Arc::new(font);
        let faces = FontRole::ALL.iter().map(|r| (*r, font.clone())).collect();
        Self { faces }
    }

    /// A set with no faces: text measures zero and is never drawn. Used for
    /// headless rendering.
    pub fn empty() -> Self {
        Self { faces: HashMap::new() }
    }

    pub fn face(&self, role: FontRole) -> Option<&Font> {
        self.faces.get(&role).map(|f| f.as_ref())
    }
}

fn load_file(path: &Path) -> Result<Font, FontError> {
    let data = std::fs::read(path).map_err(|source| FontError::Read { path: path.to_path_buf(), source })?;
    Font::from_bytes(data, FontSettings::default())
        .map_err(|reason| FontError::Parse { origin: path.display().to_string(), reason })
}

fn load_system(db: &Database, role: FontRole) -> Option<Font> {
    let named: Vec<Family<'_>> = fallback_families(role).iter().map(|n| Family::Name(*n)).collect();
    let candidates = named.into_iter().map(|f| vec![f]).chain(std::iter::once(vec![Family::SansSerif]));
    for families in candidates {
        let query = Query { families: &families, ..Query::default() };
        let Some(id) = db.query(&query) else { continue };
        let parsed = db.with_face_data(id, |data, index| {
            let settings = FontSettings { collection_index: index, ..FontSettings::default() };
            Font::from_bytes(data, settings)
        });
        match parsed {
            Some(Ok(font)) => return Some(font),
            Some(Err(reason)) => warn!(reason, ?role, "system font failed to parse"),
            None => {}
        }
    }
    None
}

impl TextMeasurer for FontSet {
    fn measure(&self, style: TextStyle, text: &str) -> f32 {
        let Some(font) = self.face(style.role) else {
            return 0.0;
        };
        let mut width = 0.0;
        let mut prev: Option<char> = None;
        for ch in text.chars() {
            if let Some(p) = prev {
                width += font.horizontal_kern(p, ch, style.size).unwrap_or(0.0);
            }
            width += font.metrics(ch, style.size).advance_width;
            prev = Some(ch);
        }
        width
    }

    fn line_height(&self, style: TextStyle) -> f32 {
        self.face(style.role)
            .and_then(|f| f.horizontal_line_metrics(style.size))
            .map(|m| m.new_line_size)
            .unwrap_or(style.size * 1.3)
    }

    fn ascent(&self, style: TextStyle) -> f32 {
        self.face(style.role)
            .and_then(|f| f.horizontal_line_metrics(style.size))
            .map(|m| m.ascent)
            .unwrap_or(style.size * 0.8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_configured_file_reports_read_error() {
        let err = load_file(Path::new("/definitely/not/here.ttf")).unwrap_err();
        assert!(matches!(err, FontError::Read { .. }));
    }

    #[test]
    fn garbage_file_reports_parse_error() {
        let dir = std::env::temp_dir().join(format!("colony-font-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.ttf");
        std::fs::write(&path, b"not a font").unwrap();
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, FontError::Parse { .. }));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn every_role_has_fallback_families() {
        for role in FontRole::ALL {
            assert!(!fallback_families(role).is_empty());
        }
    }
}
