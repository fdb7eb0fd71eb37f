//! Per-program label caches, rebuilt wholesale when theme, language or
//! content change.

use std::collections::HashMap;

use colony_core::{FontRole, Rgba};
use colony_text::measure::ellipsize;
use colony_text::{CachedLabel, TextMeasurer, TextStyle};

use crate::content::AppContent;
use crate::theme::{ThemeColors, Typography};

pub struct ProgramVisuals {
    pub title: String,
    pub accent: Rgba,
    pub gradient: (Rgba, Rgba),
    pub tagline: CachedLabel,
    pub paragraphs: Vec<CachedLabel>,
    fitted_title: Option<(u32, String)>,
}

impl ProgramVisuals {
    /// Title shortened to `width`, memoized on the width.
    pub fn fitted_title(&mut self, measurer: &dyn TextMeasurer, style: TextStyle, width: f32) -> &str {
        let key = width.to_bits();
        if self.fitted_title.as_ref().is_none_or(|(k, _)| *k != key) {
            self.fitted_title = Some((key, ellipsize(measurer, style, &self.title, width)));
        }
        self.fitted_title.as_ref().map(|(_, s)| s.as_str()).unwrap_or_default()
    }
}

#[derive(Default)]
pub struct ProgramVisualsCache {
    entries: HashMap<String, ProgramVisuals>,
    generation: u64,
}

impl ProgramVisualsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything and rebuild from `content`.
    pub fn rebuild(&mut self, content: &AppContent, colors: &ThemeColors, typography: &Typography) {
        self.entries.clear();
        self.generation += 1;
        let tagline_style = TextStyle::new(FontRole::Body, typography.body);
        let paragraph_style = TextStyle::new(FontRole::Body, typography.body);
        for (id, view) in &content.programs {
            let accent = view.accent_or(colors.accent);
            let gradient = view.gradient_or((accent.mix(colors.surface, 0.35), colors.surface_alt));
            self.entries.insert(id.clone(), ProgramVisuals {
                title: view.title().to_string(),
                accent,
                gradient,
                tagline: CachedLabel::new(view.tagline.clone(), tagline_style),
                paragraphs: view
                    .paragraphs
                    .iter()
                    .map(|p| CachedLabel::new(p.clone(), paragraph_style))
                    .collect(),
                fitted_title: None,
            });
        }
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut ProgramVisuals> {
        self.entries.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bumped on every rebuild.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
