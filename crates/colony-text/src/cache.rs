//! Layout caches so unchanged labels are not re-measured every frame.

use std::collections::HashMap;
use std::sync::Arc;

use colony_core::FontRole;

use crate::measure::{TextMeasurer, TextStyle};
use crate::wrap::wrap_text_to_width;

/// Wrapped lines plus the metrics needed to place them.
#[derive(Clone, Debug, PartialEq)]
pub struct WrappedBlock {
    pub lines: Vec<String>,
    pub line_height: f32,
    /// Widest measured line.
    pub width: f32,
    pub height: f32,
}

impl WrappedBlock {
    fn build(measurer: &dyn TextMeasurer, style: TextStyle, text: &str, max_width: f32) -> Self {
        let lines = wrap_text_to_width(Some(measurer), style, text, max_width);
        let line_height = measurer.line_height(style);
        let width = lines
            .iter()
            .map(|l| measurer.measure(style, l))
            .fold(0.0f32, f32::max);
        let height = lines.len() as f32 * line_height;
        Self { lines, line_height, width, height }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct WrapKey {
    text: String,
    role: FontRole,
    size_bits: u32,
    width_bits: u32,
}

impl WrapKey {
    fn new(style: TextStyle, text: &str, max_width: f32) -> Self {
        Self {
            text: text.to_string(),
            role: style.role,
            size_bits: style.size.to_bits(),
            width_bits: max_width.to_bits(),
        }
    }
}

/// Shared wrap cache keyed by `(text, style, width)`.
pub struct WrapCache {
    entries: HashMap<WrapKey, Arc<WrappedBlock>>,
    max_entries: usize,
    hits: u64,
    misses: u64,
}

impl WrapCache {
    pub fn new(max_entries: usize) -> Self {
        Self { entries: HashMap::new(), max_entries: max_entries.max(1), hits: 0, misses: 0 }
    }

    pub fn get_or_wrap(
        &mut self,
        measurer: &dyn TextMeasurer,
        style: TextStyle,
        text: &str,
        max_width: f32,
    ) -> Arc<WrappedBlock> {
        let key = WrapKey::new(style, text, max_width);
        if let Some(found) = self.entries.get(&key) {
            self.hits += 1;
            return found.clone();
        }
        self.misses += 1;
        if self.entries.len() >= self.max_entries * 2 {
            // Evict down to capacity; order is arbitrary but bounded.
            let excess = self.entries.len() - self.max_entries;
            let doomed: Vec<WrapKey> = self.entries.keys().take(excess).cloned().collect();
            for k in doomed {
                self.entries.remove(&k);
            }
        }
        let block = Arc::new(WrappedBlock::build(measurer, style, text, max_width));
        self.entries.insert(key, block.clone());
        block
    }

    /// Drop everything; called when the theme or language changes.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

impl Default for WrapCache {
    fn default() -> Self {
        Self::new(256)
    }
}

/// One label's lazily built layout, memoized on its wrap width.
#[derive(Clone, Debug)]
pub struct CachedLabel {
    text: String,
    style: TextStyle,
    layout: Option<(u32, WrappedBlock)>,
}

impl CachedLabel {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self { text: text.into(), style, layout: None }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> TextStyle {
        self.style
    }

    /// Replace the text; the layout is only discarded when it actually changed.
    pub fn set_text(&mut self, text: &str) {
        if self.text != text {
            self.text = text.to_string();
            self.layout = None;
        }
    }

    pub fn set_style(&mut self, style: TextStyle) {
        if self.style != style {
            self.style = style;
            self.layout = None;
        }
    }

    pub fn invalidate(&mut self) {
        self.layout = None;
    }

    pub fn is_laid_out_at(&self, max_width: f32) -> bool {
        matches!(self.layout, Some((bits, _)) if bits == max_width.to_bits())
    }

    pub fn layout(&mut self, measurer: &dyn TextMeasurer, max_width: f32) -> &WrappedBlock {
        let bits = max_width.to_bits();
        if !self.is_laid_out_at(max_width) {
            self.layout = None;
        }
        let (_, block) = self
            .layout
            .get_or_insert_with(|| (bits, WrappedBlock::build(measurer, self.style, &self.text, max_width)));
        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::FixedAdvance;
    use std::cell::Cell;

    struct Counting {
        inner: FixedAdvance,
        calls: Cell<usize>,
    }

    impl TextMeasurer for Counting {
        fn measure(&self, style: TextStyle, text: &str) -> f32 {
            self.calls.set(self.calls.get() + 1);
            self.inner.measure(style, text)
        }
    }

    const STYLE: TextStyle = TextStyle::new(FontRole::Body, 10.0);

    #[test]
    fn cache_hits_skip_measurement() {
        let m = Counting { inner: FixedAdvance::default(), calls: Cell::new(0) };
        let mut cache = WrapCache::new(8);
        let a = cache.get_or_wrap(&m, STYLE, "hello brave new world", 40.0);
        let after_first = m.calls.get();
        let b = cache.get_or_wrap(&m, STYLE, "hello brave new world", 40.0);
        assert_eq!(m.calls.get(), after_first);
        assert_eq!(a, b);
        assert_eq!(cache.stats(), (1, 1));
    }

    #[test]
    fn cache_is_bounded() {
        let m = FixedAdvance::default();
        let mut cache = WrapCache::new(2);
        for i in 0..10 {
            cache.get_or_wrap(&m, STYLE, &format!("label {i}"), 100.0);
        }
        assert!(cache.len() <= 4);
    }

    #[test]
    fn label_relayouts_only_on_width_change() {
        let m = Counting { inner: FixedAdvance::default(), calls: Cell::new(0) };
        let mut label = CachedLabel::new("one two three", STYLE);
        let h1 = label.layout(&m, 40.0).height;
        let calls = m.calls.get();
        let h2 = label.layout(&m, 40.0).height;
        assert_eq!(h1, h2);
        assert_eq!(m.calls.get(), calls);
        assert!(label.is_laid_out_at(40.0));
        label.layout(&m, 400.0);
        assert!(m.calls.get() > calls);
        assert_eq!(label.layout(&m, 400.0).lines.len(), 1);
    }

    #[test]
    fn same_text_keeps_layout() {
        let m = FixedAdvance::default();
        let mut label = CachedLabel::new("abc", STYLE);
        label.layout(&m, 50.0);
        label.set_text("abc");
        assert!(label.is_laid_out_at(50.0));
        label.set_text("abcd");
        assert!(!label.is_laid_out_at(50.0));
    }
}
