//! Text measurement, greedy word wrapping and per-label layout caches.

pub mod cache;
pub mod fonts;
pub mod measure;
pub mod wrap;

pub use cache::{CachedLabel, WrapCache, WrappedBlock};
pub use fonts::{FontError, FontSet, FontSources};
pub use measure::{FixedAdvance, TextMeasurer, TextStyle};
pub use wrap::wrap_text_to_width;
