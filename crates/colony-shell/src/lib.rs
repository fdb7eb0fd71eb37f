//! colony-shell: the launcher's interaction layer.
//!
//! Content, themes and localization are plain data owned by
//! [`Application`]. Each frame the application computes a [`FrameLayout`],
//! lets every panel paint into a [`colony_core::Painter`] and collects the
//! panels' rectangles into a [`FrameHitMap`] that the next click consumes.

pub mod app;
pub mod content;
pub mod dialogs;
pub mod error;
pub mod events;
pub mod layout;
pub mod localization;
pub mod panels;
pub mod router;
pub mod scroll;
pub mod selection;
pub mod theme;
pub mod visuals;

pub use app::{AppOptions, Application, Interface, LaunchCommand};
pub use content::AppContent;
pub use dialogs::{DialogKind, Dialogs};
pub use error::{ContentError, ValidationError};
pub use events::{EventResult, InputEvent, KeyCode, KeyEvent, Modifiers, MouseButton, MouseEvent};
pub use layout::{Divider, FrameLayout, LayoutConstraints, LayoutEngine};
pub use localization::Localization;
pub use router::{FrameHitMap, HitTarget, Layer};
pub use scroll::ScrollViewport;
pub use selection::{NavEntry, Selection, SettingsSection};
pub use theme::{ColorScheme, ThemeColors, ThemeManager};
