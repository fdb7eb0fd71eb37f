//! colony-core: geometry, colors, display lists and hit testing shared by
//! every launcher panel.
//!
//! Panels never talk to a rendering backend directly. They record drawing
//! commands into a [`Painter`] and interactive rectangles into a
//! [`HitIndex`]; the window host rasterizes the finished [`DisplayList`].

mod color;
mod display_list;
mod geometry;
mod hit_test;
mod painter;

pub use color::*;
pub use display_list::*;
pub use geometry::*;
pub use hit_test::*;
pub use painter::*;
