//! CPU rasterizer for [`DisplayList`]s: shapes through tiny-skia, glyphs
//! through fontdue coverage maps blended straight into the pixmap.

use std::collections::HashMap;
use std::sync::Arc;

use colony_core::{Command, DisplayList, FontRole, GradientAxis, Rect, Rgba, TextRun};
use colony_text::FontSet;
use fontdue::Metrics;
use tiny_skia::{
    Color, FillRule, GradientStop, LinearGradient, Mask, Paint, Path, PathBuilder, Pixmap, Point, Shader,
    SpreadMode, Stroke, Transform,
};
use tracing::debug;

/// Glyph cache entries kept before the cache is dropped wholesale.
const GLYPH_CACHE_LIMIT: usize = 4096;

fn skia_color(c: Rgba) -> Color {
    Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn skia_rect(r: Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_xywh(r.x, r.y, r.w, r.h)
}

/// Rectangle path with quadratic corners; `radius` is clamped to half the
/// shorter side.
pub fn rounded_rect_path(r: Rect, radius: f32) -> Option<Path> {
    let radius = radius.min(r.w * 0.5).min(r.h * 0.5).max(0.0);
    if radius <= 0.0 {
        return skia_rect(r).map(PathBuilder::from_rect);
    }
    let (x0, y0, x1, y1) = (r.x, r.y, r.right(), r.bottom());
    let mut pb = PathBuilder::new();
    pb.move_to(x0 + radius, y0);
    pb.line_to(x1 - radius, y0);
    pb.quad_to(x1, y0, x1, y0 + radius);
    pb.line_to(x1, y1 - radius);
    pb.quad_to(x1, y1, x1 - radius, y1);
    pb.line_to(x0 + radius, y1);
    pb.quad_to(x0, y1, x0, y1 - radius);
    pb.line_to(x0, y0 + radius);
    pb.quad_to(x0, y0, x0 + radius, y0);
    pb.close();
    pb.finish()
}

/// Blend one coverage value of straight-alpha `color` over a premultiplied
/// RGBA pixel.
pub fn blend_coverage(dst: &mut [u8], color: Rgba, coverage: u8) {
    let sa = (color.a as u32 * coverage as u32 + 127) / 255;
    if sa == 0 {
        return;
    }
    let inv = 255 - sa;
    let mix = |s: u8, d: u8| ((s as u32 * sa + d as u32 * inv + 127) / 255) as u8;
    dst[0] = mix(color.r, dst[0]);
    dst[1] = mix(color.g, dst[1]);
    dst[2] = mix(color.b, dst[2]);
    dst[3] = ((sa * 255 + dst[3] as u32 * inv + 127) / 255) as u8;
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct GlyphKey {
    role: FontRole,
    ch: char,
    size_bits: u32,
}

/// Owns the frame pixmap and glyph cache across frames.
pub struct Rasterizer {
    fonts: Arc<FontSet>,
    pixmap: Option<Pixmap>,
    glyphs: HashMap<GlyphKey, (Metrics, Vec<u8>)>,
    masks: HashMap<[u32; 4], Mask>,
}

impl Rasterizer {
    pub fn new(fonts: Arc<FontSet>) -> Self {
        Self { fonts, pixmap: None, glyphs: HashMap::new(), masks: HashMap::new() }
    }

    /// Draw `list` into a pixmap sized to its viewport. Returns `None` for a
    /// zero-sized viewport.
    pub fn render(&mut self, list: &DisplayList) -> Option<&Pixmap> {
        let (w, h) = (list.viewport.width, list.viewport.height);
        let resize = self.pixmap.as_ref().is_none_or(|p| p.width() != w || p.height() != h);
        if resize {
            self.pixmap = Some(Pixmap::new(w, h)?);
            debug!(w, h, "resized raster target");
        }
        self.masks.clear();
        let mut pixmap = self.pixmap.take()?;
        pixmap.fill(list.clear.map(skia_color).unwrap_or(Color::BLACK));

        for resolved in list.resolve() {
            let clip = resolved.clip;
            match resolved.command {
                Command::FillRect { rect, color, radius, .. } => {
                    let paint = solid(*color);
                    self.fill_shape(&mut pixmap, *rect, *radius, &paint, clip);
                }
                Command::FillGradient { rect, from, to, axis, radius, .. } => {
                    let end = match axis {
                        GradientAxis::Horizontal => Point::from_xy(rect.right(), rect.y),
                        GradientAxis::Vertical => Point::from_xy(rect.x, rect.bottom()),
                    };
                    let shader = LinearGradient::new(
                        Point::from_xy(rect.x, rect.y),
                        end,
                        vec![GradientStop::new(0.0, skia_color(*from)), GradientStop::new(1.0, skia_color(*to))],
                        SpreadMode::Pad,
                        Transform::identity(),
                    );
                    // Degenerate gradients collapse to their start color.
                    let paint = match shader {
                        Some(shader) => Paint { shader, anti_alias: true, ..Paint::default() },
                        None => solid(*from),
                    };
                    self.fill_shape(&mut pixmap, *rect, *radius, &paint, clip);
                }
                Command::StrokeRect { rect, color, width, radius, .. } => {
                    let inset = rect.inset(width * 0.5, width * 0.5);
                    let Some(path) = rounded_rect_path(inset, *radius) else { continue };
                    let stroke = Stroke { width: *width, ..Stroke::default() };
                    let mask = self.clip_mask(&pixmap, clip);
                    pixmap.stroke_path(&path, &solid(*color), &stroke, Transform::identity(), mask);
                }
                Command::Text { run, .. } => self.draw_text(&mut pixmap, run, clip),
                Command::PushClip(_) | Command::PopClip => {}
            }
        }
        self.pixmap = Some(pixmap);
        self.pixmap.as_ref()
    }

    fn fill_shape(&mut self, pixmap: &mut Pixmap, rect: Rect, radius: f32, paint: &Paint<'_>, clip: Option<Rect>) {
        if radius <= 0.0 {
            // Axis-aligned clips on plain rects reduce to an intersection.
            let rect = match clip {
                Some(c) => match rect.intersect(&c) {
                    Some(r) => r,
                    None => return,
                },
                None => rect,
            };
            if let Some(r) = skia_rect(rect) {
                pixmap.fill_rect(r, paint, Transform::identity(), None);
            }
            return;
        }
        let Some(path) = rounded_rect_path(rect, radius) else { return };
        let mask = self.clip_mask(pixmap, clip);
        pixmap.fill_path(&path, paint, FillRule::Winding, Transform::identity(), mask);
    }

    fn clip_mask(&mut self, pixmap: &Pixmap, clip: Option<Rect>) -> Option<&Mask> {
        let clip = clip?;
        let key = [clip.x.to_bits(), clip.y.to_bits(), clip.w.to_bits(), clip.h.to_bits()];
        if !self.masks.contains_key(&key) {
            let mut mask = Mask::new(pixmap.width(), pixmap.height())?;
            if let Some(path) = skia_rect(clip).map(PathBuilder::from_rect) {
                mask.fill_path(&path, FillRule::Winding, false, Transform::identity());
            }
            self.masks.insert(key, mask);
        }
        self.masks.get(&key)
    }

    fn draw_text(&mut self, pixmap: &mut Pixmap, run: &TextRun, clip: Option<Rect>) {
        let Some(font) = self.fonts.face(run.role) else { return };
        let bounds = Rect::new(0.0, 0.0, pixmap.width() as f32, pixmap.height() as f32);
        let Some(bounds) = clip.map_or(Some(bounds), |c| c.intersect(&bounds)) else { return };
        let ascent = font.horizontal_line_metrics(run.size).map(|m| m.ascent).unwrap_or(run.size * 0.8);
        let baseline = run.pos[1] + ascent;
        let width = pixmap.width() as i32;

        if self.glyphs.len() > GLYPH_CACHE_LIMIT {
            self.glyphs.clear();
        }

        let mut pen_x = run.pos[0];
        let mut prev: Option<char> = None;
        for ch in run.text.chars() {
            if let Some(p) = prev {
                pen_x += font.horizontal_kern(p, ch, run.size).unwrap_or(0.0);
            }
            prev = Some(ch);
            let key = GlyphKey { role: run.role, ch, size_bits: run.size.to_bits() };
            let (metrics, coverage) = self.glyphs.entry(key).or_insert_with(|| font.rasterize(ch, run.size));
            let gx = (pen_x + metrics.xmin as f32).round() as i32;
            let gy = (baseline - metrics.height as f32 - metrics.ymin as f32).round() as i32;
            pen_x += metrics.advance_width;

            let data = pixmap.data_mut();
            for row in 0..metrics.height as i32 {
                let py = gy + row;
                if (py as f32) < bounds.y || (py as f32) >= bounds.bottom() {
                    continue;
                }
                for col in 0..metrics.width as i32 {
                    let px = gx + col;
                    if (px as f32) < bounds.x || (px as f32) >= bounds.right() {
                        continue;
                    }
                    let cov = coverage[(row as usize) * metrics.width + col as usize];
                    if cov == 0 {
                        continue;
                    }
                    let idx = ((py * width + px) * 4) as usize;
                    blend_coverage(&mut data[idx..idx + 4], run.color, cov);
                }
            }
        }
    }
}

fn solid(color: Rgba) -> Paint<'static> {
    Paint { shader: Shader::SolidColor(skia_color(color)), anti_alias: true, ..Paint::default() }
}

/// Pack an opaque pixmap into softbuffer's `0x00RRGGBB` layout.
pub fn copy_to_xrgb(pixmap: &Pixmap, out: &mut [u32]) {
    for (dst, px) in out.iter_mut().zip(pixmap.pixels()) {
        *dst = Rgba::rgb(px.red(), px.green(), px.blue()).to_xrgb_u32();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colony_core::Viewport;

    fn pixel(p: &Pixmap, x: u32, y: u32) -> Rgba {
        let px = p.pixel(x, y).unwrap();
        Rgba::rgba(px.red(), px.green(), px.blue(), px.alpha())
    }

    fn list(commands: Vec<Command>) -> DisplayList {
        DisplayList { viewport: Viewport { width: 40, height: 20 }, clear: Some(Rgba::BLACK), commands }
    }

    #[test]
    fn fill_rect_respects_clip() {
        let red = Rgba::rgb(255, 0, 0);
        let dl = list(vec![
            Command::PushClip(Rect::new(0.0, 0.0, 10.0, 20.0)),
            Command::FillRect { rect: Rect::new(0.0, 0.0, 40.0, 20.0), color: red, radius: 0.0, z: 0 },
            Command::PopClip,
        ]);
        let mut r = Rasterizer::new(Arc::new(FontSet::empty()));
        let p = r.render(&dl).unwrap();
        assert_eq!(pixel(p, 5, 5), red);
        assert_eq!(pixel(p, 20, 5), Rgba::BLACK);
    }

    #[test]
    fn higher_z_paints_last() {
        let a = Rgba::rgb(0, 255, 0);
        let b = Rgba::rgb(0, 0, 255);
        let whole = Rect::new(0.0, 0.0, 40.0, 20.0);
        let dl = list(vec![
            Command::FillRect { rect: whole, color: b, radius: 0.0, z: 5 },
            Command::FillRect { rect: whole, color: a, radius: 0.0, z: 1 },
        ]);
        let mut r = Rasterizer::new(Arc::new(FontSet::empty()));
        assert_eq!(pixel(r.render(&dl).unwrap(), 20, 10), b);
    }

    #[test]
    fn coverage_blend_is_linear_in_alpha() {
        let mut px = [0u8, 0, 0, 255];
        blend_coverage(&mut px, Rgba::WHITE, 255);
        assert_eq!(px, [255, 255, 255, 255]);
        let mut half = [0u8, 0, 0, 255];
        blend_coverage(&mut half, Rgba::WHITE, 128);
        assert_eq!(half[0], 128);
        let mut none = [7u8, 7, 7, 255];
        blend_coverage(&mut none, Rgba::WHITE, 0);
        assert_eq!(none, [7, 7, 7, 255]);
    }

    #[test]
    fn zero_viewport_renders_nothing() {
        let dl = DisplayList { viewport: Viewport { width: 0, height: 10 }, ..DisplayList::default() };
        let mut r = Rasterizer::new(Arc::new(FontSet::empty()));
        assert!(r.render(&dl).is_none());
    }

    #[test]
    fn rounded_path_clamps_radius() {
        assert!(rounded_rect_path(Rect::new(0.0, 0.0, 10.0, 4.0), 50.0).is_some());
        assert!(rounded_rect_path(Rect::new(0.0, 0.0, 0.0, 0.0), 0.0).is_none());
    }
}
