use crate::color::Rgba;
use crate::geometry::Rect;

/// Output surface size in physical pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Which configured face a run of text is drawn with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontRole {
    Display,
    Headline,
    Body,
    #[default]
    Ui,
}

impl FontRole {
    pub const ALL: [FontRole; 4] = [FontRole::Display, FontRole::Headline, FontRole::Body, FontRole::Ui];
}

/// One line of text. `pos` is the top-left of the line box; the rasterizer
/// derives the baseline from the face's ascent.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub pos: [f32; 2],
    pub size: f32,
    pub color: Rgba,
    pub role: FontRole,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GradientAxis {
    Horizontal,
    Vertical,
}

/// All geometry is stored in absolute surface coordinates; the painter has
/// already applied any scroll offset.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    FillRect { rect: Rect, color: Rgba, radius: f32, z: i32 },
    FillGradient { rect: Rect, from: Rgba, to: Rgba, axis: GradientAxis, radius: f32, z: i32 },
    StrokeRect { rect: Rect, color: Rgba, width: f32, radius: f32, z: i32 },
    Text { run: TextRun, z: i32 },
    PushClip(Rect),
    PopClip,
}

impl Command {
    pub fn z(&self) -> Option<i32> {
        match self {
            Command::FillRect { z, .. }
            | Command::FillGradient { z, .. }
            | Command::StrokeRect { z, .. }
            | Command::Text { z, .. } => Some(*z),
            Command::PushClip(_) | Command::PopClip => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct DisplayList {
    pub viewport: Viewport,
    pub clear: Option<Rgba>,
    pub commands: Vec<Command>,
}

/// A drawable command paired with the clip that was active when it was
/// recorded.
#[derive(Clone, Debug)]
pub struct ResolvedCommand<'a> {
    pub command: &'a Command,
    pub clip: Option<Rect>,
}

impl DisplayList {
    /// Flatten clip push/pop pairs and return drawables in paint order:
    /// ascending z, recording order within the same z.
    pub fn resolve(&self) -> Vec<ResolvedCommand<'_>> {
        let mut clips: Vec<Rect> = Vec::new();
        let mut out = Vec::with_capacity(self.commands.len());
        for cmd in &self.commands {
            match cmd {
                Command::PushClip(rect) => {
                    let next = match clips.last() {
                        Some(outer) => outer.intersect(rect).unwrap_or(Rect::ZERO),
                        None => *rect,
                    };
                    clips.push(next);
                }
                Command::PopClip => {
                    let _ = clips.pop();
                }
                _ => out.push(ResolvedCommand { command: cmd, clip: clips.last().copied() }),
            }
        }
        // sort_by_key is stable, so recording order survives within a z
        out.sort_by_key(|r| r.command.z().unwrap_or(0));
        out
    }
}
