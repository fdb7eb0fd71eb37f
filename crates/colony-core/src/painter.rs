use crate::color::Rgba;
use crate::display_list::{Command, DisplayList, FontRole, GradientAxis, TextRun, Viewport};
use crate::geometry::{Offset, Rect};

/// Immediate-mode recorder. Panels call it once per frame; the result is a
/// [`DisplayList`] handed to the window host.
pub struct Painter {
    list: DisplayList,
    offset_stack: Vec<Offset>,
    clip_stack: Vec<Rect>,
}

impl Painter {
    pub fn begin_frame(viewport: Viewport) -> Self {
        Self {
            list: DisplayList { viewport, clear: None, commands: Vec::new() },
            offset_stack: vec![Offset::IDENTITY],
            clip_stack: Vec::new(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.list.viewport
    }

    pub fn clear(&mut self, color: Rgba) {
        self.list.clear = Some(color);
    }

    pub fn current_offset(&self) -> Offset {
        self.offset_stack.last().copied().unwrap_or(Offset::IDENTITY)
    }

    pub fn push_offset(&mut self, offset: Offset) {
        // Compose with the current offset so nested pushes accumulate.
        let composed = self.current_offset().concat(offset);
        self.offset_stack.push(composed);
    }

    pub fn pop_offset(&mut self) {
        if self.offset_stack.len() > 1 {
            let _ = self.offset_stack.pop();
        }
    }

    /// Clip rects are given in the current (offset) space.
    pub fn push_clip_rect(&mut self, rect: Rect) {
        let abs = self.current_offset().apply_rect(rect);
        self.clip_stack.push(abs);
        self.list.commands.push(Command::PushClip(abs));
    }

    pub fn pop_clip(&mut self) {
        if self.clip_stack.pop().is_some() {
            self.list.commands.push(Command::PopClip);
        }
    }

    /// The innermost active clip in absolute coordinates, if any.
    pub fn current_clip(&self) -> Option<Rect> {
        self.clip_stack.last().copied()
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgba, z: i32) {
        self.fill_rounded_rect(rect, 0.0, color, z);
    }

    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Rgba, z: i32) {
        if rect.is_empty() || color.a == 0 {
            return;
        }
        let rect = self.current_offset().apply_rect(rect);
        self.list.commands.push(Command::FillRect { rect, color, radius, z });
    }

    pub fn fill_gradient(&mut self, rect: Rect, from: Rgba, to: Rgba, axis: GradientAxis, radius: f32, z: i32) {
        if rect.is_empty() {
            return;
        }
        let rect = self.current_offset().apply_rect(rect);
        self.list.commands.push(Command::FillGradient { rect, from, to, axis, radius, z });
    }

    pub fn stroke_rect(&mut self, rect: Rect, width: f32, radius: f32, color: Rgba, z: i32) {
        if rect.is_empty() || width <= 0.0 {
            return;
        }
        let rect = self.current_offset().apply_rect(rect);
        self.list.commands.push(Command::StrokeRect { rect, color, width, radius, z });
    }

    pub fn text(&mut self, pos: [f32; 2], text: impl Into<String>, size: f32, color: Rgba, role: FontRole, z: i32) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        let pos = self.current_offset().apply(pos);
        self.list.commands.push(Command::Text { run: TextRun { text, pos, size, color, role }, z });
    }

    pub fn commands(&self) -> &[Command] {
        &self.list.commands
    }

    pub fn finish(mut self) -> DisplayList {
        // Unbalanced clips would leak into the next panel's paint order.
        while self.clip_stack.pop().is_some() {
            self.list.commands.push(Command::PopClip);
        }
        self.list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_compose_and_apply_to_rects() {
        let mut p = Painter::begin_frame(Viewport { width: 100, height: 100 });
        p.push_offset(Offset::new(10.0, 0.0));
        p.push_offset(Offset::new(0.0, -5.0));
        p.fill_rect(Rect::new(1.0, 1.0, 2.0, 2.0), Rgba::WHITE, 0);
        p.pop_offset();
        p.pop_offset();
        let list = p.finish();
        assert_eq!(
            list.commands[0],
            Command::FillRect { rect: Rect::new(11.0, -4.0, 2.0, 2.0), color: Rgba::WHITE, radius: 0.0, z: 0 }
        );
    }

    #[test]
    fn resolve_orders_by_z_and_tracks_clip() {
        let mut p = Painter::begin_frame(Viewport::default());
        p.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Rgba::BLACK, 10);
        p.push_clip_rect(Rect::new(0.0, 0.0, 50.0, 50.0));
        p.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Rgba::WHITE, 1);
        let list = p.finish();
        let resolved = list.resolve();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].command.z(), Some(1));
        assert_eq!(resolved[0].clip, Some(Rect::new(0.0, 0.0, 50.0, 50.0)));
        assert_eq!(resolved[1].clip, None);
    }

    #[test]
    fn finish_balances_open_clips() {
        let mut p = Painter::begin_frame(Viewport::default());
        p.push_clip_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        let list = p.finish();
        assert_eq!(list.commands.last(), Some(&Command::PopClip));
    }

    #[test]
    fn transparent_and_empty_fills_are_dropped() {
        let mut p = Painter::begin_frame(Viewport::default());
        p.fill_rect(Rect::new(0.0, 0.0, 0.0, 5.0), Rgba::WHITE, 0);
        p.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Rgba::TRANSPARENT, 0);
        p.text([0.0, 0.0], "", 12.0, Rgba::WHITE, FontRole::Ui, 0);
        assert!(p.commands().is_empty());
    }
}
