use crate::geometry::Rect;
use crate::painter::Painter;

/// A hit target recorded during a frame.
#[derive(Clone, Debug)]
pub struct HitItem<T> {
    /// Increasing record-order identifier within the frame.
    pub id: usize,
    /// Larger is visually on top.
    pub z: i32,
    /// Absolute rectangle of the target.
    pub rect: Rect,
    /// Clip that was active when the target was recorded.
    pub clip: Option<Rect>,
    pub target: T,
}

/// Flat list of interactive rectangles, resolved topmost-first. Panels fill
/// it while painting; the input router queries it on the next event.
#[derive(Clone, Debug)]
pub struct HitIndex<T> {
    items: Vec<HitItem<T>>,
}

impl<T> Default for HitIndex<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Clone> HitIndex<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Record a rectangle already expressed in absolute coordinates.
    pub fn push(&mut self, rect: Rect, clip: Option<Rect>, z: i32, target: T) {
        if rect.is_empty() {
            return;
        }
        if let Some(c) = clip
            && rect.intersect(&c).is_none()
        {
            // Fully scrolled out of view.
            return;
        }
        let id = self.items.len();
        self.items.push(HitItem { id, z, rect, clip, target });
    }

    /// Record a rectangle in the painter's current offset space, inheriting
    /// its active clip.
    pub fn record(&mut self, painter: &Painter, rect: Rect, z: i32, target: T) {
        let abs = painter.current_offset().apply_rect(rect);
        self.push(abs, painter.current_clip(), z, target);
    }

    /// Topmost target under `pos`: highest z wins, later records break ties.
    pub fn topmost_at(&self, pos: [f32; 2]) -> Option<&HitItem<T>> {
        self.topmost_where(pos, |_| true)
    }

    /// Like [`topmost_at`](Self::topmost_at), considering only targets
    /// accepted by `pred`.
    pub fn topmost_where(&self, pos: [f32; 2], pred: impl Fn(&T) -> bool) -> Option<&HitItem<T>> {
        let [x, y] = pos;
        self.items
            .iter()
            .filter(|it| it.rect.contains(x, y))
            .filter(|it| it.clip.is_none_or(|c| c.contains(x, y)))
            .filter(|it| pred(&it.target))
            .max_by(|a, b| a.z.cmp(&b.z).then(a.id.cmp(&b.id)))
    }

    pub fn target_at(&self, pos: [f32; 2]) -> Option<T> {
        self.topmost_at(pos).map(|it| it.target.clone())
    }

    /// Rectangle of the first recorded item matching `pred`.
    pub fn rect_of(&self, pred: impl Fn(&T) -> bool) -> Option<Rect> {
        self.items.iter().find(|it| pred(&it.target)).map(|it| it.rect)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HitItem<T>> {
        self.items.iter()
    }

    pub fn extend(&mut self, other: HitIndex<T>) {
        for it in other.items {
            self.push(it.rect, it.clip, it.z, it.target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display_list::Viewport;
    use crate::geometry::Offset;

    #[test]
    fn higher_z_wins_then_later_record() {
        let mut idx = HitIndex::new();
        idx.push(Rect::new(0.0, 0.0, 100.0, 100.0), None, 0, "row");
        idx.push(Rect::new(80.0, 0.0, 20.0, 20.0), None, 5, "close");
        idx.push(Rect::new(0.0, 0.0, 100.0, 100.0), None, 0, "row2");
        assert_eq!(idx.target_at([90.0, 10.0]), Some("close"));
        assert_eq!(idx.target_at([10.0, 50.0]), Some("row2"));
        assert_eq!(idx.target_at([150.0, 50.0]), None);
    }

    #[test]
    fn clipped_region_is_not_hit_outside_clip() {
        let mut p = Painter::begin_frame(Viewport::default());
        p.push_clip_rect(Rect::new(0.0, 0.0, 100.0, 50.0));
        p.push_offset(Offset::new(0.0, -30.0));
        let mut idx = HitIndex::new();
        idx.record(&p, Rect::new(0.0, 60.0, 100.0, 40.0), 1, 7u32);
        // absolute rect is y=30..70 but clip stops at 50
        assert_eq!(idx.target_at([10.0, 40.0]), Some(7));
        assert_eq!(idx.target_at([10.0, 60.0]), None);
    }

    #[test]
    fn fully_clipped_items_are_skipped() {
        let mut idx = HitIndex::new();
        idx.push(Rect::new(0.0, 200.0, 10.0, 10.0), Some(Rect::new(0.0, 0.0, 10.0, 100.0)), 0, 1);
        assert!(idx.is_empty());
    }

    #[test]
    fn filtered_lookup_skips_rejected_targets() {
        let mut idx = HitIndex::new();
        idx.push(Rect::new(0.0, 0.0, 100.0, 100.0), None, 0, "panel");
        idx.push(Rect::new(0.0, 0.0, 100.0, 100.0), None, 9, "scrim");
        let hit = idx.topmost_where([5.0, 5.0], |t| *t != "scrim").map(|it| it.target);
        assert_eq!(hit, Some("panel"));
    }
}
