use crate::coords::{Rect, Vec2};
use crate::paint::Color;
use crate::text::FontId;

use super::{Border, DrawCmd, TriangleDir};

/// Paint layer. Higher layers draw on top.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ZIndex(pub i32);

/// A recorded command with its ordering key and inherited clip.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub z: ZIndex,
    pub order: u32,
    pub cmd: DrawCmd,
    /// Logical clip; `None` draws everywhere.
    pub clip_rect: Option<Rect>,
}

/// Draw stream for one frame.
///
/// `push` is O(1); paint-order iteration sorts an index buffer that is
/// reused across frames.
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
    next_order: u32,
    sorted: Vec<usize>,
    sorted_dirty: bool,
    clip_stack: Vec<Rect>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops recorded items and clips, keeping allocations.
    pub fn clear(&mut self) {
        self.items.clear();
        self.next_order = 0;
        self.sorted.clear();
        self.sorted_dirty = true;
        self.clip_stack.clear();
    }

    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, z: ZIndex, cmd: DrawCmd) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);
        self.items.push(DrawItem {
            z,
            order,
            cmd,
            clip_rect: self.clip_stack.last().copied(),
        });
        self.sorted_dirty = true;
    }

    /// Starts a clip region, intersected with the enclosing one.
    /// Must be balanced with [`pop_clip`](Self::pop_clip).
    pub fn push_clip(&mut self, rect: Rect) {
        let effective = match self.clip_stack.last() {
            None => rect,
            Some(&parent) => parent.intersect(rect).unwrap_or(Rect::zero()),
        };
        self.clip_stack.push(effective);
    }

    pub fn pop_clip(&mut self) {
        debug_assert!(!self.clip_stack.is_empty(), "pop_clip without push_clip");
        self.clip_stack.pop();
    }

    /// Items back-to-front.
    pub fn iter_in_paint_order(&mut self) -> impl Iterator<Item = &DrawItem> {
        if self.sorted_dirty {
            self.sorted.clear();
            self.sorted.extend(0..self.items.len());
            let items = &self.items;
            self.sorted.sort_by_key(|&i| (items[i].z, items[i].order));
            self.sorted_dirty = false;
        }
        self.sorted.iter().map(|&i| &self.items[i])
    }

    // ── shape helpers ─────────────────────────────────────────────────────

    pub fn push_rect(&mut self, z: ZIndex, rect: Rect, color: Color) {
        self.push(z, DrawCmd::Rect { rect, color, radius: 0.0, border: None });
    }

    pub fn push_rounded_rect(
        &mut self,
        z: ZIndex,
        rect: Rect,
        radius: f32,
        color: Color,
        border: Option<Border>,
    ) {
        let radius = radius.clamp(0.0, rect.size.x.min(rect.size.y) * 0.5);
        self.push(z, DrawCmd::Rect { rect, color, radius, border });
    }

    pub fn push_circle(
        &mut self,
        z: ZIndex,
        center: Vec2,
        radius: f32,
        color: Color,
        border: Option<Border>,
    ) {
        if radius > 0.0 {
            self.push(z, DrawCmd::Circle { center, radius, color, border });
        }
    }

    pub fn push_triangle(&mut self, z: ZIndex, rect: Rect, dir: TriangleDir, color: Color) {
        self.push(z, DrawCmd::Triangle { rect, dir, color });
    }

    pub fn push_text(
        &mut self,
        z: ZIndex,
        text: impl Into<String>,
        font: FontId,
        size: f32,
        color: Color,
        origin: Vec2,
    ) {
        let text = text.into();
        if !text.is_empty() {
            self.push(z, DrawCmd::Text { text, font, size, color, origin });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_cmd(x: f32) -> DrawCmd {
        DrawCmd::Rect { rect: Rect::new(x, 0.0, 1.0, 1.0), color: Color::WHITE, radius: 0.0, border: None }
    }

    #[test]
    fn paint_order_is_z_then_insertion() {
        let mut dl = DrawList::new();
        dl.push(ZIndex(1), rect_cmd(0.0));
        dl.push(ZIndex(0), rect_cmd(1.0));
        dl.push(ZIndex(1), rect_cmd(2.0));

        let xs: Vec<f32> = dl
            .iter_in_paint_order()
            .filter_map(|it| it.cmd.bounds().map(|b| b.origin.x))
            .collect();
        assert_eq!(xs, vec![1.0, 0.0, 2.0]);
    }

    #[test]
    fn nested_clips_intersect() {
        let mut dl = DrawList::new();
        dl.push_clip(Rect::new(0.0, 0.0, 100.0, 100.0));
        dl.push_clip(Rect::new(50.0, 50.0, 100.0, 100.0));
        dl.push(ZIndex(0), rect_cmd(0.0));
        dl.pop_clip();
        dl.push(ZIndex(0), rect_cmd(0.0));
        dl.pop_clip();
        dl.push(ZIndex(0), rect_cmd(0.0));

        let clips: Vec<_> = dl.items().iter().map(|i| i.clip_rect).collect();
        assert_eq!(clips[0], Some(Rect::new(50.0, 50.0, 50.0, 50.0)));
        assert_eq!(clips[1], Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
        assert_eq!(clips[2], None);
    }

    #[test]
    fn disjoint_clip_becomes_empty() {
        let mut dl = DrawList::new();
        dl.push_clip(Rect::new(0.0, 0.0, 10.0, 10.0));
        dl.push_clip(Rect::new(20.0, 20.0, 10.0, 10.0));
        dl.push(ZIndex(0), rect_cmd(0.0));
        assert!(dl.items()[0].clip_rect.is_some_and(|c| c.is_empty()));
    }

    #[test]
    fn degenerate_shapes_are_skipped() {
        let mut dl = DrawList::new();
        dl.push_circle(ZIndex(0), Vec2::zero(), 0.0, Color::WHITE, None);
        dl.push_text(ZIndex(0), "", FontId(0), 12.0, Color::WHITE, Vec2::zero());
        assert!(dl.is_empty());
    }

    #[test]
    fn rounded_radius_is_capped() {
        let mut dl = DrawList::new();
        dl.push_rounded_rect(ZIndex(0), Rect::new(0.0, 0.0, 10.0, 4.0), 9.0, Color::WHITE, None);
        match &dl.items()[0].cmd {
            DrawCmd::Rect { radius, .. } => assert_eq!(*radius, 2.0),
            other => panic!("unexpected {other:?}"),
        }
    }
}
