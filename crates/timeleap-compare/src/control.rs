//! Boundary control surface: handle, reset button and era labels.
//!
//! Geometry is recomputed from the clip regions every frame, so the
//! surface itself only remembers what the pointer is over.

use timeleap_engine::coords::{Rect, Vec2};
use timeleap_engine::paint::Color;
use timeleap_engine::scene::{Border, DrawList, TriangleDir, ZIndex};
use timeleap_engine::text::{FontId, FontSystem};

use crate::compositor::ClipRegions;
use crate::config::HandleStyle;
use crate::site::SiteContext;
use crate::variant::SceneVariant;

const Z_LINE: ZIndex = ZIndex(0);
const Z_SHAPE: ZIndex = ZIndex(1);
const Z_GLYPH: ZIndex = ZIndex(2);

/// Horizontal and vertical padding inside label pills and the reset button.
const PAD: (f32, f32) = (10.0, 5.0);
/// Width of an average glyph relative to the font size, for sizing pills
/// when no font is loaded.
const FALLBACK_ADVANCE: f32 = 0.55;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ControlHit {
    Handle,
    Reset,
}

/// Where the controls sit for one container and split.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ControlLayout {
    pub container: Rect,
    pub line: Rect,
    pub knob_center: Vec2,
    pub knob_radius: f32,
    pub reset: Rect,
}

impl ControlLayout {
    pub fn new(container: Rect, regions: &ClipRegions, style: &HandleStyle) -> Self {
        let x = regions.split_x();
        let (rw, rh) = style.reset_size;
        Self {
            container,
            line: Rect::new(
                x - style.line_width * 0.5,
                container.origin.y,
                style.line_width,
                container.size.y,
            ),
            knob_center: Vec2::new(x, container.origin.y + container.size.y * 0.5),
            knob_radius: style.knob_radius,
            reset: Rect::new(
                container.right() - style.inset - rw,
                container.bottom() - style.inset - rh,
                rw,
                rh,
            ),
        }
    }

    /// Reset wins over the handle where they overlap. Nothing outside the
    /// container hits.
    pub fn hit_test(&self, p: Vec2, slop: f32) -> Option<ControlHit> {
        if !p.is_finite() || !self.container.contains(p) {
            return None;
        }
        if self.reset.contains(p) {
            return Some(ControlHit::Reset);
        }
        let knob = (p - self.knob_center).length() <= self.knob_radius + slop;
        let line = (p.x - self.knob_center.x).abs() <= self.line.size.x * 0.5 + slop;
        (knob || line).then_some(ControlHit::Handle)
    }
}

/// Per-frame inputs to [`ControlSurface::paint`].
#[derive(Debug, Copy, Clone)]
pub struct OverlayState<'a> {
    pub container: Rect,
    pub regions: ClipRegions,
    pub site: &'a SiteContext,
    pub dragging: bool,
}

#[derive(Debug, Clone)]
pub struct ControlSurface {
    style: HandleStyle,
    hover: Option<ControlHit>,
    line_color: Color,
    knob_color: Color,
    knob_border: Color,
    glyph_color: Color,
    pill_color: Color,
    reset_color: Color,
    reset_hover_color: Color,
    text_color: Color,
}

impl ControlSurface {
    pub fn new(style: HandleStyle) -> Self {
        Self {
            style,
            hover: None,
            line_color: Color::from_straight(1.0, 1.0, 1.0, 0.9),
            knob_color: Color::from_straight(1.0, 1.0, 1.0, 0.95),
            knob_border: Color::from_straight(0.85, 0.55, 0.2, 1.0),
            glyph_color: Color::from_straight(0.3, 0.22, 0.15, 1.0),
            pill_color: Color::from_straight(0.08, 0.07, 0.06, 0.6),
            reset_color: Color::from_straight(0.08, 0.07, 0.06, 0.7),
            reset_hover_color: Color::from_straight(0.85, 0.55, 0.2, 0.9),
            text_color: Color::WHITE,
        }
    }

    pub fn style(&self) -> &HandleStyle {
        &self.style
    }

    pub fn hover(&self) -> Option<ControlHit> {
        self.hover
    }

    /// Returns true if the hover target changed.
    pub fn set_hover(&mut self, hover: Option<ControlHit>) -> bool {
        std::mem::replace(&mut self.hover, hover) != hover
    }

    pub fn layout(&self, container: Rect, regions: &ClipRegions) -> ControlLayout {
        ControlLayout::new(container, regions, &self.style)
    }

    pub fn hit_test(&self, container: Rect, regions: &ClipRegions, p: Vec2) -> Option<ControlHit> {
        self.layout(container, regions).hit_test(p, self.style.hit_slop)
    }

    /// Records the overlay into `dl`, clipped to the container. Each era
    /// label is further clipped to its own scene's region. Text is skipped
    /// when `font` is `None`.
    pub fn paint(
        &self,
        dl: &mut DrawList,
        fonts: &FontSystem,
        font: Option<FontId>,
        state: OverlayState<'_>,
    ) {
        if state.container.is_empty() {
            return;
        }
        let layout = self.layout(state.container, &state.regions);

        dl.push_clip(state.container);

        for variant in SceneVariant::ALL {
            self.paint_label(dl, fonts, font, variant, &state);
        }

        dl.push_rect(Z_LINE, layout.line, self.line_color);

        let active = state.dragging || self.hover == Some(ControlHit::Handle);
        let r = if active { layout.knob_radius + 2.0 } else { layout.knob_radius };
        let c = layout.knob_center;
        dl.push_circle(Z_SHAPE, c, r, self.knob_color, Some(Border::new(2.0, self.knob_border)));

        let (gw, gh) = (r * 0.32, r * 0.55);
        let gap = r * 0.12;
        dl.push_triangle(
            Z_GLYPH,
            Rect::new(c.x - gap - gw, c.y - gh * 0.5, gw, gh),
            TriangleDir::Left,
            self.glyph_color,
        );
        dl.push_triangle(
            Z_GLYPH,
            Rect::new(c.x + gap, c.y - gh * 0.5, gw, gh),
            TriangleDir::Right,
            self.glyph_color,
        );

        let fill = if self.hover == Some(ControlHit::Reset) {
            self.reset_hover_color
        } else {
            self.reset_color
        };
        dl.push_rounded_rect(Z_SHAPE, layout.reset, layout.reset.size.y * 0.5, fill, None);
        if let Some(font) = font {
            let size = self.style.label_size;
            let m = fonts.measure_text("Reset", font, size);
            let origin = Vec2::new(
                layout.reset.origin.x + (layout.reset.size.x - m.x) * 0.5,
                layout.reset.origin.y + (layout.reset.size.y - m.y) * 0.5,
            );
            dl.push_text(Z_GLYPH, "Reset", font, size, self.text_color, origin);
        }

        dl.pop_clip();
    }

    fn paint_label(
        &self,
        dl: &mut DrawList,
        fonts: &FontSystem,
        font: Option<FontId>,
        variant: SceneVariant,
        state: &OverlayState<'_>,
    ) {
        let text = state.site.label(variant);
        let size = self.style.label_size;
        let measured = match font {
            Some(font) => fonts.measure_text(text, font, size),
            None => Vec2::new(text.chars().count() as f32 * size * FALLBACK_ADVANCE, size * 1.2),
        };
        let w = measured.x + PAD.0 * 2.0;
        let h = measured.y + PAD.1 * 2.0;
        let top = state.container.origin.y + self.style.inset;
        let (x, region) = match variant {
            SceneVariant::Historical => {
                (state.container.origin.x + self.style.inset, state.regions.historical)
            }
            SceneVariant::Current => {
                (state.container.right() - self.style.inset - w, state.regions.current)
            }
        };
        let pill = Rect::new(x, top, w, h);

        dl.push_clip(region);
        dl.push_rounded_rect(Z_SHAPE, pill, h * 0.5, self.pill_color, None);
        if let Some(font) = font {
            let origin = Vec2::new(pill.origin.x + PAD.0, pill.origin.y + PAD.1);
            dl.push_text(Z_GLYPH, text, font, size, self.text_color, origin);
        }
        dl.pop_clip();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::BoundaryPosition;
    use crate::compositor::clip_regions;
    use timeleap_engine::scene::DrawCmd;

    fn container() -> Rect {
        Rect::new(0.0, 0.0, 1000.0, 480.0)
    }

    fn surface() -> ControlSurface {
        ControlSurface::new(HandleStyle::default())
    }

    fn hit(p: f32, x: f32, y: f32) -> Option<ControlHit> {
        let regions = clip_regions(container(), BoundaryPosition::new(p));
        surface().hit_test(container(), &regions, Vec2::new(x, y))
    }

    #[test]
    fn knob_and_line_hit_the_handle() {
        assert_eq!(hit(50.0, 500.0, 240.0), Some(ControlHit::Handle));
        assert_eq!(hit(50.0, 520.0, 240.0), Some(ControlHit::Handle));
        assert_eq!(hit(50.0, 505.0, 20.0), Some(ControlHit::Handle));
        assert_eq!(hit(50.0, 520.0, 20.0), None);
        assert_eq!(hit(50.0, 300.0, 240.0), None);
    }

    #[test]
    fn reset_hits_and_beats_the_handle() {
        // Reset occupies x in [916, 984), y in [434, 464).
        assert_eq!(hit(50.0, 950.0, 450.0), Some(ControlHit::Reset));
        assert_eq!(hit(95.0, 950.0, 450.0), Some(ControlHit::Reset));
        assert_eq!(hit(95.0, 950.0, 200.0), Some(ControlHit::Handle));
    }

    #[test]
    fn outside_container_misses() {
        assert_eq!(hit(50.0, 500.0, 600.0), None);
        assert_eq!(hit(50.0, f32::NAN, 240.0), None);
    }

    #[test]
    fn hover_change_is_reported_once() {
        let mut s = surface();
        assert!(s.set_hover(Some(ControlHit::Handle)));
        assert!(!s.set_hover(Some(ControlHit::Handle)));
        assert!(s.set_hover(None));
    }

    fn painted(p: f32, site: &SiteContext) -> DrawList {
        let mut dl = DrawList::new();
        let regions = clip_regions(container(), BoundaryPosition::new(p));
        let state = OverlayState { container: container(), regions, site, dragging: false };
        surface().paint(&mut dl, &FontSystem::new(), None, state);
        dl
    }

    #[test]
    fn overlay_stays_inside_the_container() {
        let dl = painted(50.0, &SiteContext::placeholder());
        assert!(!dl.is_empty());
        for item in dl.items() {
            let clip = item.clip_rect.unwrap();
            assert!(clip.origin.x >= 0.0 && clip.right() <= 1000.0);
            assert!(clip.origin.y >= 0.0 && clip.bottom() <= 480.0);
        }
    }

    #[test]
    fn labels_clip_to_their_own_side() {
        let dl = painted(30.0, &SiteContext::placeholder());
        let regions = clip_regions(container(), BoundaryPosition::new(30.0));
        let pills: Vec<_> = dl
            .items()
            .iter()
            .filter(|i| matches!(i.cmd, DrawCmd::Rect { rect, .. } if rect.origin.y == 16.0))
            .collect();
        assert_eq!(pills.len(), 2);
        assert_eq!(pills[0].clip_rect, Some(regions.historical));
        assert_eq!(pills[1].clip_rect, Some(regions.current));
    }

    #[test]
    fn hidden_side_label_is_fully_clipped() {
        let dl = painted(0.0, &SiteContext::placeholder());
        let first = dl
            .items()
            .iter()
            .find(|i| matches!(i.cmd, DrawCmd::Rect { rect, .. } if rect.origin.y == 16.0))
            .unwrap();
        assert!(first.clip_rect.unwrap().is_empty());
    }

    #[test]
    fn handle_has_two_direction_glyphs() {
        let dl = painted(50.0, &SiteContext::placeholder());
        let dirs: Vec<_> = dl
            .items()
            .iter()
            .filter_map(|i| match i.cmd {
                DrawCmd::Triangle { dir, .. } => Some(dir),
                _ => None,
            })
            .collect();
        assert_eq!(dirs, vec![TriangleDir::Left, TriangleDir::Right]);
    }

    #[test]
    fn empty_container_paints_nothing() {
        let mut dl = DrawList::new();
        let site = SiteContext::placeholder();
        let c = Rect::new(0.0, 0.0, 0.0, 0.0);
        let state = OverlayState {
            container: c,
            regions: clip_regions(c, BoundaryPosition::centered()),
            site: &site,
            dragging: false,
        };
        surface().paint(&mut dl, &FontSystem::new(), None, state);
        assert!(dl.is_empty());
    }
}
