//! The comparison widget: two scenes behind a wipe, plus its controls.
//!
//! Owns every piece of comparison state and routes engine input to it.
//! The viewer calls, per frame: [`handle_event`](ComparisonView::handle_event)
//! for each input event, [`tick`](ComparisonView::tick), then reads
//! [`scene_frames`](ComparisonView::scene_frames) and
//! [`paint_overlay`](ComparisonView::paint_overlay) to render.

use std::collections::HashSet;

use timeleap_engine::coords::{Rect, Vec2, Viewport};
use timeleap_engine::input::{
    InputEvent, Key, KeyState, MouseButton, MouseButtonState, TouchPhase,
};
use timeleap_engine::scene::DrawList;
use timeleap_engine::text::{FontId, FontSystem};
use timeleap_engine::window::CursorIcon;

use crate::boundary::BoundaryPosition;
use crate::compositor::{clip_regions, ClipRegions};
use crate::config::ViewConfig;
use crate::control::{ControlHit, ControlSurface, OverlayState};
use crate::coordinator::Coordinator;
use crate::listeners::{ListenerKind, WindowListeners};
use crate::scene::{SceneFrame, SceneRenderer};
use crate::site::SiteContext;
use crate::structure::StructureModel;
use crate::variant::SceneVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Consumed,
    Ignored,
}

impl EventResult {
    #[inline]
    pub fn is_consumed(self) -> bool {
        self == EventResult::Consumed
    }
}

/// A primary-button drag that started on a scene rather than the handle.
#[derive(Debug, Copy, Clone)]
struct OrbitDrag {
    variant: SceneVariant,
    last: Vec2,
}

/// One scene ready to render: project onto `region`, write only `clip`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenePlacement {
    pub frame: SceneFrame,
    pub region: Rect,
    pub clip: Rect,
}

pub struct ComparisonView {
    config: ViewConfig,
    container: Rect,
    coordinator: Coordinator,
    listeners: WindowListeners,
    historical: SceneRenderer,
    current: SceneRenderer,
    control: ControlSurface,
    site: SiteContext,
    orbit: Option<OrbitDrag>,
    /// Touch contacts that began inside the container.
    touches: HashSet<u64>,
    pointer: Option<Vec2>,
    /// Overlay recorded by the last [`paint_overlay`](Self::paint_overlay).
    pub overlay: DrawList,
}

impl ComparisonView {
    pub fn new(config: ViewConfig, model: &dyn StructureModel, site: SiteContext) -> Self {
        log::info!("mounting comparison of `{}` for {:?}", model.name(), site.name);
        Self {
            historical: SceneRenderer::new(SceneVariant::Historical, model, &config),
            current: SceneRenderer::new(SceneVariant::Current, model, &config),
            control: ControlSurface::new(config.handle.clone()),
            container: Rect::zero(),
            coordinator: Coordinator::new(),
            listeners: WindowListeners::new(),
            site,
            orbit: None,
            touches: HashSet::new(),
            pointer: None,
            overlay: DrawList::new(),
            config,
        }
    }

    // ── accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn container(&self) -> Rect {
        self.container
    }

    pub fn position(&self) -> BoundaryPosition {
        self.coordinator.position()
    }

    pub fn is_dragging(&self) -> bool {
        self.coordinator.is_dragging()
    }

    pub fn listeners(&self) -> &WindowListeners {
        &self.listeners
    }

    pub fn site(&self) -> &SiteContext {
        &self.site
    }

    pub fn scene(&self, variant: SceneVariant) -> &SceneRenderer {
        match variant {
            SceneVariant::Historical => &self.historical,
            SceneVariant::Current => &self.current,
        }
    }

    fn scene_mut(&mut self, variant: SceneVariant) -> &mut SceneRenderer {
        match variant {
            SceneVariant::Historical => &mut self.historical,
            SceneVariant::Current => &mut self.current,
        }
    }

    pub fn regions(&self) -> ClipRegions {
        clip_regions(self.container, self.coordinator.position())
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    /// The band spans the full width at the top of the window.
    pub fn layout(&mut self, viewport: Viewport) {
        let w = viewport.width.max(0.0);
        let h = self.config.band_height.min(viewport.height).max(0.0);
        self.container = Rect::new(0.0, 0.0, w, h);
    }

    /// Advances both scenes. Call once per frame before rendering.
    pub fn tick(&mut self, dt: f32) {
        self.historical.update(dt);
        self.current.update(dt);
    }

    pub fn reset(&mut self) {
        self.coordinator.reset();
    }

    /// Swaps the overlay text. Scenes keep their state; the boundary goes
    /// back to its mount value.
    pub fn set_site(&mut self, site: SiteContext) {
        log::info!("site changed to {:?}", site.name);
        self.site = site;
        self.coordinator.reset();
    }

    pub fn mark_degraded(&mut self, reason: &str) {
        self.historical.mark_degraded(reason);
        self.current.mark_degraded(reason);
    }

    // ── input ─────────────────────────────────────────────────────────────

    pub fn handle_event(&mut self, event: &InputEvent) -> EventResult {
        match event {
            InputEvent::PointerMoved(m) => self.pointer_moved(Vec2::new(m.x, m.y)),
            InputEvent::PointerButton(b) if b.button == MouseButton::Left => {
                let p = Vec2::new(b.x, b.y);
                match b.state {
                    MouseButtonState::Pressed => self.primary_pressed(p),
                    MouseButtonState::Released => self.primary_released(),
                }
            }
            InputEvent::MouseWheel { delta, .. } => {
                let Some(p) = self.pointer else { return EventResult::Ignored };
                let lines = delta.vertical_lines();
                if self.is_dragging() || !self.container.contains(p) || !lines.is_finite() {
                    return EventResult::Ignored;
                }
                let variant = self.variant_at(p.x);
                self.scene_mut(variant).zoom(lines);
                EventResult::Consumed
            }
            InputEvent::Touch(t) => match t.phase {
                TouchPhase::Started => {
                    if self.container.contains(Vec2::new(t.x, t.y)) {
                        self.touches.insert(t.id);
                        EventResult::Consumed
                    } else {
                        EventResult::Ignored
                    }
                }
                TouchPhase::Moved => {
                    let inside = self.container.contains(Vec2::new(t.x, t.y));
                    if (inside || self.touches.contains(&t.id))
                        && self.coordinator.touch_move(t.x, self.container)
                    {
                        EventResult::Consumed
                    } else {
                        EventResult::Ignored
                    }
                }
                TouchPhase::Ended | TouchPhase::Cancelled => {
                    if self.touches.remove(&t.id) {
                        EventResult::Consumed
                    } else {
                        EventResult::Ignored
                    }
                }
            },
            InputEvent::Key { key: Key::R, state: KeyState::Pressed, repeat: false, .. } => {
                self.reset();
                EventResult::Consumed
            }
            InputEvent::PointerLeft => {
                self.pointer = None;
                self.control.set_hover(None);
                EventResult::Ignored
            }
            InputEvent::Focused(false) => {
                self.cancel_gestures();
                EventResult::Ignored
            }
            _ => EventResult::Ignored,
        }
    }

    fn pointer_moved(&mut self, p: Vec2) -> EventResult {
        self.pointer = Some(p);

        if self.listeners.is_subscribed(ListenerKind::PointerMove) {
            self.coordinator.drag_move(p.x, self.container);
            return EventResult::Consumed;
        }

        if let Some(orbit) = self.orbit.as_mut() {
            let (dx, dy) = (p.x - orbit.last.x, p.y - orbit.last.y);
            orbit.last = p;
            let variant = orbit.variant;
            self.scene_mut(variant).orbit(dx, dy);
            return EventResult::Consumed;
        }

        let regions = self.regions();
        let hover = self.control.hit_test(self.container, &regions, p);
        self.control.set_hover(hover);
        EventResult::Ignored
    }

    fn primary_pressed(&mut self, p: Vec2) -> EventResult {
        self.pointer = Some(p);
        let regions = self.regions();
        match self.control.hit_test(self.container, &regions, p) {
            Some(ControlHit::Reset) => {
                self.reset();
                EventResult::Consumed
            }
            Some(ControlHit::Handle) => {
                self.coordinator.drag_start(&mut self.listeners);
                EventResult::Consumed
            }
            None if self.container.contains(p) => {
                let variant = self.variant_at(p.x);
                self.scene_mut(variant).interact();
                self.orbit = Some(OrbitDrag { variant, last: p });
                EventResult::Consumed
            }
            None => EventResult::Ignored,
        }
    }

    fn primary_released(&mut self) -> EventResult {
        if self.listeners.is_subscribed(ListenerKind::PointerUp) {
            self.coordinator.drag_end(&mut self.listeners);
            return EventResult::Consumed;
        }
        if self.orbit.take().is_some() {
            return EventResult::Consumed;
        }
        EventResult::Ignored
    }

    fn cancel_gestures(&mut self) {
        if self.coordinator.drag_end(&mut self.listeners) {
            log::debug!("drag cancelled by focus loss");
        }
        self.orbit = None;
        self.touches.clear();
    }

    fn variant_at(&self, x: f32) -> SceneVariant {
        if x < self.regions().split_x() {
            SceneVariant::Historical
        } else {
            SceneVariant::Current
        }
    }

    // ── output ────────────────────────────────────────────────────────────

    /// Scenes to draw this frame, each clipped to its side of the wipe.
    /// Hidden sides and degraded scenes are left out.
    pub fn scene_frames(&self) -> Vec<ScenePlacement> {
        let regions = self.regions();
        [(&self.historical, regions.historical), (&self.current, regions.current)]
            .into_iter()
            .filter(|(_, clip)| !clip.is_empty())
            .filter_map(|(scene, clip)| {
                scene.frame(self.container).map(|frame| ScenePlacement {
                    frame,
                    region: self.container,
                    clip,
                })
            })
            .collect()
    }

    /// Re-records [`overlay`](Self::overlay) for the current state.
    pub fn paint_overlay(&mut self, fonts: &FontSystem, font: Option<FontId>) {
        self.overlay.clear();
        let state = OverlayState {
            container: self.container,
            regions: self.regions(),
            site: &self.site,
            dragging: self.coordinator.is_dragging(),
        };
        self.control.paint(&mut self.overlay, fonts, font, state);
    }

    pub fn cursor(&self) -> CursorIcon {
        if self.is_dragging() {
            return CursorIcon::ColResize;
        }
        if self.orbit.is_some() {
            return CursorIcon::Grabbing;
        }
        match self.control.hover() {
            Some(ControlHit::Handle) => CursorIcon::ColResize,
            Some(ControlHit::Reset) => CursorIcon::Pointer,
            None => match self.pointer {
                Some(p) if self.container.contains(p) => CursorIcon::Grab,
                _ => CursorIcon::Default,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::Pavilion;
    use timeleap_engine::input::{
        Modifiers, MouseWheelDelta, PointerButtonEvent, PointerMoveEvent, TouchEvent,
    };

    fn view() -> ComparisonView {
        let mut v =
            ComparisonView::new(ViewConfig::default(), &Pavilion::default(), SiteContext::placeholder());
        v.layout(Viewport::new(1000.0, 800.0));
        v
    }

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved(PointerMoveEvent { x, y })
    }

    fn button(state: MouseButtonState, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state,
            x,
            y,
            modifiers: Modifiers::default(),
        })
    }

    fn press(x: f32, y: f32) -> InputEvent {
        button(MouseButtonState::Pressed, x, y)
    }

    fn release(x: f32, y: f32) -> InputEvent {
        button(MouseButtonState::Released, x, y)
    }

    fn touch(id: u64, phase: TouchPhase, x: f32, y: f32) -> InputEvent {
        InputEvent::Touch(TouchEvent { id, phase, x, y })
    }

    #[test]
    fn layout_is_a_top_band() {
        let v = view();
        assert_eq!(v.container(), Rect::new(0.0, 0.0, 1000.0, 480.0));

        let mut short = view();
        short.layout(Viewport::new(600.0, 300.0));
        assert_eq!(short.container(), Rect::new(0.0, 0.0, 600.0, 300.0));
    }

    // ── wipe drag ─────────────────────────────────────────────────────────

    #[test]
    fn drag_handle_to_quarter() {
        let mut v = view();
        assert!(v.handle_event(&press(500.0, 240.0)).is_consumed());
        assert!(v.is_dragging());
        assert_eq!(v.position().percent(), 50.0);

        v.handle_event(&moved(250.0, 240.0));
        assert_eq!(v.position().percent(), 25.0);
    }

    #[test]
    fn drag_tracks_outside_the_band_and_clamps() {
        let mut v = view();
        v.handle_event(&press(500.0, 240.0));
        v.handle_event(&moved(-300.0, 700.0));
        assert_eq!(v.position().percent(), 0.0);
        v.handle_event(&moved(5000.0, 700.0));
        assert_eq!(v.position().percent(), 100.0);
    }

    #[test]
    fn release_anywhere_ends_the_drag() {
        let mut v = view();
        v.handle_event(&press(500.0, 240.0));
        assert_eq!(v.listeners().len(), 2);
        v.handle_event(&moved(300.0, 240.0));
        assert!(v.handle_event(&release(900.0, 790.0)).is_consumed());

        assert!(!v.is_dragging());
        assert!(v.listeners().is_empty());
        v.handle_event(&moved(800.0, 240.0));
        assert_eq!(v.position().percent(), 30.0);
    }

    #[test]
    fn plain_move_never_moves_the_boundary() {
        let mut v = view();
        v.handle_event(&moved(100.0, 240.0));
        assert_eq!(v.position().percent(), 50.0);
    }

    #[test]
    fn focus_loss_cancels_drag() {
        let mut v = view();
        v.handle_event(&press(500.0, 240.0));
        v.handle_event(&InputEvent::Focused(false));
        assert!(!v.is_dragging());
        assert!(v.listeners().is_empty());
    }

    // ── reset ─────────────────────────────────────────────────────────────

    #[test]
    fn reset_button_mid_drag() {
        let mut v = view();
        v.handle_event(&press(500.0, 240.0));
        v.handle_event(&moved(100.0, 240.0));
        v.reset();
        assert_eq!(v.position().percent(), 50.0);
        v.reset();
        assert_eq!(v.position().percent(), 50.0);
    }

    #[test]
    fn reset_control_and_key() {
        let mut v = view();
        v.handle_event(&touch(1, TouchPhase::Moved, 900.0, 100.0));
        // Reset sits at [916, 984) x [434, 464).
        assert!(v.handle_event(&press(950.0, 450.0)).is_consumed());
        assert_eq!(v.position().percent(), 50.0);
        assert!(!v.is_dragging());

        v.handle_event(&touch(1, TouchPhase::Moved, 100.0, 100.0));
        let key = InputEvent::Key {
            key: Key::R,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            repeat: false,
        };
        assert!(v.handle_event(&key).is_consumed());
        assert_eq!(v.position().percent(), 50.0);
    }

    // ── touch ─────────────────────────────────────────────────────────────

    #[test]
    fn touch_move_writes_without_drag() {
        let mut v = view();
        assert!(v.handle_event(&touch(7, TouchPhase::Moved, 900.0, 200.0)).is_consumed());
        assert_eq!(v.position().percent(), 90.0);
        assert!(!v.is_dragging());
        assert!(v.listeners().is_empty());
    }

    #[test]
    fn touch_end_changes_nothing() {
        let mut v = view();
        v.handle_event(&touch(7, TouchPhase::Started, 600.0, 200.0));
        v.handle_event(&touch(7, TouchPhase::Moved, 700.0, 200.0));
        v.handle_event(&touch(7, TouchPhase::Ended, 100.0, 200.0));
        assert_eq!(v.position().percent(), 70.0);
    }

    #[test]
    fn touch_started_inside_follows_outside() {
        let mut v = view();
        v.handle_event(&touch(3, TouchPhase::Started, 500.0, 200.0));
        v.handle_event(&touch(3, TouchPhase::Moved, 200.0, 700.0));
        assert_eq!(v.position().percent(), 20.0);

        // A contact that began below the band is not ours.
        v.handle_event(&touch(4, TouchPhase::Started, 500.0, 700.0));
        assert!(!v.handle_event(&touch(4, TouchPhase::Moved, 800.0, 700.0)).is_consumed());
        assert_eq!(v.position().percent(), 20.0);
    }

    // ── scenes ────────────────────────────────────────────────────────────

    #[test]
    fn first_click_on_historical_stops_only_its_spin() {
        let mut v = view();
        v.tick(0.5);
        v.handle_event(&press(200.0, 240.0));
        v.handle_event(&release(200.0, 240.0));

        let h = v.scene(SceneVariant::Historical).angle();
        let c = v.scene(SceneVariant::Current).angle();
        v.tick(0.5);
        assert_eq!(v.scene(SceneVariant::Historical).angle(), h);
        assert!(v.scene(SceneVariant::Current).angle() > c);
    }

    #[test]
    fn orbit_drag_moves_only_the_pressed_scene() {
        let mut v = view();
        v.handle_event(&press(800.0, 240.0));
        v.handle_event(&moved(700.0, 260.0));
        v.handle_event(&release(700.0, 260.0));

        assert_ne!(v.scene(SceneVariant::Current).camera().yaw(), 0.0);
        assert_eq!(v.scene(SceneVariant::Historical).camera().yaw(), 0.0);
        assert!(v.scene(SceneVariant::Historical).is_auto_rotating());
        assert_eq!(v.position().percent(), 50.0);
    }

    #[test]
    fn wheel_zooms_the_scene_under_the_pointer() {
        let mut v = view();
        let before = v.scene(SceneVariant::Historical).camera().distance();
        v.handle_event(&moved(100.0, 100.0));
        let wheel = InputEvent::MouseWheel {
            delta: MouseWheelDelta::Line { x: 0.0, y: 2.0 },
            modifiers: Modifiers::default(),
        };
        assert!(v.handle_event(&wheel).is_consumed());
        assert!(v.scene(SceneVariant::Historical).camera().distance() < before);
        assert_eq!(v.scene(SceneVariant::Current).camera().distance(), before);
    }

    #[test]
    fn frames_follow_the_wipe() {
        let mut v = view();
        let frames = v.scene_frames();
        assert_eq!(frames.len(), 2);
        let total: f32 = frames.iter().map(|f| f.clip.size.x).sum();
        assert_eq!(total, 1000.0);

        v.handle_event(&touch(1, TouchPhase::Moved, 0.0, 10.0));
        let frames = v.scene_frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].frame.variant, SceneVariant::Current);
        assert_eq!(frames[0].region, v.container());
    }

    #[test]
    fn degraded_view_keeps_state() {
        let mut v = view();
        v.mark_degraded("no adapter");
        assert!(v.scene_frames().is_empty());
        v.handle_event(&press(500.0, 240.0));
        v.handle_event(&moved(250.0, 240.0));
        assert_eq!(v.position().percent(), 25.0);
    }

    // ── site ──────────────────────────────────────────────────────────────

    #[test]
    fn site_change_relabels_without_remount() {
        let mut v = view();
        v.tick(1.0);
        v.handle_event(&touch(1, TouchPhase::Moved, 300.0, 10.0));
        let angle = v.scene(SceneVariant::Current).angle();

        let catalog = crate::site::SiteCatalog::builtin().unwrap();
        v.set_site(SiteContext::from_record(catalog.get("golconda_fort").unwrap()));

        assert_eq!(v.site().current_label, "Golconda Fort · Protected Monument");
        assert_eq!(v.scene(SceneVariant::Current).angle(), angle);
        assert_eq!(v.position().percent(), 50.0);
    }

    #[test]
    fn cursor_feedback() {
        let mut v = view();
        v.handle_event(&moved(500.0, 240.0));
        assert_eq!(v.cursor(), CursorIcon::ColResize);
        v.handle_event(&moved(950.0, 450.0));
        assert_eq!(v.cursor(), CursorIcon::Pointer);
        v.handle_event(&moved(200.0, 240.0));
        assert_eq!(v.cursor(), CursorIcon::Grab);
        v.handle_event(&moved(200.0, 700.0));
        assert_eq!(v.cursor(), CursorIcon::Default);
    }

    #[test]
    fn overlay_is_rerecorded() {
        let mut v = view();
        let fonts = FontSystem::new();
        v.paint_overlay(&fonts, None);
        let n = v.overlay.items().len();
        assert!(n > 0);
        v.paint_overlay(&fonts, None);
        assert_eq!(v.overlay.items().len(), n);
    }
}
