use timeleap_engine::coords::Rect;

use crate::boundary::BoundaryPosition;
use crate::listeners::{ListenerId, ListenerKind, WindowListeners};

/// Window-level subscriptions owned by one mouse drag.
///
/// Acquired in [`Coordinator::drag_start`] and consumed by
/// [`release`](Self::release) in [`Coordinator::drag_end`]; there is no
/// other way to drop it.
#[derive(Debug)]
struct DragSession {
    move_listener: ListenerId,
    up_listener: ListenerId,
}

impl DragSession {
    fn acquire(listeners: &mut WindowListeners) -> Self {
        Self {
            move_listener: listeners.subscribe(ListenerKind::PointerMove),
            up_listener: listeners.subscribe(ListenerKind::PointerUp),
        }
    }

    fn release(self, listeners: &mut WindowListeners) {
        listeners.unsubscribe(self.move_listener);
        listeners.unsubscribe(self.up_listener);
    }
}

/// Sole writer of the [`BoundaryPosition`].
///
/// Mouse and touch take different paths: a mouse drag needs an explicit
/// start on the handle and ends on release anywhere, while touch movement
/// inside the container writes directly with no start or end.
#[derive(Debug, Default)]
pub struct Coordinator {
    position: BoundaryPosition,
    drag: Option<DragSession>,
}

impl Coordinator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn position(&self) -> BoundaryPosition {
        self.position
    }

    /// The drag state: true between drag start and drag end.
    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Primary press on the handle. Position is left unchanged.
    ///
    /// Returns `false` if a drag was already active; its listeners are kept
    /// rather than subscribed a second time.
    pub fn drag_start(&mut self, listeners: &mut WindowListeners) -> bool {
        if self.drag.is_some() {
            return false;
        }
        self.drag = Some(DragSession::acquire(listeners));
        log::debug!("boundary drag started at {}", self.position);
        true
    }

    /// Mouse movement at window x `client_x`. Ignored unless dragging.
    ///
    /// Returns `true` if the position was written.
    pub fn drag_move(&mut self, client_x: f32, container: Rect) -> bool {
        if self.drag.is_none() {
            return false;
        }
        self.write(client_x, container)
    }

    /// Mouse release anywhere. Returns `false` if no drag was active.
    pub fn drag_end(&mut self, listeners: &mut WindowListeners) -> bool {
        let Some(session) = self.drag.take() else {
            return false;
        };
        session.release(listeners);
        log::debug!("boundary drag ended at {}", self.position);
        true
    }

    /// Touch movement inside the container; no drag state involved.
    pub fn touch_move(&mut self, client_x: f32, container: Rect) -> bool {
        self.write(client_x, container)
    }

    /// Back to the centre, whatever the drag state.
    pub fn reset(&mut self) {
        self.position = BoundaryPosition::centered();
        log::debug!("boundary reset");
    }

    fn write(&mut self, client_x: f32, container: Rect) -> bool {
        match BoundaryPosition::from_offset(client_x, container.origin.x, container.size.x) {
            Some(p) => {
                self.position = p;
                true
            }
            None => false,
        }
    }
}
