//! Window-level listener registry.
//!
//! A drag keeps tracking the pointer after it leaves the widget, so while
//! one is active the view needs pointer-move and pointer-up delivered from
//! the whole window. Those subscriptions are held only for the drag's
//! lifetime; the registry makes that observable.

/// Handle returned by [`WindowListeners::subscribe`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ListenerKind {
    PointerMove,
    PointerUp,
}

#[derive(Debug, Default)]
pub struct WindowListeners {
    next_id: u64,
    active: Vec<(ListenerId, ListenerKind)>,
}

impl WindowListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, kind: ListenerKind) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.active.push((id, kind));
        log::trace!("subscribed {kind:?} as {id:?}");
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.active.len();
        self.active.retain(|(a, _)| *a != id);
        let removed = self.active.len() != before;
        if removed {
            log::trace!("unsubscribed {id:?}");
        }
        removed
    }

    pub fn is_subscribed(&self, kind: ListenerKind) -> bool {
        self.active.iter().any(|(_, k)| *k == kind)
    }

    pub fn count(&self, kind: ListenerKind) -> usize {
        self.active.iter().filter(|(_, k)| *k == kind).count()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_then_unsubscribe() {
        let mut l = WindowListeners::new();
        let a = l.subscribe(ListenerKind::PointerMove);
        let b = l.subscribe(ListenerKind::PointerUp);
        assert_ne!(a, b);
        assert!(l.is_subscribed(ListenerKind::PointerMove));
        assert_eq!(l.len(), 2);

        assert!(l.unsubscribe(a));
        assert!(!l.is_subscribed(ListenerKind::PointerMove));
        assert!(l.is_subscribed(ListenerKind::PointerUp));
        assert!(l.unsubscribe(b));
        assert!(l.is_empty());
    }

    #[test]
    fn unsubscribe_twice_is_reported() {
        let mut l = WindowListeners::new();
        let a = l.subscribe(ListenerKind::PointerUp);
        assert!(l.unsubscribe(a));
        assert!(!l.unsubscribe(a));
    }

    #[test]
    fn ids_are_not_reused() {
        let mut l = WindowListeners::new();
        let a = l.subscribe(ListenerKind::PointerMove);
        l.unsubscribe(a);
        let b = l.subscribe(ListenerKind::PointerMove);
        assert_ne!(a, b);
        assert_eq!(l.count(ListenerKind::PointerMove), 1);
    }
}
