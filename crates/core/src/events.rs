//! Click dispatch between sub-views
//!
//! A click that lands in a registered view goes to that view's handler. A
//! click outside every view is treated as a general deselect and is delivered
//! to every handler.

use crate::core_types::Vec2;
use crate::scene::ViewId;
use rustc_hash::FxHashMap;
use tracing::debug;

/// Mouse click in view-plane coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickEvent {
    /// View that was hit, `None` for clicks outside every view
    pub view: Option<ViewId>,
    pub point: Vec2,
}

impl ClickEvent {
    pub fn at(view: ViewId, point: Vec2) -> Self {
        Self {
            view: Some(view),
            point,
        }
    }

    pub fn outside() -> Self {
        Self {
            view: None,
            point: Vec2::zeros(),
        }
    }
}

/// Where a click should go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch<H> {
    Target(H),
    /// Deselect sent to every handler, in view order
    Broadcast(Vec<H>),
}

#[derive(Debug, Clone)]
pub struct ClickRouter<H> {
    handlers: FxHashMap<ViewId, H>,
}

impl<H> Default for ClickRouter<H> {
    fn default() -> Self {
        Self {
            handlers: FxHashMap::default(),
        }
    }
}

impl<H: Clone> ClickRouter<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `view`, returning the handler it replaces
    pub fn register(&mut self, view: ViewId, handler: H) -> Option<H> {
        self.handlers.insert(view, handler)
    }

    pub fn unregister(&mut self, view: ViewId) -> Option<H> {
        self.handlers.remove(&view)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn route(&self, event: &ClickEvent) -> Dispatch<H> {
        if let Some(handler) = event.view.and_then(|view| self.handlers.get(&view)) {
            debug!("Click routed to view {:?}", event.view);
            return Dispatch::Target(handler.clone());
        }
        debug!("Click outside registered views; broadcasting deselect");
        let mut all: Vec<_> = self.handlers.iter().collect();
        all.sort_unstable_by_key(|(view, _)| **view);
        Dispatch::Broadcast(all.into_iter().map(|(_, h)| h.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Panel {
        Grid,
        Bars,
    }

    fn router() -> ClickRouter<Panel> {
        let mut router = ClickRouter::new();
        router.register(ViewId(0), Panel::Grid);
        router.register(ViewId(1), Panel::Bars);
        router
    }

    #[test]
    fn test_click_in_view_targets_handler() {
        let event = ClickEvent::at(ViewId(1), Vec2::new(0.5, 0.5));
        assert_eq!(router().route(&event), Dispatch::Target(Panel::Bars));
    }

    #[test]
    fn test_unrouted_click_broadcasts_in_view_order() {
        let expected = Dispatch::Broadcast(vec![Panel::Grid, Panel::Bars]);
        assert_eq!(router().route(&ClickEvent::outside()), expected);
        // Unregistered views behave like a click outside
        assert_eq!(
            router().route(&ClickEvent::at(ViewId(7), Vec2::zeros())),
            expected
        );
    }

    #[test]
    fn test_register_replaces() {
        let mut router = router();
        assert_eq!(router.register(ViewId(0), Panel::Bars), Some(Panel::Grid));
        assert_eq!(router.unregister(ViewId(0)), Some(Panel::Bars));
        assert_eq!(router.handler_count(), 1);
    }
}
