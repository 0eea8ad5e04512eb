//! Priority-ordered event dispatch.
//!
//! Overlays claim first-priority handling: they see every document event
//! before host handlers, and a handler returning [`Propagation::Stop`]
//! ends the dispatch for that event.

use std::cell::RefCell;
use std::rc::Rc;

use crate::input::{DocumentEvent, Propagation};
use crate::overlay::Overlay;

/// Dispatch priority. Lower variants run first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Overlay,
    Host,
}

/// Receives document events.
pub trait EventHandler {
    fn priority(&self) -> Priority;

    fn handle(&mut self, event: &DocumentEvent) -> Propagation;
}

impl<T: EventHandler> EventHandler for Rc<RefCell<T>> {
    fn priority(&self) -> Priority {
        self.borrow().priority()
    }

    fn handle(&mut self, event: &DocumentEvent) -> Propagation {
        self.borrow_mut().handle(event)
    }
}

impl<P> EventHandler for Overlay<P> {
    fn priority(&self) -> Priority {
        Priority::Overlay
    }

    fn handle(&mut self, event: &DocumentEvent) -> Propagation {
        self.handle_event(event)
    }
}

/// Handle returned by [`EventDispatcher::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// Routes events to handlers in priority order, registration order
/// within equal priority.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: Vec<(HandlerId, Box<dyn EventHandler>)>,
    next_id: u64,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: impl EventHandler + 'static) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Remove a handler. Returns false if it was not registered.
    pub fn unregister(&mut self, id: HandlerId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(hid, _)| *hid != id);
        self.handlers.len() != before
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn dispatch(&mut self, event: &DocumentEvent) -> Propagation {
        // Stable sort keeps registration order within a priority.
        let mut order: Vec<usize> = (0..self.handlers.len()).collect();
        order.sort_by_key(|&i| self.handlers[i].1.priority());

        for i in order {
            if self.handlers[i].1.handle(event).is_stopped() {
                return Propagation::Stop;
            }
        }
        Propagation::Continue
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
