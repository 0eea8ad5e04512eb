//! Per-context overlay registry.
//!
//! Each host context (an editable region, a panel) owns at most one
//! overlay. Overlays are created lazily on first use, hidden between
//! uses and disposed explicitly when their context goes away.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dispatch::{EventHandler, Priority};
use crate::input::{DocumentEvent, Propagation};
use crate::overlay::Overlay;

/// Host-defined identity of a context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContextId(pub String);

impl ContextId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContextId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ContextId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Map from context to its overlay.
pub struct OverlayRegistry<P> {
    overlays: HashMap<ContextId, Overlay<P>>,
}

impl<P> Default for OverlayRegistry<P> {
    fn default() -> Self {
        Self {
            overlays: HashMap::new(),
        }
    }
}

impl<P> OverlayRegistry<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn contains(&self, context: &ContextId) -> bool {
        self.overlays.contains_key(context)
    }

    pub fn get(&self, context: &ContextId) -> Option<&Overlay<P>> {
        self.overlays.get(context)
    }

    pub fn get_mut(&mut self, context: &ContextId) -> Option<&mut Overlay<P>> {
        self.overlays.get_mut(context)
    }

    /// Return the context's overlay, creating it with `make` if missing.
    ///
    /// `make` may decline by returning `None` (e.g. a context with nothing
    /// to pick), in which case nothing is cached and `None` is returned.
    pub fn get_or_create(
        &mut self,
        context: &ContextId,
        make: impl FnOnce() -> Option<Overlay<P>>,
    ) -> Option<&mut Overlay<P>> {
        if !self.overlays.contains_key(context) {
            let overlay = make()?;
            log::debug!("created overlay for context {}", context);
            self.overlays.insert(context.clone(), overlay);
        }
        self.overlays.get_mut(context)
    }

    /// Insert an overlay, returning the one it replaced.
    pub fn insert(&mut self, context: ContextId, overlay: Overlay<P>) -> Option<Overlay<P>> {
        self.overlays.insert(context, overlay)
    }

    /// Remove a context's overlay when the context is destroyed.
    pub fn dispose(&mut self, context: &ContextId) -> Option<Overlay<P>> {
        let overlay = self.overlays.remove(context);
        if overlay.is_some() {
            log::debug!("disposed overlay for context {}", context);
        }
        overlay
    }

    pub fn contexts(&self) -> impl Iterator<Item = &ContextId> {
        self.overlays.keys()
    }

    pub fn hide_all(&mut self) {
        for overlay in self.overlays.values_mut() {
            overlay.hide();
        }
    }

    /// Offer an event to every overlay, active ones first.
    ///
    /// Every overlay observes document-level events independently; the
    /// first one that claims the event ends the dispatch.
    pub fn dispatch(&mut self, event: &DocumentEvent) -> Propagation {
        let (mut active, mut inactive): (Vec<_>, Vec<_>) = self
            .overlays
            .values_mut()
            .partition(|overlay| overlay.is_active());
        for overlay in active.iter_mut().chain(inactive.iter_mut()) {
            if overlay.handle_event(event).is_stopped() {
                return Propagation::Stop;
            }
        }
        Propagation::Continue
    }
}

impl<P> EventHandler for OverlayRegistry<P> {
    fn priority(&self) -> Priority {
        Priority::Overlay
    }

    fn handle(&mut self, event: &DocumentEvent) -> Propagation {
        self.dispatch(event)
    }
}

impl<P: fmt::Debug> fmt::Debug for OverlayRegistry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.overlays.iter()).finish()
    }
}
