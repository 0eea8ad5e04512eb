//! Text color picker: glue between an editor host and per-context overlays.
//!
//! The controller owns one swatch overlay per editable context, the
//! picker button state and the range captured when the picker opened.
//! Notifications from the host's event bus (context activated, anchor
//! moved, selection changed) are plain method calls here.

use std::cell::RefCell;
use std::rc::Rc;

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;

use kurbo::Point;

use crate::config::TextColorConfig;
use crate::input::{DocumentEvent, ElementId, Propagation};
use crate::overlay::Overlay;
use crate::palette::{ColorValue, Palette, Swatch, index_of};
use crate::position::{Layout, offset_below};
use crate::registry::{ContextId, OverlayRegistry};
use crate::schedule::Scheduler;

/// The editor side of the picker.
pub trait TextColorHost: Layout {
    /// The host's selection range. Opaque to the picker.
    type Range: Clone;

    fn current_range(&self) -> Option<Self::Range>;

    fn set_color(&mut self, range: &Self::Range, color: &ColorValue);

    fn unset_color(&mut self, range: &Self::Range);

    /// Re-select `range` after a color was applied.
    fn restore_selection(&mut self, range: &Self::Range);

    /// Computed text color at the end of `range`, as a style string.
    fn computed_color(&self, range: &Self::Range) -> Option<String>;
}

/// State of the picker button in the host toolbar.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonState {
    /// The button element; overlays anchor to it.
    pub anchor: ElementId,
    pub visible: bool,
    /// Color shown on the button icon, as read back from the host.
    pub icon_color: Option<String>,
}

#[derive(Debug, Clone)]
enum Task<R> {
    Readback(R),
    Prepare,
}

/// Per-context swatch overlays wired to a text color host.
pub struct TextColorController<R> {
    config: TextColorConfig,
    palette: Palette,
    registry: OverlayRegistry<Swatch>,
    selections: Rc<RefCell<Vec<Swatch>>>,
    button: ButtonState,
    current: Option<ContextId>,
    range_at_open: Option<R>,
    pending_prepare: Vec<ContextId>,
    scheduler: Scheduler<Task<R>>,
}

impl<R: Clone> TextColorController<R> {
    pub fn new(config: TextColorConfig, anchor: ElementId) -> Self {
        Self {
            config,
            palette: Palette::default(),
            registry: OverlayRegistry::new(),
            selections: Rc::new(RefCell::new(Vec::new())),
            button: ButtonState {
                anchor,
                visible: false,
                icon_color: None,
            },
            current: None,
            range_at_open: None,
            pending_prepare: Vec::new(),
            scheduler: Scheduler::new(),
        }
    }

    pub fn config(&self) -> &TextColorConfig {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn button(&self) -> &ButtonState {
        &self.button
    }

    pub fn registry(&self) -> &OverlayRegistry<Swatch> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut OverlayRegistry<Swatch> {
        &mut self.registry
    }

    pub fn current_context(&self) -> Option<&ContextId> {
        self.current.as_ref()
    }

    pub fn overlay(&self, context: &ContextId) -> Option<&Overlay<Swatch>> {
        self.registry.get(context)
    }

    pub fn current_overlay(&self) -> Option<&Overlay<Swatch>> {
        self.current.as_ref().and_then(|ctx| self.registry.get(ctx))
    }

    pub fn current_overlay_mut(&mut self) -> Option<&mut Overlay<Swatch>> {
        let ctx = self.current.as_ref()?;
        self.registry.get_mut(ctx)
    }

    pub fn range_at_open(&self) -> Option<&R> {
        self.range_at_open.as_ref()
    }

    /// Whether deferred work is waiting for [`TextColorController::tick`].
    pub fn has_pending_tasks(&self) -> bool {
        !self.scheduler.is_empty()
    }

    /// A context became active. Returns whether it has a picker.
    pub fn context_activated(&mut self, context: ContextId) -> bool {
        let available = self.ensure_overlay(&context);
        self.button.visible = available;
        self.current = available.then_some(context);
        available
    }

    /// A context was destroyed; its overlay goes with it.
    pub fn context_destroyed(&mut self, context: &ContextId) {
        self.registry.dispose(context);
        self.pending_prepare.retain(|c| c != context);
        if self.current.as_ref() == Some(context) {
            self.current = None;
            self.button.visible = false;
        }
    }

    /// The anchor moved (e.g. the floating toolbar was repositioned).
    pub fn anchor_moved<L: Layout + ?Sized>(&mut self, layout: &L) {
        let Some(offset) = self.anchor_offset(layout) else {
            return;
        };
        if let Some(overlay) = self.current_overlay_mut() {
            overlay.set_position(offset);
        }
    }

    /// The picker button was clicked: pre-focus the current color,
    /// capture the host range and show the overlay.
    pub fn button_clicked<H: TextColorHost<Range = R>>(&mut self, host: &H) -> bool {
        let offset = self.anchor_offset(host);
        let anchor = self.button.anchor;
        let Some(ctx) = self.current.clone() else {
            return false;
        };
        let Some(overlay) = self.registry.get_mut(&ctx) else {
            return false;
        };

        let current_index = self
            .button
            .icon_color
            .as_deref()
            .and_then(|color| self.palette.swatch_id(color))
            .and_then(|id| index_of(overlay.items(), &id));
        if let Some(index) = current_index {
            overlay.focus(index);
        }

        if let Some(range) = host.current_range() {
            self.range_at_open = Some(range);
        }

        let offset = offset.unwrap_or_else(|| overlay.position());
        overlay.show(anchor, offset);
        true
    }

    /// Route a document event through the overlays and apply any pick.
    pub fn dispatch<H: TextColorHost<Range = R>>(
        &mut self,
        host: &mut H,
        event: &DocumentEvent,
    ) -> Propagation {
        let result = self.registry.dispatch(event);
        let picked: Vec<Swatch> = self.selections.borrow_mut().drain(..).collect();
        for swatch in &picked {
            self.apply(host, swatch);
        }
        result
    }

    /// The host selection changed. The applied color is read back after
    /// the configured delay, since the host applies styles asynchronously.
    pub fn selection_changed(&mut self, now: Instant, range: R) {
        let delay = self.config.readback_delay();
        self.scheduler.schedule(now, delay, Task::Readback(range));
    }

    /// Create overlays for `contexts` ahead of use, last context first:
    /// one immediately, the rest one per prepare interval.
    pub fn prepare(&mut self, now: Instant, contexts: impl IntoIterator<Item = ContextId>) {
        self.pending_prepare = contexts.into_iter().collect();
        self.prepare_next(now);
    }

    /// Run deferred work that is due at `now`.
    pub fn tick<H: TextColorHost<Range = R>>(&mut self, host: &H, now: Instant) {
        for task in self.scheduler.poll(now) {
            match task {
                Task::Readback(range) => {
                    if let Some(color) = host.computed_color(&range) {
                        log::debug!("button color read back: {}", color);
                        self.button.icon_color = Some(color);
                    }
                }
                Task::Prepare => self.prepare_next(now),
            }
        }
    }

    fn prepare_next(&mut self, now: Instant) {
        if let Some(ctx) = self.pending_prepare.pop() {
            self.ensure_overlay(&ctx);
        }
        if !self.pending_prepare.is_empty() {
            let interval = self.config.prepare_interval();
            self.scheduler.schedule(now, interval, Task::Prepare);
        }
    }

    fn ensure_overlay(&mut self, context: &ContextId) -> bool {
        let config = &self.config;
        let palette = &self.palette;
        let selections = &self.selections;
        let anchor = self.button.anchor;

        self.registry
            .get_or_create(context, || {
                let colors = config.colors_for(context);
                if colors.is_empty() {
                    return None;
                }
                let mailbox = Rc::clone(selections);
                let mut overlay = Overlay::with_columns(
                    palette.generate_swatches_lossy(colors),
                    config.columns,
                    move |swatch: &Swatch| mailbox.borrow_mut().push(swatch.clone()),
                    anchor,
                );
                overlay.set_position_mode(config.position_mode);
                Some(overlay)
            })
            .is_some()
    }

    fn anchor_offset<L: Layout + ?Sized>(&self, layout: &L) -> Option<Point> {
        offset_below(
            layout,
            self.button.anchor,
            self.config.position_mode,
            self.config.anchor_gap,
        )
    }

    fn apply<H: TextColorHost<Range = R>>(&self, host: &mut H, swatch: &Swatch) {
        let Some(range) = self.range_at_open.as_ref() else {
            log::warn!("Swatch picked without a captured range");
            return;
        };
        match swatch {
            Swatch::Clear => host.unset_color(range),
            Swatch::Color { value, .. } => host.set_color(range, value),
        }
        host.restore_selection(range);
    }
}

impl<R> std::fmt::Debug for TextColorController<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextColorController")
            .field("button", &self.button)
            .field("current", &self.current)
            .field("overlays", &self.registry.len())
            .field("pending_tasks", &self.scheduler.len())
            .finish_non_exhaustive()
    }
}
