//! The grid-selection overlay state machine.
//!
//! An [`Overlay`] owns a grid of opaque payloads, its visibility and the
//! single focused cell. Rendering layers project this state; they never
//! hold any of it themselves.

use std::fmt;

use kurbo::Point;

use crate::grid::{CellGrid, DEFAULT_COLUMNS, Direction};
use crate::input::{DocumentEvent, ElementId, ElementPath, Key, KeyEvent, PointerEvent, Propagation};
use crate::position::PositionMode;

/// Whether the overlay container is displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Hidden,
    Visible,
}

/// What put the focus mark on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusSource {
    /// Pointer hover. Ephemeral: cleared on leave and on the next `show`.
    Pointer,
    /// Arrow-key navigation.
    Keyboard,
    /// Set by the host or by `show`.
    Programmatic,
}

/// The focused cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Focus {
    pub index: usize,
    pub source: FocusSource,
}

/// Receives the payload of the cell the user picked.
pub trait SelectionHandler<P> {
    fn on_selected(&mut self, payload: &P);
}

impl<P, F: FnMut(&P)> SelectionHandler<P> for F {
    fn on_selected(&mut self, payload: &P) {
        self(payload)
    }
}

/// A floating grid of selectable cells anchored to a trigger element.
pub struct Overlay<P> {
    grid: CellGrid<P>,
    handler: Box<dyn SelectionHandler<P>>,
    anchor: ElementId,
    container: ElementId,
    visibility: Visibility,
    focus: Option<Focus>,
    position: Point,
    position_mode: PositionMode,
}

impl<P> Overlay<P> {
    /// Create a hidden overlay with the default column count.
    pub fn new(
        items: Vec<P>,
        handler: impl SelectionHandler<P> + 'static,
        anchor: ElementId,
    ) -> Self {
        Self::with_columns(items, DEFAULT_COLUMNS, handler, anchor)
    }

    /// Create a hidden overlay packing `items` into rows of `columns`.
    pub fn with_columns(
        items: Vec<P>,
        columns: usize,
        handler: impl SelectionHandler<P> + 'static,
        anchor: ElementId,
    ) -> Self {
        Self {
            grid: CellGrid::new(items, columns),
            handler: Box::new(handler),
            anchor,
            container: ElementId::new(),
            visibility: Visibility::Hidden,
            focus: None,
            position: Point::ZERO,
            position_mode: PositionMode::default(),
        }
    }

    pub fn grid(&self) -> &CellGrid<P> {
        &self.grid
    }

    pub fn items(&self) -> &[P] {
        self.grid.items()
    }

    /// The trigger element excluded from outside-click dismissal.
    pub fn anchor(&self) -> ElementId {
        self.anchor
    }

    /// Identity of the overlay's own container.
    pub fn container(&self) -> ElementId {
        self.container
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    /// Whether the overlay currently gates keyboard and outside clicks.
    pub fn is_active(&self) -> bool {
        self.is_visible()
    }

    pub fn focused(&self) -> Option<Focus> {
        self.focus
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.focus.map(|f| f.index)
    }

    pub fn focused_payload(&self) -> Option<&P> {
        self.focus.and_then(|f| self.grid.get(f.index))
    }

    /// Container offset, in the coordinate space of `position_mode`.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, offset: Point) {
        self.position = offset;
    }

    pub fn position_mode(&self) -> PositionMode {
        self.position_mode
    }

    pub fn set_position_mode(&mut self, mode: PositionMode) {
        self.position_mode = mode;
    }

    /// Show the overlay at `offset`.
    ///
    /// Hover focus is dropped; focus set by the keyboard or the host
    /// survives. If no cell is focused afterwards the first cell is.
    pub fn show(&mut self, anchor: ElementId, offset: Point) {
        self.anchor = anchor;
        self.position = offset;
        self.visibility = Visibility::Visible;

        if matches!(self.focus, Some(Focus { source: FocusSource::Pointer, .. })) {
            self.focus = None;
        }
        if self.focus.is_none() && !self.grid.is_empty() {
            self.focus = Some(Focus {
                index: 0,
                source: FocusSource::Programmatic,
            });
        }

        log::debug!(
            "overlay {:?} shown at ({}, {}), focus {:?}",
            self.container.0,
            self.position.x,
            self.position.y,
            self.focused_index()
        );
    }

    /// Hide the overlay. Idempotent.
    pub fn hide(&mut self) {
        if self.visibility == Visibility::Visible {
            log::debug!("overlay {:?} hidden", self.container.0);
        }
        self.visibility = Visibility::Hidden;
    }

    /// Focus a cell programmatically. Returns false for indices past the grid.
    pub fn focus(&mut self, index: usize) -> bool {
        if index >= self.grid.len() {
            return false;
        }
        self.focus = Some(Focus {
            index,
            source: FocusSource::Programmatic,
        });
        true
    }

    pub fn clear_focus(&mut self) {
        self.focus = None;
    }

    /// Route any document event to the matching handler.
    pub fn handle_event(&mut self, event: &DocumentEvent) -> Propagation {
        match event {
            DocumentEvent::Key(KeyEvent::Down(key)) => self.handle_key_down(key),
            DocumentEvent::Key(KeyEvent::Up(key)) => self.handle_key_up(key),
            DocumentEvent::Pointer(pointer) => self.handle_pointer(pointer),
        }
    }

    /// Grid navigation. Claims the event only while visible and only for
    /// Enter and the arrow keys.
    pub fn handle_key_down(&mut self, key: &Key) -> Propagation {
        if !self.is_visible() || !key.is_grid_navigation() {
            return Propagation::Continue;
        }
        match key {
            Key::Enter => self.select_focused(),
            Key::ArrowLeft => self.move_focus(Direction::Left),
            Key::ArrowUp => self.move_focus(Direction::Up),
            Key::ArrowRight => self.move_focus(Direction::Right),
            Key::ArrowDown => self.move_focus(Direction::Down),
            Key::Escape | Key::Other(_) => {}
        }
        Propagation::Stop
    }

    /// Escape dismissal.
    pub fn handle_key_up(&mut self, key: &Key) -> Propagation {
        if *key == Key::Escape && self.is_visible() {
            self.hide();
        }
        Propagation::Continue
    }

    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Propagation {
        match *event {
            PointerEvent::CellEnter { overlay, index } if overlay == self.container => {
                if index < self.grid.len() {
                    self.focus = Some(Focus {
                        index,
                        source: FocusSource::Pointer,
                    });
                }
                Propagation::Stop
            }
            PointerEvent::CellLeave { overlay, index } if overlay == self.container => {
                if self.focused_index() == Some(index) {
                    self.focus = None;
                }
                Propagation::Stop
            }
            PointerEvent::CellClick { overlay, index } if overlay == self.container => {
                self.select(index);
                Propagation::Stop
            }
            PointerEvent::Click(ref path) => self.handle_click(path),
            _ => Propagation::Continue,
        }
    }

    fn handle_click(&mut self, path: &ElementPath) -> Propagation {
        if path.contains(self.container) {
            return Propagation::Stop;
        }
        if !self.is_active() || path.contains(self.anchor) {
            return Propagation::Continue;
        }
        self.hide();
        Propagation::Continue
    }

    fn move_focus(&mut self, direction: Direction) {
        let Some(current) = self.focus else {
            return;
        };
        if let Some(next) = self.grid.neighbor(current.index, direction) {
            log::trace!("focus {} -> {} ({:?})", current.index, next, direction);
            self.focus = Some(Focus {
                index: next,
                source: FocusSource::Keyboard,
            });
        }
    }

    fn select_focused(&mut self) {
        if let Some(index) = self.focused_index() {
            self.select(index);
        }
    }

    fn select(&mut self, index: usize) {
        if !self.is_visible() || index >= self.grid.len() {
            return;
        }
        self.hide();
        if let Some(payload) = self.grid.get(index) {
            log::debug!("overlay {:?} selected cell {}", self.container.0, index);
            self.handler.on_selected(payload);
        }
    }
}

impl<P: fmt::Debug> fmt::Debug for Overlay<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overlay")
            .field("grid", &self.grid)
            .field("anchor", &self.anchor)
            .field("container", &self.container)
            .field("visibility", &self.visibility)
            .field("focus", &self.focus)
            .field("position", &self.position)
            .field("position_mode", &self.position_mode)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn overlay(n: usize) -> (Overlay<usize>, Rc<RefCell<Vec<usize>>>) {
        let picked = Rc::new(RefCell::new(Vec::new()));
        let sink = picked.clone();
        let overlay = Overlay::new(
            (0..n).collect(),
            move |p: &usize| sink.borrow_mut().push(*p),
            ElementId::new(),
        );
        (overlay, picked)
    }

    fn open(o: &mut Overlay<usize>) {
        let anchor = o.anchor();
        o.show(anchor, Point::new(10.0, 20.0));
    }

    #[test]
    fn test_starts_hidden() {
        let (o, _) = overlay(5);
        assert_eq!(o.visibility(), Visibility::Hidden);
        assert!(!o.is_active());
        assert_eq!(o.focused(), None);
    }

    #[test]
    fn test_show_focuses_first_cell() {
        let (mut o, _) = overlay(5);
        open(&mut o);
        assert!(o.is_visible());
        assert_eq!(o.focused_index(), Some(0));
        assert_eq!(o.position(), Point::new(10.0, 20.0));
    }

    #[test]
    fn test_show_twice_is_stable() {
        let (mut o, _) = overlay(5);
        open(&mut o);
        o.handle_key_down(&Key::ArrowRight);
        open(&mut o);
        assert!(o.is_visible());
        assert_eq!(o.focused_index(), Some(1));
    }

    #[test]
    fn test_hide_idempotent() {
        let (mut o, _) = overlay(5);
        o.hide();
        o.hide();
        assert!(!o.is_active());
        open(&mut o);
        o.hide();
        o.hide();
        assert_eq!(o.visibility(), Visibility::Hidden);
    }

    #[test]
    fn test_keys_ignored_while_hidden() {
        let (mut o, picked) = overlay(5);
        o.focus(2);
        assert_eq!(o.handle_key_down(&Key::ArrowRight), Propagation::Continue);
        assert_eq!(o.handle_key_down(&Key::Enter), Propagation::Continue);
        assert_eq!(o.focused_index(), Some(2));
        assert!(picked.borrow().is_empty());
    }

    #[test]
    fn test_non_navigation_keys_pass_through() {
        let (mut o, _) = overlay(5);
        open(&mut o);
        assert_eq!(
            o.handle_key_down(&Key::Other("a".to_string())),
            Propagation::Continue
        );
        assert_eq!(o.handle_key_down(&Key::Escape), Propagation::Continue);
        assert_eq!(o.handle_key_down(&Key::ArrowRight), Propagation::Stop);
    }

    #[test]
    fn test_enter_selects_once_and_hides() {
        let (mut o, picked) = overlay(20);
        open(&mut o);
        o.handle_key_down(&Key::ArrowDown);
        assert_eq!(o.handle_key_down(&Key::Enter), Propagation::Stop);
        assert_eq!(*picked.borrow(), vec![15]);
        assert!(!o.is_visible());

        // Hidden now, so a second Enter does nothing.
        o.handle_key_down(&Key::Enter);
        assert_eq!(picked.borrow().len(), 1);
    }

    #[test]
    fn test_cell_click_selects() {
        let (mut o, picked) = overlay(5);
        open(&mut o);
        let container = o.container();
        let result = o.handle_pointer(&PointerEvent::CellClick {
            overlay: container,
            index: 3,
        });
        assert_eq!(result, Propagation::Stop);
        assert_eq!(*picked.borrow(), vec![3]);
        assert!(!o.is_active());
    }

    #[test]
    fn test_cell_click_after_escape_is_inert() {
        let (mut o, picked) = overlay(5);
        open(&mut o);
        let container = o.container();
        o.handle_key_up(&Key::Escape);
        let result = o.handle_pointer(&PointerEvent::CellClick {
            overlay: container,
            index: 2,
        });
        assert_eq!(result, Propagation::Stop);
        assert!(picked.borrow().is_empty());
        assert!(!o.is_visible());
    }

    #[test]
    fn test_hover_focus_is_exclusive_and_ephemeral() {
        let (mut o, _) = overlay(5);
        open(&mut o);
        let container = o.container();

        o.handle_pointer(&PointerEvent::CellEnter { overlay: container, index: 2 });
        assert_eq!(o.focused_index(), Some(2));

        o.handle_pointer(&PointerEvent::CellEnter { overlay: container, index: 4 });
        assert_eq!(o.focused_index(), Some(4));

        // Leaving a cell that is not focused changes nothing.
        o.handle_pointer(&PointerEvent::CellLeave { overlay: container, index: 2 });
        assert_eq!(o.focused_index(), Some(4));

        o.handle_pointer(&PointerEvent::CellLeave { overlay: container, index: 4 });
        assert_eq!(o.focused(), None);

        // Navigation and Enter are inert without focus, but still claimed.
        assert_eq!(o.handle_key_down(&Key::ArrowLeft), Propagation::Stop);
        assert_eq!(o.handle_key_down(&Key::Enter), Propagation::Stop);
        assert!(o.is_visible());
    }

    #[test]
    fn test_hover_focus_dropped_on_show() {
        let (mut o, _) = overlay(5);
        open(&mut o);
        let container = o.container();
        o.handle_pointer(&PointerEvent::CellEnter { overlay: container, index: 3 });
        o.hide();
        open(&mut o);
        assert_eq!(o.focused_index(), Some(0));
    }

    #[test]
    fn test_events_for_other_overlays_ignored() {
        let (mut o, picked) = overlay(5);
        open(&mut o);
        let other = ElementId::new();
        assert_eq!(
            o.handle_pointer(&PointerEvent::CellClick { overlay: other, index: 1 }),
            Propagation::Continue
        );
        assert!(picked.borrow().is_empty());
        assert!(o.is_visible());
    }

    #[test]
    fn test_escape_hides() {
        let (mut o, _) = overlay(5);
        open(&mut o);
        o.handle_key_up(&Key::ArrowLeft);
        assert!(o.is_visible());
        o.handle_key_up(&Key::Escape);
        assert!(!o.is_visible());
    }

    #[test]
    fn test_focus_out_of_range() {
        let (mut o, _) = overlay(3);
        assert!(!o.focus(3));
        assert!(o.focus(2));
        assert_eq!(
            o.focused(),
            Some(Focus { index: 2, source: FocusSource::Programmatic })
        );
        o.clear_focus();
        assert_eq!(o.focused(), None);
    }

    #[test]
    fn test_empty_overlay_is_inert() {
        let (mut o, picked) = overlay(0);
        open(&mut o);
        assert!(o.is_visible());
        assert_eq!(o.focused(), None);
        o.handle_key_down(&Key::ArrowRight);
        o.handle_key_down(&Key::Enter);
        assert!(picked.borrow().is_empty());
        assert!(o.is_visible());
    }
}
