//! egui projection of an [`Overlay`].
//!
//! The view never mutates the overlay. It paints the current state and
//! reports pointer and keyboard input as core events, which the host
//! dispatches (usually through a registry) before the next frame.

use egui::{Context, Id, Order, Rect, Response, Ui, pos2, vec2};
use swatchgrid_core::{ElementId, ElementPath, Key, KeyEvent, Overlay, PointerEvent, Swatch};

use crate::colors::paint_swatch;
use crate::menu::panel_frame;
use crate::sizing;

/// Map an egui key to a core key.
pub fn key_from_egui(key: egui::Key) -> Key {
    match key {
        egui::Key::Enter => Key::Enter,
        egui::Key::Escape => Key::Escape,
        egui::Key::ArrowLeft => Key::ArrowLeft,
        egui::Key::ArrowUp => Key::ArrowUp,
        egui::Key::ArrowRight => Key::ArrowRight,
        egui::Key::ArrowDown => Key::ArrowDown,
        other => Key::Other(other.name().to_string()),
    }
}

/// Key presses and releases of this frame, in order.
pub fn collect_key_events(input: &egui::InputState) -> Vec<KeyEvent> {
    input
        .events
        .iter()
        .filter_map(|event| match event {
            egui::Event::Key { key, pressed, .. } => {
                let key = key_from_egui(*key);
                Some(if *pressed {
                    KeyEvent::Down(key)
                } else {
                    KeyEvent::Up(key)
                })
            }
            _ => None,
        })
        .collect()
}

/// Per-overlay view state carried across frames.
#[derive(Debug, Clone)]
pub struct OverlayView {
    hovered: Option<usize>,
    panel_rect: Option<Rect>,
    /// Stands in for "somewhere else in the document" in click paths.
    document: ElementId,
}

impl Default for OverlayView {
    fn default() -> Self {
        Self {
            hovered: None,
            panel_rect: None,
            document: ElementId::new(),
        }
    }
}

impl OverlayView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Screen rect of the panel as of the last frame it was shown.
    pub fn panel_rect(&self) -> Option<Rect> {
        self.panel_rect
    }

    /// Paint `overlay` if visible, one cell per `paint` call, and return
    /// the pointer events produced this frame.
    pub fn show<P>(
        &mut self,
        ctx: &Context,
        overlay: &Overlay<P>,
        mut paint: impl FnMut(&mut Ui, &P, bool) -> Response,
    ) -> Vec<PointerEvent> {
        if !overlay.is_visible() {
            self.hovered = None;
            self.panel_rect = None;
            return Vec::new();
        }

        let container = overlay.container();
        let columns = overlay.grid().columns();
        let focused = overlay.focused_index();
        let position = overlay.position();
        let mut hovered = None;
        let mut clicked = None;

        let area = egui::Area::new(Id::new(("swatchgrid_overlay", container)))
            .fixed_pos(pos2(position.x as f32, position.y as f32))
            .order(Order::Foreground)
            .show(ctx, |ui| {
                panel_frame().show(ui, |ui| {
                    ui.spacing_mut().item_spacing = vec2(sizing::CELL_GAP, sizing::CELL_GAP);
                    ui.vertical(|ui| {
                        for (row, cells) in overlay.grid().rows().enumerate() {
                            ui.horizontal(|ui| {
                                for (col, payload) in cells.iter().enumerate() {
                                    let index = row * columns + col;
                                    let response = paint(ui, payload, focused == Some(index));
                                    if response.hovered() {
                                        hovered = Some(index);
                                    }
                                    if response.clicked() {
                                        clicked = Some(index);
                                    }
                                }
                            });
                        }
                    });
                });
            });
        self.panel_rect = Some(area.response.rect);

        let mut events = Vec::new();
        if hovered != self.hovered {
            if let Some(index) = self.hovered {
                events.push(PointerEvent::CellLeave {
                    overlay: container,
                    index,
                });
            }
            if let Some(index) = hovered {
                events.push(PointerEvent::CellEnter {
                    overlay: container,
                    index,
                });
            }
            self.hovered = hovered;
        }
        if let Some(index) = clicked {
            events.push(PointerEvent::CellClick {
                overlay: container,
                index,
            });
        }
        events
    }

    /// [`OverlayView::show`] with the standard swatch painter.
    pub fn show_swatches(&mut self, ctx: &Context, overlay: &Overlay<Swatch>) -> Vec<PointerEvent> {
        self.show(ctx, overlay, paint_swatch)
    }

    /// Build the document-level click event for this frame, if any.
    ///
    /// The path names the overlay container when the click landed on the
    /// panel, the anchor when it landed on `anchor_rect`, and the document
    /// otherwise.
    pub fn click_event<P>(
        &self,
        ctx: &Context,
        overlay: &Overlay<P>,
        anchor_rect: Rect,
    ) -> Option<PointerEvent> {
        let pos = ctx.input(|i| {
            if i.pointer.any_click() {
                i.pointer.interact_pos()
            } else {
                None
            }
        })?;

        let mut path = Vec::with_capacity(3);
        if self.panel_rect.is_some_and(|r| r.contains(pos)) {
            path.push(overlay.container());
        } else if anchor_rect.contains(pos) {
            path.push(overlay.anchor());
        }
        path.push(self.document);
        Some(PointerEvent::Click(ElementPath::new(path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swatchgrid_core::kurbo::Point;
    use swatchgrid_core::{DEFAULT_COLORS, Palette};

    type FrameOutput = (Vec<PointerEvent>, Option<PointerEvent>);

    fn run_frame(
        ctx: &Context,
        view: &mut OverlayView,
        overlay: &Overlay<Swatch>,
        anchor_rect: Rect,
        events: Vec<egui::Event>,
    ) -> FrameOutput {
        let input = egui::RawInput {
            events,
            ..Default::default()
        };
        let mut cells = Vec::new();
        let mut click = None;
        let _ = ctx.run(input, |ctx| {
            cells = view.show_swatches(ctx, overlay);
            click = view.click_event(ctx, overlay, anchor_rect);
        });
        (cells, click)
    }

    fn pointer_button(pos: egui::Pos2, pressed: bool) -> egui::Event {
        egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: egui::Modifiers::NONE,
        }
    }

    fn swatch_overlay() -> Overlay<Swatch> {
        let swatches = Palette::default().generate_swatches_lossy(DEFAULT_COLORS);
        Overlay::new(swatches, |_: &Swatch| {}, ElementId::new())
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(key_from_egui(egui::Key::Enter), Key::Enter);
        assert_eq!(key_from_egui(egui::Key::ArrowLeft), Key::ArrowLeft);
        assert_eq!(key_from_egui(egui::Key::Escape), Key::Escape);
        assert!(matches!(key_from_egui(egui::Key::A), Key::Other(_)));
    }

    #[test]
    fn test_collect_key_events() {
        let ctx = Context::default();
        let input = egui::RawInput {
            events: vec![
                egui::Event::Key {
                    key: egui::Key::ArrowDown,
                    physical_key: None,
                    pressed: true,
                    repeat: false,
                    modifiers: egui::Modifiers::NONE,
                },
                egui::Event::Key {
                    key: egui::Key::Escape,
                    physical_key: None,
                    pressed: false,
                    repeat: false,
                    modifiers: egui::Modifiers::NONE,
                },
            ],
            ..Default::default()
        };

        let mut keys = Vec::new();
        let _ = ctx.run(input, |ctx| {
            keys = ctx.input(collect_key_events);
        });
        assert_eq!(keys, vec![KeyEvent::Down(Key::ArrowDown), KeyEvent::Up(Key::Escape)]);
    }

    #[test]
    fn test_hidden_overlay_paints_nothing() {
        let ctx = Context::default();
        let overlay = swatch_overlay();
        let mut view = OverlayView::new();

        let mut events = Vec::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            events = view.show_swatches(ctx, &overlay);
        });
        assert!(events.is_empty());
        assert!(view.panel_rect().is_none());
    }

    #[test]
    fn test_visible_overlay_paints_panel_at_position() {
        let ctx = Context::default();
        let mut overlay = swatch_overlay();
        let anchor = overlay.anchor();
        overlay.show(anchor, Point::new(40.0, 60.0));
        let mut view = OverlayView::new();

        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            view.show_swatches(ctx, &overlay);
        });
        let rect = view.panel_rect().expect("panel painted");
        assert!(rect.width() > 0.0);
        assert!((rect.left() - 40.0).abs() < 1.0);
        assert!((rect.top() - 60.0).abs() < 1.0);

        overlay.hide();
        let mut events = Vec::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            events = view.show_swatches(ctx, &overlay);
        });
        assert!(events.is_empty());
        assert!(view.panel_rect().is_none());
    }

    #[test]
    fn test_pointer_input_becomes_cell_and_click_events() {
        let ctx = Context::default();
        let mut overlay = swatch_overlay();
        let anchor = overlay.anchor();
        let container = overlay.container();
        overlay.show(anchor, Point::new(40.0, 60.0));
        let anchor_rect = Rect::from_min_size(pos2(400.0, 400.0), vec2(20.0, 20.0));
        let mut view = OverlayView::new();

        // Layout settles over the first frames
        for _ in 0..2 {
            run_frame(&ctx, &mut view, &overlay, anchor_rect, Vec::new());
        }
        let panel = view.panel_rect().expect("panel painted");
        // Content starts inside the frame margin and stroke
        let first = panel.min + vec2(7.0 + sizing::CELL / 2.0, 7.0 + sizing::CELL / 2.0);
        let second = first + vec2(sizing::CELL + sizing::CELL_GAP, 0.0);

        let (cells, click) = run_frame(
            &ctx,
            &mut view,
            &overlay,
            anchor_rect,
            vec![egui::Event::PointerMoved(first)],
        );
        assert_eq!(
            cells,
            vec![PointerEvent::CellEnter {
                overlay: container,
                index: 0
            }]
        );
        assert!(click.is_none());

        run_frame(&ctx, &mut view, &overlay, anchor_rect, vec![pointer_button(first, true)]);
        let (cells, click) = run_frame(
            &ctx,
            &mut view,
            &overlay,
            anchor_rect,
            vec![pointer_button(first, false)],
        );
        assert_eq!(
            cells,
            vec![PointerEvent::CellClick {
                overlay: container,
                index: 0
            }]
        );
        assert_eq!(
            click,
            Some(PointerEvent::Click(ElementPath::new(vec![container, view.document])))
        );

        let (cells, _) = run_frame(
            &ctx,
            &mut view,
            &overlay,
            anchor_rect,
            vec![egui::Event::PointerMoved(second)],
        );
        assert_eq!(
            cells,
            vec![
                PointerEvent::CellLeave {
                    overlay: container,
                    index: 0
                },
                PointerEvent::CellEnter {
                    overlay: container,
                    index: 1
                },
            ]
        );

        let on_anchor = anchor_rect.center();
        run_frame(
            &ctx,
            &mut view,
            &overlay,
            anchor_rect,
            vec![egui::Event::PointerMoved(on_anchor), pointer_button(on_anchor, true)],
        );
        let (_, click) = run_frame(
            &ctx,
            &mut view,
            &overlay,
            anchor_rect,
            vec![pointer_button(on_anchor, false)],
        );
        assert_eq!(
            click,
            Some(PointerEvent::Click(ElementPath::new(vec![anchor, view.document])))
        );

        let elsewhere = pos2(700.0, 700.0);
        run_frame(
            &ctx,
            &mut view,
            &overlay,
            anchor_rect,
            vec![egui::Event::PointerMoved(elsewhere), pointer_button(elsewhere, true)],
        );
        let (_, click) = run_frame(
            &ctx,
            &mut view,
            &overlay,
            anchor_rect,
            vec![pointer_button(elsewhere, false)],
        );
        assert_eq!(click, Some(PointerEvent::Click(ElementPath::single(view.document))));
    }
}
