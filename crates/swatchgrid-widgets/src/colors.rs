//! Swatch painters for the color picker grid.

use egui::{
    Color32, CornerRadius, CursorIcon, FontId, Pos2, Response, Sense, Stroke, StrokeKind, Ui, Vec2,
    vec2,
};
use swatchgrid_core::{ColorValue, Rgb, Swatch};

use crate::{sizing, theme};

/// Convert a core color to an egui color.
pub fn to_color32(rgb: &Rgb) -> Color32 {
    Color32::from_rgb(rgb.r, rgb.g, rgb.b)
}

fn cell_size() -> Vec2 {
    vec2(sizing::CELL, sizing::CELL)
}

fn focus_ring(ui: &Ui, rect: egui::Rect) {
    ui.painter().rect_stroke(
        rect,
        CornerRadius::same(sizing::CORNER_RADIUS),
        Stroke::new(2.0, theme::FOCUS),
        StrokeKind::Inside,
    );
}

/// A rounded square filled with a color.
pub struct ColorSwatch<'a> {
    color: Color32,
    tooltip: &'a str,
    focused: bool,
    size: Vec2,
}

impl<'a> ColorSwatch<'a> {
    pub fn new(color: Color32, tooltip: &'a str) -> Self {
        Self {
            color,
            tooltip,
            focused: false,
            size: cell_size(),
        }
    }

    /// Draw the focus ring.
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    pub fn show(self, ui: &mut Ui) -> Response {
        let (rect, response) = ui.allocate_exact_size(self.size, Sense::click());

        if ui.is_rect_visible(rect) {
            ui.painter()
                .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), self.color);
            // Light colors need an outline against the panel
            if self.color.r() > 230 && self.color.g() > 230 && self.color.b() > 230 {
                ui.painter().rect_stroke(
                    rect,
                    CornerRadius::same(sizing::CORNER_RADIUS),
                    Stroke::new(1.0, Color32::from_gray(200)),
                    StrokeKind::Inside,
                );
            }
            if self.focused {
                focus_ring(ui, rect);
            }
        }

        response
            .on_hover_text(self.tooltip)
            .on_hover_cursor(CursorIcon::PointingHand)
    }
}

/// A "no color" swatch (white with red diagonal).
pub struct NoColorSwatch<'a> {
    tooltip: &'a str,
    focused: bool,
}

impl<'a> NoColorSwatch<'a> {
    pub fn new(tooltip: &'a str) -> Self {
        Self {
            tooltip,
            focused: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn show(self, ui: &mut Ui) -> Response {
        let (rect, response) = ui.allocate_exact_size(cell_size(), Sense::click());

        if ui.is_rect_visible(rect) {
            ui.painter()
                .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), Color32::WHITE);
            ui.painter().rect_stroke(
                rect,
                CornerRadius::same(sizing::CORNER_RADIUS),
                Stroke::new(1.0, Color32::from_gray(200)),
                StrokeKind::Inside,
            );

            let center = rect.center();
            let offset = rect.width() * 0.3;
            ui.painter().line_segment(
                [
                    Pos2::new(center.x - offset, center.y + offset),
                    Pos2::new(center.x + offset, center.y - offset),
                ],
                Stroke::new(2.0, Color32::from_rgb(239, 68, 68)),
            );

            if self.focused {
                focus_ring(ui, rect);
            }
        }

        response
            .on_hover_text(self.tooltip)
            .on_hover_cursor(CursorIcon::PointingHand)
    }
}

/// A keyword color the host styles itself, shown as a labelled chip.
pub struct KeywordSwatch<'a> {
    name: &'a str,
    focused: bool,
}

impl<'a> KeywordSwatch<'a> {
    pub fn new(name: &'a str) -> Self {
        Self {
            name,
            focused: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn show(self, ui: &mut Ui) -> Response {
        let (rect, response) = ui.allocate_exact_size(cell_size(), Sense::click());

        if ui.is_rect_visible(rect) {
            ui.painter().rect_filled(
                rect,
                CornerRadius::same(sizing::CORNER_RADIUS),
                Color32::from_gray(240),
            );
            let initial: String = self.name.chars().take(1).collect();
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                initial,
                FontId::proportional(10.0),
                theme::TEXT,
            );
            if self.focused {
                focus_ring(ui, rect);
            }
        }

        response
            .on_hover_text(self.name)
            .on_hover_cursor(CursorIcon::PointingHand)
    }
}

/// Paint one swatch cell.
pub fn paint_swatch(ui: &mut Ui, swatch: &Swatch, focused: bool) -> Response {
    match swatch {
        Swatch::Clear => NoColorSwatch::new("Remove color").focused(focused).show(ui),
        Swatch::Color {
            value: ColorValue::Rgb(rgb),
            ..
        } => {
            let tooltip = rgb.to_hex();
            ColorSwatch::new(to_color32(rgb), &tooltip)
                .focused(focused)
                .show(ui)
        }
        Swatch::Color {
            value: ColorValue::Keyword(name),
            ..
        } => KeywordSwatch::new(name).focused(focused).show(ui),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_color32() {
        assert_eq!(to_color32(&Rgb::new(51, 102, 255)), Color32::from_rgb(51, 102, 255));
    }
}
