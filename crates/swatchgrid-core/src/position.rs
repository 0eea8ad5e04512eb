//! Overlay positioning relative to an anchor element.

use std::convert::Infallible;
use std::str::FromStr;

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::input::ElementId;

/// How the overlay container is positioned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionMode {
    /// Document coordinates; the overlay scrolls with the page.
    #[default]
    Absolute,
    /// Viewport coordinates; the overlay tracks the viewport.
    Fixed,
}

impl FromStr for PositionMode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s.trim().eq_ignore_ascii_case("fixed") {
            Self::Fixed
        } else {
            Self::Absolute
        })
    }
}

/// Host layout queries needed to place the overlay.
pub trait Layout {
    /// The element's rectangle in document coordinates.
    fn page_rect(&self, element: ElementId) -> Option<Rect>;

    /// Current scroll position of the document (x = left, y = top).
    fn scroll(&self) -> Vec2;
}

/// Convert a document offset to the coordinate space of `mode`.
///
/// In fixed mode the scroll position is subtracted, turning document
/// coordinates into viewport coordinates.
pub fn calculate_offset(page_offset: Point, scroll: Vec2, mode: PositionMode) -> Point {
    match mode {
        PositionMode::Fixed => page_offset - scroll,
        PositionMode::Absolute => page_offset,
    }
}

/// Offset of `element`'s top-left corner in the coordinate space of `mode`.
pub fn offset_of<L: Layout + ?Sized>(
    layout: &L,
    element: ElementId,
    mode: PositionMode,
) -> Option<Point> {
    let rect = layout.page_rect(element)?;
    Some(calculate_offset(rect.origin(), layout.scroll(), mode))
}

/// Offset directly below `element`, `gap` units under its bottom edge.
pub fn offset_below<L: Layout + ?Sized>(
    layout: &L,
    element: ElementId,
    mode: PositionMode,
    gap: f64,
) -> Option<Point> {
    let rect = layout.page_rect(element)?;
    Some(calculate_offset(
        Point::new(rect.x0, rect.y1 + gap),
        layout.scroll(),
        mode,
    ))
}
