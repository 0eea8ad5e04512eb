//! egui rendering for SwatchGrid overlays with Tailwind-inspired styling.
//!
//! - **Colors**: swatch painters for color, keyword and "no color" cells
//! - **Menu**: the floating panel frame
//! - **Overlay view**: projects an overlay's state into an egui area and
//!   turns egui input back into overlay events

pub mod colors;
pub mod menu;
pub mod overlay_view;

pub use colors::{ColorSwatch, KeywordSwatch, NoColorSwatch, paint_swatch, to_color32};
pub use menu::panel_frame;
pub use overlay_view::{OverlayView, collect_key_events, key_from_egui};

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Grid cell size
    pub const CELL: f32 = 16.0;
    /// Gap between cells
    pub const CELL_GAP: f32 = 2.0;
    /// Standard corner radius
    pub const CORNER_RADIUS: u8 = 4;
    /// Panel corner radius
    pub const PANEL_RADIUS: u8 = 8;
}

/// Standard colors used across widgets.
pub mod theme {
    use egui::Color32;

    /// Text color (dark gray)
    pub const TEXT: Color32 = Color32::from_rgb(60, 60, 60);
    /// Border color
    pub const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
    /// Focus ring color
    pub const FOCUS: Color32 = Color32::from_gray(30);
    /// Panel background
    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(250, 250, 252, 250);
}
