//! SwatchGrid Core Library
//!
//! Platform-agnostic logic for a grid-selection overlay: a floating panel
//! of selectable cells driven by pointer and keyboard, anchored near a
//! trigger element, reporting the picked cell through a handler.

pub mod config;
pub mod dispatch;
pub mod grid;
pub mod input;
pub mod overlay;
pub mod palette;
pub mod position;
pub mod registry;
pub mod schedule;
pub mod textcolor;

pub use kurbo;

pub use config::{ConfigError, ConfigResult, TextColorConfig};
pub use dispatch::{EventDispatcher, EventHandler, HandlerId, Priority};
pub use grid::{CellGrid, CellPos, DEFAULT_COLUMNS, Direction};
pub use input::{DocumentEvent, ElementId, ElementPath, Key, KeyEvent, PointerEvent, Propagation};
pub use overlay::{Focus, FocusSource, Overlay, SelectionHandler, Visibility};
pub use palette::{ColorValue, DEFAULT_COLORS, Palette, PaletteError, Rgb, Swatch, SwatchId};
pub use position::{Layout, PositionMode, calculate_offset, offset_below, offset_of};
pub use registry::{ContextId, OverlayRegistry};
pub use schedule::Scheduler;
pub use textcolor::{ButtonState, TextColorController, TextColorHost};
