//! Color swatch payloads for the picker overlay.
//!
//! Turns configured color strings (hex, `rgb(...)` or keyword names) into
//! [`Swatch`] payloads and maps computed style strings back to stable
//! [`SwatchId`]s so the overlay can pre-focus the current color.

use std::collections::HashMap;
use std::fmt;

use peniko::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from parsing color strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("Empty color value")]
    Empty,
    #[error("Invalid hex color: {0}")]
    InvalidHex(String),
    #[error("Invalid rgb() color: {0}")]
    InvalidRgb(String),
    #[error("Invalid color keyword: {0}")]
    InvalidKeyword(String),
}

/// Result type for palette operations.
pub type PaletteResult<T> = Result<T, PaletteError>;

/// The reference palette.
pub const DEFAULT_COLORS: &[&str] = &[
    "#FFEE00", "rgb(255,0,0)", "#FFFF00", "#FFFFFF",
    "#000000", "#993300", "#333300", "#000080", "#333399", "#333333",
    "#800000", "#FF6600", "#FFFF99", "#CCFFFF", "#99CCFF", "#FFFFFF",
    "#808000", "#008000", "#008080", "#0000FF", "#666699", "#808080",
    "#FF0000", "#FF9900", "#99CC00", "#339966", "#33CCCC", "#3366FF",
    "#800080", "#999999", "#FF00FF", "#FFCC00", "#FFFF00", "#00FF00",
    "#00FFFF", "#00CCFF", "#993366", "#C0C0C0", "#FF99CC", "#FFCC99",
];

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::from_rgb8(rgb.r, rgb.g, rgb.b)
    }
}

impl From<Color> for Rgb {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b)
    }
}

/// A configured color: a concrete RGB value or a keyword the host
/// styles itself (e.g. a class name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorValue {
    Rgb(Rgb),
    Keyword(String),
}

impl ColorValue {
    /// Parse `#rgb`, `#rrggbb`, `rgb(r, g, b)`, `rgba(r, g, b, a)` or a keyword.
    pub fn parse(input: &str) -> PaletteResult<Self> {
        let s = input.trim();
        if s.is_empty() {
            return Err(PaletteError::Empty);
        }

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex)
                .map(Self::Rgb)
                .ok_or_else(|| PaletteError::InvalidHex(input.to_string()));
        }

        let lower = s.to_ascii_lowercase();
        if lower.starts_with("rgb") {
            return parse_rgb_function(&lower)
                .map(Self::Rgb)
                .ok_or_else(|| PaletteError::InvalidRgb(input.to_string()));
        }

        if s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            Ok(Self::Keyword(s.to_string()))
        } else {
            Err(PaletteError::InvalidKeyword(input.to_string()))
        }
    }

    pub fn rgb(&self) -> Option<Rgb> {
        match self {
            Self::Rgb(rgb) => Some(*rgb),
            Self::Keyword(_) => None,
        }
    }
}

impl fmt::Display for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb(rgb) => f.write_str(&rgb.to_hex()),
            Self::Keyword(name) => f.write_str(name),
        }
    }
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
            Some(Rgb::new(digit(0)?, digit(1)?, digit(2)?))
        }
        6 => {
            let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            Some(Rgb::new(pair(0)?, pair(2)?, pair(4)?))
        }
        _ => None,
    }
}

fn parse_rgb_function(s: &str) -> Option<Rgb> {
    let (name, rest) = s.split_once('(')?;
    let args = rest.strip_suffix(')')?;
    let expected = match name.trim() {
        "rgb" => 3,
        "rgba" => 4,
        _ => return None,
    };

    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != expected {
        return None;
    }
    if expected == 4 && !is_alpha(parts[3]) {
        return None;
    }
    let channel = |i: usize| parts[i].parse::<u8>().ok();
    Some(Rgb::new(channel(0)?, channel(1)?, channel(2)?))
}

/// Alpha is a number in `0..=1` or a percentage in `0%..=100%`.
fn is_alpha(s: &str) -> bool {
    let (number, max) = match s.strip_suffix('%') {
        Some(pct) => (pct.trim_end(), 100.0),
        None => (s, 1.0),
    };
    number
        .parse::<f64>()
        .is_ok_and(|a| (0.0..=max).contains(&a))
}

/// Stable identifier of a swatch, `swatch{n}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwatchId(pub String);

impl SwatchId {
    pub fn from_index(index: usize) -> Self {
        Self(format!("swatch{index}"))
    }
}

impl fmt::Display for SwatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A cell payload of the color picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Swatch {
    Color { id: SwatchId, value: ColorValue },
    /// Removes the color instead of applying one.
    Clear,
}

impl Swatch {
    pub fn id(&self) -> Option<&SwatchId> {
        match self {
            Self::Color { id, .. } => Some(id),
            Self::Clear => None,
        }
    }

    pub fn is_clear(&self) -> bool {
        matches!(self, Self::Clear)
    }
}

/// Reference palette used to assign stable swatch ids.
#[derive(Debug, Clone)]
pub struct Palette {
    len: usize,
    by_name: HashMap<String, SwatchId>,
    by_hex: HashMap<String, SwatchId>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(DEFAULT_COLORS.iter().copied())
    }
}

impl Palette {
    /// Build the reverse index. Later duplicates take over the id.
    pub fn new<I, S>(colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut len = 0;
        let mut by_name = HashMap::new();
        let mut by_hex = HashMap::new();
        for (i, color) in colors.into_iter().enumerate() {
            let color = color.as_ref();
            let id = SwatchId::from_index(i);
            if let Ok(ColorValue::Rgb(rgb)) = ColorValue::parse(color) {
                by_hex.insert(rgb.to_hex(), id.clone());
            }
            by_name.insert(color.to_string(), id);
            len = i + 1;
        }
        Self { len, by_name, by_hex }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reverse lookup from a color string (configured or computed style).
    pub fn swatch_id(&self, color: &str) -> Option<SwatchId> {
        if let Some(id) = self.by_name.get(color) {
            return Some(id.clone());
        }
        match ColorValue::parse(color) {
            Ok(ColorValue::Rgb(rgb)) => self.by_hex.get(&rgb.to_hex()).cloned(),
            _ => None,
        }
    }

    /// Build payloads for `colors`, followed by the clear marker.
    ///
    /// Colors outside the reference palette get ids numbered after it.
    pub fn generate_swatches<S: AsRef<str>>(&self, colors: &[S]) -> PaletteResult<Vec<Swatch>> {
        let mut swatches = Vec::with_capacity(colors.len() + 1);
        let mut extra = self.len;
        for color in colors {
            let color = color.as_ref();
            let value = ColorValue::parse(color)?;
            swatches.push(Swatch::Color {
                id: self.id_or_next(color, &mut extra),
                value,
            });
        }
        swatches.push(Swatch::Clear);
        Ok(swatches)
    }

    /// Like [`Palette::generate_swatches`] but skips invalid entries.
    pub fn generate_swatches_lossy<S: AsRef<str>>(&self, colors: &[S]) -> Vec<Swatch> {
        let mut swatches = Vec::with_capacity(colors.len() + 1);
        let mut extra = self.len;
        for color in colors {
            let color = color.as_ref();
            match ColorValue::parse(color) {
                Ok(value) => swatches.push(Swatch::Color {
                    id: self.id_or_next(color, &mut extra),
                    value,
                }),
                Err(e) => log::warn!("Skipping palette entry: {}", e),
            }
        }
        swatches.push(Swatch::Clear);
        swatches
    }

    fn id_or_next(&self, color: &str, extra: &mut usize) -> SwatchId {
        self.swatch_id(color).unwrap_or_else(|| {
            let id = SwatchId::from_index(*extra);
            *extra += 1;
            id
        })
    }
}

/// Position of the swatch with `id` in `swatches`.
pub fn index_of(swatches: &[Swatch], id: &SwatchId) -> Option<usize> {
    swatches.iter().position(|s| s.id() == Some(id))
}
