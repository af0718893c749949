use std::fs;
use std::io;
use std::path::Path;

use ratatui::style::Color;
use serde::Deserialize;
use thiserror::Error;

/// A 24-bit color, independent of any rendering backend.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parses `#RRGGBB`.
    #[must_use]
    pub fn parse_hex(value: &str) -> Option<Self> {
        let hex = value.strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let red = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let green = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let blue = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Self::new(red, green, blue))
    }

    /// Channel-wise midpoint of two colors.
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        let mid = |a: u8, b: u8| ((u16::from(a) + u16::from(b)) / 2) as u8;
        Self::new(
            mid(self.red, other.red),
            mid(self.green, other.green),
            mid(self.blue, other.blue),
        )
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Rgb(rgb.red, rgb.green, rgb.blue)
    }
}

/// Display-only colors attached to a snake. Simulation never reads these.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Palette {
    pub body: Rgb,
    pub tail: Rgb,
}

pub const PALETTE_GREEN: Palette = Palette {
    body: Rgb::new(0, 228, 48),
    tail: Rgb::new(0, 117, 44),
};

pub const PALETTE_VIOLET: Palette = Palette {
    body: Rgb::new(200, 122, 255),
    tail: Rgb::new(112, 31, 126),
};

/// Default palette per player slot, cycled when there are more players.
pub const DEFAULT_PALETTES: &[Palette] = &[PALETTE_GREEN, PALETTE_VIOLET];

#[must_use]
pub fn default_palette(player: usize) -> Palette {
    DEFAULT_PALETTES[player % DEFAULT_PALETTES.len()]
}

#[derive(Debug, Deserialize)]
struct PaletteFile {
    body: String,
    tail: String,
}

#[derive(Debug, Error)]
pub enum PaletteError {
    #[error("failed to read palette file: {0}")]
    Io(#[from] io::Error),
    #[error("palette file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("palette field `{field}` is not a #RRGGBB color: {value:?}")]
    InvalidColor { field: &'static str, value: String },
}

/// Parses a palette from JSON of the form `{"body": "#RRGGBB", "tail": "#RRGGBB"}`.
pub fn parse_palette(raw: &str) -> Result<Palette, PaletteError> {
    let file = serde_json::from_str::<PaletteFile>(raw)?;

    let color = |field: &'static str, value: String| {
        Rgb::parse_hex(&value).ok_or(PaletteError::InvalidColor { field, value })
    };

    Ok(Palette {
        body: color("body", file.body)?,
        tail: color("tail", file.tail)?,
    })
}

pub fn load_palette(path: &Path) -> Result<Palette, PaletteError> {
    let raw = fs::read_to_string(path)?;
    parse_palette(&raw)
}
