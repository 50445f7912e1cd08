//! Colors for route overlays.

use serde::{Deserialize, Serialize};

/// Color representation supporting multiple formats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    /// Explicit RGBA
    Rgba { r: u8, g: u8, b: u8, a: u8 },

    /// RGB array: [r, g, b] or [r, g, b, a]
    Array(Vec<u8>),

    /// Hex string "#RRGGBB" / "#RRGGBBAA", or a color name
    Text(String),
}

impl Color {
    pub fn transparent() -> Self {
        Color::Rgba {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgba { r, g, b, a: 255 }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Color::Text(s.into())
    }

    /// Convert to RGBA tuple. Unparseable input falls back to opaque black.
    pub fn to_rgba(&self) -> (u8, u8, u8, u8) {
        match self {
            Color::Rgba { r, g, b, a } => (*r, *g, *b, *a),
            Color::Array(arr) => {
                let r = arr.first().copied().unwrap_or(0);
                let g = arr.get(1).copied().unwrap_or(0);
                let b = arr.get(2).copied().unwrap_or(0);
                let a = arr.get(3).copied().unwrap_or(255);
                (r, g, b, a)
            }
            Color::Text(s) if s.starts_with('#') => parse_hex_color(s),
            Color::Text(name) => named_color(name),
        }
    }
}

fn parse_hex_color(s: &str) -> (u8, u8, u8, u8) {
    let s = s.trim_start_matches('#');
    let channel = |i: usize| {
        s.get(i..i + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
            .unwrap_or(0)
    };

    match s.len() {
        6 => (channel(0), channel(2), channel(4), 255),
        8 => (channel(0), channel(2), channel(4), channel(6)),
        3 => {
            // #RGB shorthand
            let short = |i: usize| {
                s.get(i..i + 1)
                    .and_then(|c| u8::from_str_radix(c, 16).ok())
                    .map(|v| v * 17)
                    .unwrap_or(0)
            };
            (short(0), short(1), short(2), 255)
        }
        _ => (0, 0, 0, 255),
    }
}

fn named_color(name: &str) -> (u8, u8, u8, u8) {
    match name.to_lowercase().as_str() {
        "transparent" => (0, 0, 0, 0),
        "black" => (0, 0, 0, 255),
        "white" => (255, 255, 255, 255),
        "red" => (255, 0, 0, 255),
        // CSS green, not lime
        "green" => (0, 128, 0, 255),
        "lime" => (0, 255, 0, 255),
        "blue" => (0, 0, 255, 255),
        "yellow" => (255, 255, 0, 255),
        "cyan" => (0, 255, 255, 255),
        "magenta" => (255, 0, 255, 255),
        "orange" => (255, 165, 0, 255),
        "purple" => (128, 0, 128, 255),
        "gray" | "grey" => (128, 128, 128, 255),
        _ => (0, 0, 0, 255),
    }
}
