//! Color resolution: fill desaturation, named colors and device quantization.
//!
//! Logical colors live in the drawing state at 16 bits per channel. The device form is
//! computed only when an object is about to be emitted, then cached until the logical
//! color changes.

use serde::{Deserialize, Serialize};

use crate::foundation::core::{Rgb24, Rgb48};
use crate::message::Messenger;

/// Backend-native color representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceColor {
    Rgb(Rgb24),
    /// Index into a fixed pen palette or a per-document color table.
    Indexed(u16),
}

/// Cached device form of one logical color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedColor {
    pub logical: Rgb48,
    pub device: DeviceColor,
}

/// Which drawing-state color a resolution request is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorRole {
    Pen,
    Fill,
    Background,
}

pub const MAX_FILL_LEVEL: u16 = 0xffff;

/// Apply a fill level to the nominal fill color.
///
/// Level 0 means no fill, level 1 the nominal color, and higher levels interpolate linearly
/// toward white, reaching it at `0xffff`.
pub fn desaturate(color: Rgb48, level: u16) -> Option<Rgb48> {
    if level == 0 {
        return None;
    }
    if level == 1 {
        return Some(color);
    }
    let frac = f64::from(level - 1) / f64::from(MAX_FILL_LEVEL - 1);
    let mix = |c: u16| {
        let c = f64::from(c);
        (c + frac * (65535.0 - c)).round().clamp(0.0, 65535.0) as u16
    };
    Some(Rgb48::new(mix(color.r), mix(color.g), mix(color.b)))
}

const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("green", [0, 255, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("cyan", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
    ("gray", [190, 190, 190]),
    ("grey", [190, 190, 190]),
    ("darkgray", [169, 169, 169]),
    ("lightgray", [211, 211, 211]),
    ("orange", [255, 165, 0]),
    ("brown", [165, 42, 42]),
    ("pink", [255, 192, 203]),
    ("purple", [160, 32, 240]),
    ("navy", [0, 0, 128]),
    ("darkgreen", [0, 100, 0]),
    ("gold", [255, 215, 0]),
    ("beige", [245, 245, 220]),
];

/// Look up a color by name (case and whitespace insensitive) or `#rrggbb` notation.
pub fn parse_color_name(name: &str) -> Option<Rgb48> {
    let s = name.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    let key: String = s
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    NAMED_COLORS
        .iter()
        .find(|(n, _)| *n == key)
        .map(|(_, [r, g, b])| Rgb48::from_rgb8(*r, *g, *b))
}

fn parse_hex(s: &str) -> Option<Rgb48> {
    if s.len() != 6 || !s.is_ascii() {
        return None;
    }
    let byte = |pair: &str| u8::from_str_radix(pair, 16).ok();
    Some(Rgb48::from_rgb8(
        byte(&s[0..2])?,
        byte(&s[2..4])?,
        byte(&s[4..6])?,
    ))
}

fn distance2(a: Rgb24, b: Rgb24) -> i32 {
    a.0.iter()
        .zip(b.0.iter())
        .map(|(&x, &y)| {
            let d = i32::from(x) - i32::from(y);
            d * d
        })
        .sum()
}

/// Nearest palette entry under squared Euclidean distance in the RGB cube.
///
/// White entries only match white input, so light colors never disappear into the page.
/// Returns `None` for an empty palette or one containing nothing but white.
pub fn nearest_index(palette: &[Rgb24], color: Rgb24) -> Option<usize> {
    if color == Rgb24::WHITE
        && let Some(i) = palette.iter().position(|&p| p == Rgb24::WHITE)
    {
        return Some(i);
    }
    palette
        .iter()
        .enumerate()
        .filter(|(_, p)| **p != Rgb24::WHITE)
        .min_by_key(|(_, p)| distance2(**p, color))
        .map(|(i, _)| i)
}

/// Growable per-document color table with a hard capacity.
///
/// Once full, new colors resolve to the nearest existing entry and a single warning
/// is reported for the document.
#[derive(Clone, Debug)]
pub struct ColorTable {
    entries: Vec<Rgb24>,
    capacity: usize,
    overflow_reported: bool,
}

impl ColorTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(1),
            overflow_reported: false,
        }
    }

    pub fn entries(&self) -> &[Rgb24] {
        &self.entries
    }

    pub fn get(&self, index: u16) -> Option<Rgb24> {
        self.entries.get(usize::from(index)).copied()
    }

    pub fn lookup_or_insert(&mut self, color: Rgb24, messenger: &Messenger) -> u16 {
        if let Some(i) = self.entries.iter().position(|&e| e == color) {
            return i as u16;
        }
        if self.entries.len() < self.capacity {
            self.entries.push(color);
            return (self.entries.len() - 1) as u16;
        }
        if !self.overflow_reported {
            self.overflow_reported = true;
            messenger.warning(&format!(
                "color table full ({} entries), substituting nearest colors",
                self.capacity
            ));
        }
        // A full table with only white entries still needs an answer.
        nearest_index(&self.entries, color).unwrap_or(0) as u16
    }
}

#[cfg(test)]
#[path = "../tests/unit/color.rs"]
mod tests;
