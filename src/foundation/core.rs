use serde::{Deserialize, Serialize};

pub use kurbo::{Affine, Point, Vec2};

/// An RGB color with 16 bits per channel, the precision used at the drawing-API boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb48 {
    pub r: u16,
    pub g: u16,
    pub b: u16,
}

impl Rgb48 {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(0xffff, 0xffff, 0xffff);

    pub const fn new(r: u16, g: u16, b: u16) -> Self {
        Self { r, g, b }
    }

    /// Build from caller-supplied channels. Any channel above `0xffff` (or negative)
    /// makes the whole color invalid, in which case `None` is returned and the caller
    /// substitutes its default.
    pub fn from_channels(r: i32, g: i32, b: i32) -> Option<Self> {
        let ch = |c: i32| u16::try_from(c).ok();
        Some(Self::new(ch(r)?, ch(g)?, ch(b)?))
    }

    /// Widen an 8-bit-per-channel color (`0xab` becomes `0xabab`).
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        let w = |c: u8| u16::from(c) << 8 | u16::from(c);
        Self::new(w(r), w(g), w(b))
    }

    pub fn to_rgb24(self) -> Rgb24 {
        Rgb24([
            (self.r >> 8) as u8,
            (self.g >> 8) as u8,
            (self.b >> 8) as u8,
        ])
    }

    pub fn is_white(self) -> bool {
        self == Self::WHITE
    }

    /// Gray level (ITU-R 601 luma weights), used when color emulation is requested.
    pub fn to_gray(self) -> Self {
        let y = 0.299 * f64::from(self.r) + 0.587 * f64::from(self.g) + 0.114 * f64::from(self.b);
        let y = y.round().clamp(0.0, 65535.0) as u16;
        Self::new(y, y, y)
    }
}

/// Quantized 24-bit RGB, the most common device representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb24(pub [u8; 3]);

impl Rgb24 {
    pub const WHITE: Self = Self([0xff, 0xff, 0xff]);

    pub fn hex(self) -> String {
        let [r, g, b] = self.0;
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
