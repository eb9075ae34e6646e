use serde::{Deserialize, Serialize};

/// Metrics of a resolved font, in user units at the requested size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FontMetrics {
    /// Name of the font actually used, which may differ from the request.
    pub name: String,
    /// Size actually used; backends with discrete sizes round the request.
    pub true_size: f64,
    pub ascent: f64,
    pub descent: f64,
    pub cap_height: f64,
    /// Average horizontal advance of one character.
    pub advance: f64,
}

impl FontMetrics {
    /// Proportions of a generic sans-serif face, used when no backend metrics exist.
    pub fn generic(name: &str, size: f64) -> Self {
        Self::proportional(name, size, 0.718, 0.207, 0.718, 0.556)
    }

    /// Build metrics from per-em proportions.
    pub fn proportional(
        name: &str,
        size: f64,
        ascent: f64,
        descent: f64,
        cap_height: f64,
        advance: f64,
    ) -> Self {
        Self {
            name: name.to_owned(),
            true_size: size,
            ascent: ascent * size,
            descent: descent * size,
            cap_height: cap_height * size,
            advance: advance * size,
        }
    }

    pub fn string_width(&self, s: &str) -> f64 {
        self.advance * s.chars().count() as f64
    }
}

/// Horizontal justification of a label relative to the cursor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HJust {
    #[default]
    Left,
    Center,
    Right,
}

impl HJust {
    /// `l`, `c` or `r`; anything else resolves to left.
    pub fn from_char(c: char) -> Self {
        match c {
            'c' => Self::Center,
            'r' => Self::Right,
            _ => Self::Left,
        }
    }

    /// Fraction of the string width lying left of the cursor.
    pub fn fraction(self) -> f64 {
        match self {
            Self::Left => 0.0,
            Self::Center => 0.5,
            Self::Right => 1.0,
        }
    }
}

/// Vertical justification of a label relative to the cursor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VJust {
    Bottom,
    #[default]
    Baseline,
    Center,
    CapLine,
    Top,
}

impl VJust {
    /// `b`, `x`, `c`, `C` or `t`; anything else resolves to the baseline.
    pub fn from_char(c: char) -> Self {
        match c {
            'b' => Self::Bottom,
            'c' => Self::Center,
            'C' => Self::CapLine,
            't' => Self::Top,
            _ => Self::Baseline,
        }
    }

    /// Offset from the cursor to the baseline along the text's up direction.
    pub fn baseline_shift(self, m: &FontMetrics) -> f64 {
        match self {
            Self::Bottom => m.descent,
            Self::Baseline => 0.0,
            Self::Center => (m.descent - m.ascent) / 2.0,
            Self::CapLine => -m.cap_height,
            Self::Top => -m.ascent,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/text.rs"]
mod tests;
