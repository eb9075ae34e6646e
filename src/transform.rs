//! User-to-device coordinate mapping.
//!
//! A drawing state maps user coordinates into the normalized device frame (the unit square)
//! and the backend maps that square onto its own device coordinates. Both halves are kept so
//! that `space` queries stay independent of the attached backend.

use serde::{Deserialize, Serialize};

use crate::foundation::core::{Affine, Point, Vec2};
use crate::foundation::error::{PlotError, PlotResult};
use crate::foundation::math::EPS;

/// Properties of the full user-to-device matrix consulted by decomposition and line code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformFlags {
    /// Both singular values are equal: circles stay circles.
    pub uniform: bool,
    /// No shear or rotation: the matrix is diagonal.
    pub axes_preserved: bool,
    /// Positive determinant.
    pub nonreflecting: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    user_to_ndc: Affine,
    ndc_to_device: Affine,
    user_to_device: Affine,
    flags: TransformFlags,
}

impl Transform {
    /// Identity user space (the unit square) on a backend whose unit square maps through
    /// `ndc_to_device`.
    pub fn new(ndc_to_device: Affine) -> Self {
        let mut t = Self {
            user_to_ndc: Affine::IDENTITY,
            ndc_to_device,
            user_to_device: ndc_to_device,
            flags: TransformFlags {
                uniform: true,
                axes_preserved: true,
                nonreflecting: true,
            },
        };
        t.recompute();
        t
    }

    /// Map the rectangle with lower-left `(x0, y0)` and upper-right `(x1, y1)` onto the unit square.
    pub fn space(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) -> PlotResult<()> {
        self.space2(x0, y0, x1, y0, x0, y1)
    }

    /// Map the parallelogram with corners `p0`, `p1`, `p2` onto the unit square so that
    /// `p0 -> (0,0)`, `p1 -> (1,0)` and `p2 -> (0,1)`.
    pub fn space2(
        &mut self,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    ) -> PlotResult<()> {
        let ndc_to_user = Affine::new([x1 - x0, y1 - y0, x2 - x0, y2 - y0, x0, y0]);
        if is_singular(ndc_to_user) {
            return Err(PlotError::singular_transform(format!(
                "coordinate window ({x0}, {y0}), ({x1}, {y1}), ({x2}, {y2}) has zero area"
            )));
        }
        self.set_user_to_ndc(ndc_to_user.inverse());
        Ok(())
    }

    /// Replace the user-to-NDC matrix.
    pub fn set_matrix(&mut self, m: [f64; 6]) -> PlotResult<()> {
        let a = Affine::new(m);
        if is_singular(a) {
            return Err(PlotError::singular_transform(format!(
                "matrix {m:?} is not invertible"
            )));
        }
        self.set_user_to_ndc(a);
        Ok(())
    }

    /// Prepend `m` to the user-to-NDC matrix: user coordinates pass through `m` first.
    pub fn concat(&mut self, m: [f64; 6]) -> PlotResult<()> {
        let a = Affine::new(m);
        if is_singular(a) {
            return Err(PlotError::singular_transform(format!(
                "matrix {m:?} is not invertible"
            )));
        }
        self.set_user_to_ndc(self.user_to_ndc * a);
        Ok(())
    }

    fn set_user_to_ndc(&mut self, a: Affine) {
        self.user_to_ndc = a;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.user_to_device = self.ndc_to_device * self.user_to_ndc;
        let [a, b, c, d, _, _] = self.user_to_device.as_coeffs();
        let (smin, smax) = singular_values(self.user_to_device);
        self.flags = TransformFlags {
            uniform: smax - smin <= EPS * smax.max(1.0),
            axes_preserved: b == 0.0 && c == 0.0,
            nonreflecting: a * d - b * c >= 0.0,
        };
        tracing::trace!(flags = ?self.flags, "transform updated");
    }

    pub fn flags(&self) -> TransformFlags {
        self.flags
    }

    pub fn user_to_ndc(&self) -> Affine {
        self.user_to_ndc
    }

    pub fn user_to_device(&self) -> Affine {
        self.user_to_device
    }

    pub fn to_ndc(&self, p: Point) -> Point {
        self.user_to_ndc * p
    }

    pub fn to_device(&self, p: Point) -> Point {
        self.user_to_device * p
    }

    /// Map a displacement (no translation).
    pub fn vec_to_device(&self, v: Vec2) -> Vec2 {
        let [a, b, c, d, _, _] = self.user_to_device.as_coeffs();
        Vec2::new(a * v.x + c * v.y, b * v.x + d * v.y)
    }

    /// Geometric mean of the singular values of the user-to-device matrix, used to carry
    /// user-space widths and font sizes into device units.
    pub fn device_norm(&self) -> f64 {
        matrix_norm(self.user_to_device)
    }

    /// Same as [`Transform::device_norm`] but for the user-to-NDC half.
    pub fn ndc_norm(&self) -> f64 {
        matrix_norm(self.user_to_ndc)
    }

    /// `(min, max)` singular values of the user-to-device matrix.
    pub fn device_singular_values(&self) -> (f64, f64) {
        singular_values(self.user_to_device)
    }
}

fn is_singular(a: Affine) -> bool {
    let det = a.determinant();
    !det.is_finite() || det == 0.0
}

/// Geometric mean of the singular values of the linear part, i.e. `sqrt(|det|)`.
pub fn matrix_norm(a: Affine) -> f64 {
    a.determinant().abs().sqrt()
}

/// `(min, max)` singular values of the linear part of `a`.
pub fn singular_values(a: Affine) -> (f64, f64) {
    let [a, b, c, d, _, _] = a.as_coeffs();
    let s = a * a + b * b + c * c + d * d;
    let det = a * d - b * c;
    let disc = (s * s - 4.0 * det * det).max(0.0).sqrt();
    let max = ((s + disc) / 2.0).sqrt();
    let min = ((s - disc) / 2.0).max(0.0).sqrt();
    (min, max)
}

#[cfg(test)]
#[path = "../tests/unit/transform.rs"]
mod tests;
