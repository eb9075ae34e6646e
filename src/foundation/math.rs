use crate::foundation::core::{Point, Vec2};

/// Relative tolerance used when deciding whether a transform is uniform or a value is zero.
pub(crate) const EPS: f64 = 1e-9;

/// Round to the nearest integer, saturating at the `i32` range.
pub(crate) fn iround(x: f64) -> i32 {
    if x.is_nan() {
        return 0;
    }
    x.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

/// True when `deg` is an integer multiple of 90.
pub(crate) fn is_quarter_turn(deg: f64) -> bool {
    let r = deg.rem_euclid(90.0);
    r.abs() < 1e-9 || (90.0 - r).abs() < 1e-9
}

/// 2D cross product `a x b`.
pub(crate) fn cross(a: Vec2, b: Vec2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Nearest point to `c` on the perpendicular bisector of `p0`-`p1`.
pub(crate) fn project_onto_bisector(p0: Point, p1: Point, c: Point) -> Point {
    let mid = p0.midpoint(p1);
    let chord = p1 - p0;
    let normal = Vec2::new(-chord.y, chord.x);
    let len2 = normal.hypot2();
    if len2 == 0.0 {
        return c;
    }
    let t = (c - mid).dot(normal) / len2;
    mid + normal * t
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
