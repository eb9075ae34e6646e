use super::*;

fn identity_flags() -> TransformFlags {
    TransformFlags {
        uniform: true,
        axes_preserved: true,
        nonreflecting: true,
    }
}

fn ctx(aligned: bool, standalone: bool) -> ShapeContext {
    ShapeContext {
        flags: identity_flags(),
        aligned,
        standalone,
    }
}

#[test]
fn rotated_ellipse_on_axis_preserving_backend_is_decomposed() {
    let caps = Capabilities {
        ellipses: Capability::AxisPreservingOnly,
        ellarcs: Capability::AxisPreservingOnly,
        cubics: Capability::Any,
        ..Capabilities::polylines_only()
    };
    let s = caps.select(ShapeKind::Ellipse, &ctx(false, true));
    assert_ne!(s, Strategy::Primitive);
    assert_ne!(s, Strategy::EllipticArcs);
    assert_eq!(s, Strategy::Cubics);

    assert_eq!(
        caps.select(ShapeKind::Ellipse, &ctx(true, true)),
        Strategy::Primitive
    );
}

#[test]
fn fallback_chain_reaches_polygon() {
    let caps = Capabilities::polylines_only();
    for kind in [
        ShapeKind::Box,
        ShapeKind::Circle,
        ShapeKind::Ellipse,
        ShapeKind::Arc,
        ShapeKind::EllArc,
        ShapeKind::Quad,
        ShapeKind::Cubic,
    ] {
        assert_eq!(caps.select(kind, &ctx(true, true)), Strategy::Polygon);
    }
}

#[test]
fn circle_prefers_arcs_when_primitive_circle_is_missing() {
    let caps = Capabilities {
        arcs: Capability::AxisPreservingOnly,
        ..Capabilities::polylines_only()
    };
    assert_eq!(
        caps.select(ShapeKind::Circle, &ctx(true, true)),
        Strategy::CircularArcs
    );

    let sheared = ShapeContext {
        flags: TransformFlags {
            uniform: false,
            axes_preserved: true,
            nonreflecting: true,
        },
        ..ctx(true, true)
    };
    assert_eq!(caps.select(ShapeKind::Circle, &sheared), Strategy::Polygon);
}

#[test]
fn curves_inside_paths_need_mixed_path_support() {
    let caps = Capabilities {
        mixed_paths: false,
        ..Capabilities::everything()
    };
    assert_eq!(
        caps.select(ShapeKind::Arc, &ctx(true, true)),
        Strategy::Primitive
    );
    assert_eq!(
        caps.select(ShapeKind::Arc, &ctx(true, false)),
        Strategy::Polygon
    );
}
