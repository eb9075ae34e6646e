use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PlotError::invalid_operation("x")
            .to_string()
            .contains("invalid operation:")
    );
    assert!(
        PlotError::singular_transform("x")
            .to_string()
            .contains("singular transform:")
    );
    assert!(PlotError::encode("x").to_string().contains("encode error:"));
    assert!(PlotError::config("x").to_string().contains("config error:"));
}

#[test]
fn io_errors_convert_into_stream_variant() {
    let base = std::io::Error::other("disk full");
    let err: PlotError = base.into();
    assert!(matches!(err, PlotError::Stream(_)));
    assert!(err.to_string().contains("disk full"));
}

#[test]
fn other_preserves_source() {
    let err = PlotError::Other(anyhow::anyhow!("boom"));
    assert!(err.to_string().contains("boom"));
}
