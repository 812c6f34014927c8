use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        VersusError::invalid_spec("x")
            .to_string()
            .contains("invalid comparison spec:")
    );
    assert!(
        VersusError::encoding("x")
            .to_string()
            .contains("encoding error:")
    );
    assert!(
        VersusError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        VersusError::asset_not_found("portrait for 'messi'", "images/messi.jpg")
            .to_string()
            .contains("images/messi.jpg")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = VersusError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn in_stage_keeps_innermost_stage_and_root_unwraps() {
    let err = VersusError::encoding("muxer died")
        .in_stage(RunState::Encoding)
        .in_stage(RunState::Compositing);
    match &err {
        VersusError::Composition { stage, .. } => assert_eq!(*stage, RunState::Encoding),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(matches!(err.root(), VersusError::Encoding(_)));
    assert!(err.to_string().contains("muxer died"));
}
