use super::*;

#[test]
fn probe_missing_file_is_asset_not_found() {
    let err = probe_video(Path::new("/nonexistent/intro.mp4")).unwrap_err();
    assert!(matches!(err, VersusError::AssetNotFound { .. }));
}

#[test]
fn reader_rejects_zero_geometry_before_spawning() {
    let opts = VideoReadOpts {
        start_secs: 0.0,
        duration_secs: None,
        fps: 30,
        width: 0,
        height: 10,
    };
    assert!(matches!(
        VideoFrameReader::open(Path::new("/nonexistent.mp4"), &opts),
        Err(VersusError::Validation(_))
    ));
}

#[test]
fn unknown_tool_is_not_on_path() {
    assert!(!is_tool_on_path("definitely-not-a-real-binary-versus"));
}
