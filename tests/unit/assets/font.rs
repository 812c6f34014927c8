use super::*;

fn system_font() -> Option<Vec<u8>> {
    let path = resolve_font_path(None).ok()?;
    std::fs::read(path).ok()
}

#[test]
fn configured_font_must_exist() {
    let err = resolve_font_path(Some(Path::new("/nonexistent/font.ttf"))).unwrap_err();
    assert!(matches!(err, VersusError::AssetNotFound { .. }));
}

#[test]
fn shaping_scales_with_font_size() {
    let Some(bytes) = system_font() else {
        eprintln!("skipping: no system font");
        return;
    };
    let mut engine = TextLayoutEngine::new(&bytes).unwrap();
    let small = engine.shape("1121", 50.0).unwrap();
    let large = engine.shape("1121", 100.0).unwrap();
    assert_eq!(small.glyphs.len(), 4);
    assert!(large.width > small.width * 1.5);
    assert!(large.height > small.height);
    assert!(engine.shape("x", 0.0).is_err());
}

#[test]
fn garbage_font_bytes_are_rejected() {
    assert!(TextLayoutEngine::new(b"not a font").is_err());
}
