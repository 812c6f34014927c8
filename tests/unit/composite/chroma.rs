use super::*;

#[test]
fn key_color_becomes_fully_transparent() {
    let mut px = vec![0, 0, 0, 255];
    chroma_key_in_place(&mut px, &ChromaKey::default());
    assert_eq!(px, vec![0, 0, 0, 0]);
}

#[test]
fn far_colors_stay_opaque() {
    let mut px = vec![255, 255, 255, 255, 200, 30, 30, 255];
    chroma_key_in_place(&mut px, &ChromaKey::default());
    assert_eq!(px, vec![255, 255, 255, 255, 200, 30, 30, 255]);
}

#[test]
fn threshold_distance_is_half_transparent() {
    let key = ChromaKey::default();
    assert!((matte_alpha(50.0, &key) - 0.5).abs() < 1e-12);

    // (30, 40, 0) is exactly 50 away from black.
    let mut px = vec![30, 40, 0, 255];
    chroma_key_in_place(&mut px, &key);
    assert_eq!(px[3], 128);
    assert_eq!(px[0], 15);
}

#[test]
fn matte_is_monotonic_in_distance() {
    let key = ChromaKey::default();
    let mut prev = 0.0;
    for d in 0..=441 {
        let a = matte_alpha(f64::from(d), &key);
        assert!(a >= prev);
        assert!((0.0..=1.0).contains(&a));
        prev = a;
    }
}

#[test]
fn custom_key_color_is_respected() {
    let key = ChromaKey {
        color: [0, 255, 0],
        ..ChromaKey::default()
    };
    let mut px = vec![0, 255, 0, 255, 0, 0, 0, 255];
    chroma_key_in_place(&mut px, &key);
    assert_eq!(px[3], 0);
    assert_eq!(px[7], 255);
}
