use super::*;
use image::Rgba;

fn solid(rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(4, 4, Rgba(rgba))
}

#[test]
fn neutral_image_is_unchanged() {
    let img = solid([120, 110, 100, 255]);
    assert!(!has_blue_cast(channel_means(&img)));
    assert_eq!(balance_blue_cast(&img), img);
}

#[test]
fn blue_cast_is_rebalanced() {
    // means r=40 g=60 b=150 -> factor = 150 / 50 = 3
    let img = solid([40, 60, 150, 200]);
    assert!(has_blue_cast(channel_means(&img)));
    let out = balance_blue_cast(&img);
    assert_eq!(out.get_pixel(0, 0).0, [48, 72, 50, 200]);
}

#[test]
fn gain_clamps_at_white() {
    // factor = 250 / 100 = 2.5
    let img = solid([100, 100, 250, 255]);
    let out = balance_blue_cast(&img);
    assert_eq!(out.get_pixel(1, 1).0, [120, 120, 100, 255]);

    let mut mixed = solid([10, 10, 200, 255]);
    mixed.put_pixel(0, 0, Rgba([250, 250, 250, 255]));
    let out = balance_blue_cast(&mixed);
    assert_eq!(out.get_pixel(0, 0).0[0], 255);
}

#[test]
fn blue_only_slightly_ahead_is_not_a_cast() {
    // 1.2 * 100 = 120; blue must be strictly greater.
    assert!(!has_blue_cast([100.0, 100.0, 120.0]));
    assert!(has_blue_cast([100.0, 100.0, 120.5]));
}

#[test]
fn empty_image_has_zero_means() {
    let img = RgbaImage::new(0, 0);
    assert_eq!(channel_means(&img), [0.0; 3]);
}
