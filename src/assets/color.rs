use image::RgbaImage;

/// Blue must exceed both the red and the green mean by this factor to count as a cast.
pub const BLUE_CAST_RATIO: f64 = 1.2;
/// Gain applied to red and green when correcting a cast.
pub const WARM_GAIN: f64 = 1.2;

/// Mean of the R, G and B channels over every pixel (alpha ignored).
pub fn channel_means(img: &RgbaImage) -> [f64; 3] {
    let n = u64::from(img.width()) * u64::from(img.height());
    if n == 0 {
        return [0.0; 3];
    }
    let mut sum = [0u64; 3];
    for px in img.pixels() {
        for c in 0..3 {
            sum[c] += u64::from(px.0[c]);
        }
    }
    sum.map(|s| s as f64 / n as f64)
}

/// Return `true` when blue dominates both other channel means by [`BLUE_CAST_RATIO`].
pub fn has_blue_cast(means: [f64; 3]) -> bool {
    let [r, g, b] = means;
    b > r * BLUE_CAST_RATIO && b > g * BLUE_CAST_RATIO
}

/// Counteract a blue cast.
///
/// When [`has_blue_cast`] holds, blue is divided by `mean_b / ((mean_r + mean_g) / 2)` and red and
/// green are multiplied by [`WARM_GAIN`]; results are clamped to `[0, 255]` and truncated. Images
/// without a cast are returned unchanged. Alpha is never touched.
pub fn balance_blue_cast(img: &RgbaImage) -> RgbaImage {
    let means = channel_means(img);
    if !has_blue_cast(means) {
        return img.clone();
    }
    let [r, g, b] = means;
    let factor = b / ((r + g) / 2.0);
    tracing::debug!(factor, "correcting blue cast");

    let mut out = img.clone();
    for px in out.pixels_mut() {
        let [pr, pg, pb, _] = &mut px.0;
        *pb = (f64::from(*pb) / factor).clamp(0.0, 255.0) as u8;
        *pr = (f64::from(*pr) * WARM_GAIN).clamp(0.0, 255.0) as u8;
        *pg = (f64::from(*pg) * WARM_GAIN).clamp(0.0, 255.0) as u8;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
