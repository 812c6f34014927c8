use crate::foundation::math::premultiply_rgba8_in_place;
use crate::timeline::layers::ChromaKey;

/// Matte opacity for a pixel at RGB distance `d` from the key color.
///
/// `d^s / (thr^s + d^s)`: 0 on the key, 1/2 at the threshold, approaching 1 far from it.
pub fn matte_alpha(d: f64, key: &ChromaKey) -> f64 {
    if d <= 0.0 {
        return 0.0;
    }
    // Ratio form keeps large stiffness exponents finite.
    let r = (key.threshold / d).powf(key.stiffness);
    if r.is_finite() { 1.0 / (1.0 + r) } else { 0.0 }
}

/// Turn pixels close to `key.color` transparent.
///
/// Input is straight-alpha RGBA8 as decoded; output is premultiplied RGBA8 with the matte
/// multiplied into the existing alpha.
pub fn chroma_key_in_place(rgba: &mut [u8], key: &ChromaKey) {
    let [kr, kg, kb] = key.color.map(f64::from);
    for px in rgba.chunks_exact_mut(4) {
        let dr = f64::from(px[0]) - kr;
        let dg = f64::from(px[1]) - kg;
        let db = f64::from(px[2]) - kb;
        let d = (dr * dr + dg * dg + db * db).sqrt();
        let a = f64::from(px[3]) * matte_alpha(d, key);
        px[3] = a.round().clamp(0.0, 255.0) as u8;
    }
    premultiply_rgba8_in_place(rgba);
}

#[cfg(test)]
#[path = "../../tests/unit/composite/chroma.rs"]
mod tests;
