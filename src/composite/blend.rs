use crate::foundation::error::{VersusError, VersusResult};
use crate::foundation::math::{add_sat_u8, mul_div255_u8};
use crate::render::frame::FrameRGBA;

/// Premultiplied source-over for one pixel.
pub fn over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }
    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = add_sat_u8(src[i], mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

/// Draw premultiplied `src` (`src_width` x `src_height`) over `dst` with its top-left at
/// `(x, y)`.
///
/// Parts of the source outside the destination are clipped; an overlay entirely off-canvas is
/// a no-op.
pub fn composite_over_at(
    dst: &mut FrameRGBA,
    src: &[u8],
    src_width: u32,
    src_height: u32,
    x: i32,
    y: i32,
) -> VersusResult<()> {
    let expected = (src_width as usize) * (src_height as usize) * 4;
    if src.len() != expected {
        return Err(VersusError::validation(format!(
            "overlay buffer holds {} bytes, expected {expected} for {src_width}x{src_height}",
            src.len()
        )));
    }

    let (dw, dh) = (i64::from(dst.width), i64::from(dst.height));
    let (x, y) = (i64::from(x), i64::from(y));
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + i64::from(src_width)).min(dw);
    let y1 = (y + i64::from(src_height)).min(dh);
    if x0 >= x1 || y0 >= y1 {
        return Ok(());
    }

    let span = ((x1 - x0) as usize) * 4;
    for dy in y0..y1 {
        let sy = (dy - y) as usize;
        let sx = (x0 - x) as usize;
        let s_off = (sy * src_width as usize + sx) * 4;
        let d_off = ((dy as usize) * (dst.width as usize) + x0 as usize) * 4;
        let src_row = &src[s_off..s_off + span];
        let dst_row = &mut dst.data[d_off..d_off + span];
        for (d, s) in dst_row.chunks_exact_mut(4).zip(src_row.chunks_exact(4)) {
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
            d.copy_from_slice(&out);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/composite/blend.rs"]
mod tests;
