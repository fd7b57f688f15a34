use crate::foundation::math::clip_u8;

/// Rounding bias added before the final shift (0.5 in the 7-bit scale).
pub(crate) const DITHER: i32 = 64;

/// Multi-tap vertical pass: blend intermediate rows into one 8-bit row.
///
/// `rows` may be shorter than `coeffs` at the bottom edge of the image; the
/// missing rows carry zero weight.
pub fn vscale_multi(coeffs: &[i16], rows: &[&[i16]], dst: &mut [u8]) {
    for (i, out) in dst.iter_mut().enumerate() {
        let val = accumulate(coeffs, rows, i);
        *out = clip_u8(val >> 19);
    }
}

/// Single-tap vertical pass.
pub fn vscale_single(src: &[i16], dst: &mut [u8]) {
    for (out, &s) in dst.iter_mut().zip(src) {
        *out = clip_u8((i32::from(s) + DITHER) >> 7);
    }
}

pub(crate) fn accumulate(coeffs: &[i16], rows: &[&[i16]], i: usize) -> i32 {
    rows.iter()
        .zip(coeffs)
        .fold(DITHER << 12, |acc, (row, &c)| {
            acc + i32::from(row[i]) * i32::from(c)
        })
}
