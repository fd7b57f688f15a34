/// Horizontal 8-bit to 15-bit scale of one line.
///
/// `dst[i]` is the dot product of `coeffs[i*tap_count..]` with the source
/// samples starting at `positions[i]`, shifted right by 7 and capped at the
/// 15-bit signed maximum. Taps that would read past `src` carry zero weight
/// and are skipped.
pub fn hscale(dst: &mut [i16], src: &[u8], coeffs: &[i16], positions: &[i32], tap_count: usize) {
    for ((out, row), &pos) in dst
        .iter_mut()
        .zip(coeffs.chunks_exact(tap_count))
        .zip(positions)
    {
        let window = src.get(pos.max(0) as usize..).unwrap_or_default();
        let val: i32 = window
            .iter()
            .zip(row)
            .map(|(&s, &c)| i32::from(s) * i32::from(c))
            .sum();
        *out = (val >> 7).min((1 << 15) - 1) as i16;
    }
}
