/// `ceil(a / 2^shift)` for non-negative `a`.
pub(crate) fn ceil_rshift(a: u32, shift: u8) -> u32 {
    let shift = u32::from(shift);
    ((u64::from(a) + (1u64 << shift) - 1) >> shift) as u32
}

/// Signed `ceil(a / 2^shift)` used on row indices.
pub(crate) fn ceil_rshift_i32(a: i32, shift: u8) -> i32 {
    -((-a) >> shift)
}

/// Division rounding half away from zero.
pub(crate) fn rounded_div(a: i64, b: i64) -> i64 {
    if a > 0 {
        (a + (b >> 1)) / b
    } else {
        (a - (b >> 1)) / b
    }
}

/// Floor of log2, with `ilog2_floor(0) == 0`.
pub(crate) fn ilog2_floor(x: u32) -> u32 {
    if x == 0 { 0 } else { x.ilog2() }
}

/// Round `v` up to the next multiple of the power-of-two `align`.
pub(crate) fn align_up(v: usize, align: usize) -> usize {
    debug_assert!(align.is_power_of_two());
    (v + (align - 1)) & !(align - 1)
}

pub(crate) fn clip_u8(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}
