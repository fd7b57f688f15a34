use crate::foundation::error::{ScaleError, ScaleResult};
use crate::foundation::math::{align_up, ilog2_floor, rounded_div};

/// Hard cap on the tap count of one filter, before precision scaling.
pub const MAX_FILTER_SIZE: usize = 256;

/// Fraction of `fone` a run of dropped edge taps may weigh in total.
const MAX_REDUCE_CUTOFF: f64 = 0.002;

/// Entries appended after the last real destination index.
pub const REPLICATED_TAIL: usize = 3;

/// Inputs of one synthesis run (one axis of one plane kind).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterParams {
    /// `src_len / dst_len` with 16 fractional bits, see [`axis_increment`].
    pub increment: i64,
    /// Source samples along the axis.
    pub src_len: usize,
    /// Destination samples along the axis.
    pub dst_len: usize,
    /// Tap count is rounded up to a multiple of this (power of two).
    pub tap_alignment: usize,
    /// Fixed-point value representing a weight of 1.0 after normalization.
    pub normalization_one: i64,
    /// Source sample siting in 1/256 units relative to the left edge.
    pub src_anchor: i32,
    /// Destination sample siting in 1/256 units relative to the left edge.
    pub dst_anchor: i32,
    /// Use the reduced capacity cap of the accurate-rounding mode.
    pub accurate_rounding: bool,
    /// Zero alignment padding taps beyond the minimum tap count.
    pub bitexact: bool,
}

impl FilterParams {
    /// Parameters with the default siting (anchor 128 on both sides) and no flags.
    pub fn new(src_len: usize, dst_len: usize, tap_alignment: usize, normalization_one: i64) -> Self {
        Self {
            increment: axis_increment(src_len, dst_len),
            src_len,
            dst_len,
            tap_alignment,
            normalization_one,
            src_anchor: 128,
            dst_anchor: 128,
            accurate_rounding: false,
            bitexact: false,
        }
    }

    /// Override both anchors.
    pub fn with_anchors(mut self, src_anchor: i32, dst_anchor: i32) -> Self {
        self.src_anchor = src_anchor;
        self.dst_anchor = dst_anchor;
        self
    }

    /// Set the precision-mode flags.
    pub fn with_flags(mut self, accurate_rounding: bool, bitexact: bool) -> Self {
        self.accurate_rounding = accurate_rounding;
        self.bitexact = bitexact;
        self
    }
}

/// Synthesized polyphase filter for one axis.
///
/// Holds `dst_len + 3` position entries and as many coefficient rows; the
/// trailing three replicate the last real destination index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Filter {
    coeffs: Vec<i16>,
    positions: Vec<i32>,
    tap_count: usize,
    dst_len: usize,
}

impl Filter {
    /// Taps per destination index.
    pub fn tap_count(&self) -> usize {
        self.tap_count
    }

    /// Number of real destination indices.
    pub fn dst_len(&self) -> usize {
        self.dst_len
    }

    /// First source index read for destination index `i`.
    ///
    /// Valid for `i < dst_len() + 3`.
    pub fn position(&self, i: usize) -> i32 {
        self.positions[i]
    }

    /// Coefficient row for destination index `i`.
    pub fn coeffs(&self, i: usize) -> &[i16] {
        &self.coeffs[i * self.tap_count..(i + 1) * self.tap_count]
    }

    /// Every coefficient row back to back, replicated tail included.
    pub(crate) fn coefficients(&self) -> &[i16] {
        &self.coeffs
    }

    /// Positions of the real destination indices.
    pub fn positions(&self) -> &[i32] {
        &self.positions[..self.dst_len]
    }

    /// Positions including the replicated tail.
    pub fn padded_positions(&self) -> &[i32] {
        &self.positions
    }

    /// Source rows/columns touched by index `i`, clipped to `src_len`.
    pub fn span(&self, i: usize, src_len: usize) -> (i32, i32) {
        let first = self.positions[i];
        let last = (first + self.tap_count as i32).min(src_len as i32) - 1;
        (first, last)
    }
}

/// `src_len / dst_len` in 16.16 fixed point, rounded to nearest.
pub fn axis_increment(src_len: usize, dst_len: usize) -> i64 {
    let src = src_len as i64;
    let dst = dst_len as i64;
    ((src << 16) + (dst >> 1)) / dst
}

/// Anchor (1/256 units) of a plane subsampled by `2^log2_sub`.
///
/// `None`, `-1` and anything at or below `-513` select the centered default.
pub fn local_position(log2_sub: u8, pos: Option<i32>) -> i32 {
    let pos = match pos {
        Some(p) if p != -1 && p > -513 => p,
        _ => (128 << log2_sub) - 128,
    };
    (pos + 128) >> log2_sub
}

/// Build the normalized bilinear filter described by `params`.
pub fn synthesize(params: &FilterParams) -> ScaleResult<Filter> {
    let FilterParams {
        increment,
        src_len,
        dst_len,
        tap_alignment,
        normalization_one: one,
        ..
    } = *params;

    if src_len == 0 || dst_len == 0 {
        return Err(ScaleError::configuration(format!(
            "filter lengths must be non-zero (src {src_len}, dst {dst_len})"
        )));
    }
    if !tap_alignment.is_power_of_two() {
        return Err(ScaleError::configuration(format!(
            "tap alignment {tap_alignment} is not a power of two"
        )));
    }
    if one <= 0 {
        return Err(ScaleError::configuration("normalization one must be positive"));
    }

    let src = src_len as i64;
    let dst = dst_len as i64;
    let upscale = increment <= 1 << 16;

    let initial = if upscale { 3 } else { 1 + (2 * src + dst - 1) / dst };
    let size = initial.min(src - 2).max(1) as usize;

    let fone: i64 = 1 << (54 - ilog2_floor((src_len / dst_len) as u32).min(8));

    let mut positions = vec![0i32; dst_len + REPLICATED_TAIL];
    let mut raw = vec![0i64; dst_len * size];

    let mut x_dst_in_src = ((i64::from(params.dst_anchor) * increment) >> 7)
        - ((i64::from(params.src_anchor) * 0x10000) >> 7);
    for (i, row) in raw.chunks_exact_mut(size).enumerate() {
        let mut xx = (x_dst_in_src - (size as i64 - 2) * (1 << 16)) / (1 << 17);
        positions[i] = xx as i32;
        for c in row.iter_mut() {
            let mut d = (xx * (1 << 17) - x_dst_in_src).abs() << 13;
            if !upscale {
                d = d * dst / src;
            }
            *c = ((1i64 << 30) - d).max(0) * (fone >> 30);
            xx += 1;
        }
        x_dst_in_src += 2 * increment;
    }

    let min_size = shrink_edges(&mut raw, &mut positions[..dst_len], size, fone);

    let tap_count = align_up(min_size, tap_alignment);
    let cap = MAX_FILTER_SIZE * 16 / if params.accurate_rounding { 24 } else { 16 };
    if tap_count >= cap {
        return Err(ScaleError::capacity(format!(
            "{tap_count} taps needed for {src_len} -> {dst_len}, limit is {cap}; a cascaded scaler is required"
        )));
    }

    let mut filter = vec![0i64; dst_len * tap_count];
    for (dst_row, src_row) in filter
        .chunks_exact_mut(tap_count)
        .zip(raw.chunks_exact(size))
    {
        let keep = if params.bitexact {
            min_size.min(size)
        } else {
            size.min(tap_count)
        };
        dst_row[..keep].copy_from_slice(&src_row[..keep]);
    }

    for (row, pos) in filter
        .chunks_exact_mut(tap_count)
        .zip(positions.iter_mut())
    {
        clamp_to_source(row, pos, src_len as i32);
    }

    let mut coeffs = vec![0i16; (dst_len + REPLICATED_TAIL) * tap_count];
    for (out, row) in coeffs
        .chunks_exact_mut(tap_count)
        .zip(filter.chunks_exact(tap_count))
    {
        normalize_row(row, out, one);
    }

    let last = positions[dst_len - 1];
    positions[dst_len..].fill(last);
    let last_row = (dst_len - 1) * tap_count;
    for k in 1..=REPLICATED_TAIL {
        coeffs.copy_within(last_row..last_row + tap_count, last_row + k * tap_count);
    }

    Ok(Filter {
        coeffs,
        positions,
        tap_count,
        dst_len,
    })
}

/// Drop near-zero leading taps (shifting the window right) and measure the
/// trailing near-zero run. Returns the smallest tap count that keeps every
/// row's significant weights.
fn shrink_edges(raw: &mut [i64], positions: &mut [i32], size: usize, fone: i64) -> usize {
    let limit = MAX_REDUCE_CUTOFF * fone as f64;
    let dst_len = positions.len();
    let mut min_size = 0;

    for i in (0..dst_len).rev() {
        let row = &mut raw[i * size..(i + 1) * size];

        let mut cut_off = 0i64;
        for _ in 0..size {
            cut_off += row[0].abs();
            if cut_off as f64 > limit {
                break;
            }
            // Kernels read sources in ascending order.
            if i + 1 < dst_len && positions[i] >= positions[i + 1] {
                break;
            }
            row.copy_within(1.., 0);
            row[size - 1] = 0;
            positions[i] += 1;
        }

        let mut min = size;
        cut_off = 0;
        for j in (1..size).rev() {
            cut_off += row[j].abs();
            if cut_off as f64 > limit {
                break;
            }
            min -= 1;
        }
        min_size = min_size.max(min);
    }

    min_size
}

/// Fold taps that fall outside `[0, src_len)` back onto the edge samples.
fn clamp_to_source(row: &mut [i64], pos: &mut i32, src_len: i32) {
    let taps = row.len() as i32;

    if *pos < 0 {
        for j in 1..row.len() {
            let left = (j as i32 + *pos).max(0) as usize;
            let v = std::mem::take(&mut row[j]);
            row[left] += v;
        }
        *pos = 0;
    }

    if *pos + taps > src_len {
        let shift = *pos + (taps - src_len).min(0);
        let mut acc = 0i64;
        for (j, c) in row.iter_mut().enumerate() {
            if *pos + j as i32 >= src_len {
                acc += std::mem::take(c);
            }
        }
        let shift = shift as usize;
        for j in (0..row.len()).rev() {
            row[j] = if j < shift { 0 } else { row[j - shift] };
        }
        *pos -= shift as i32;
        row[(src_len - 1 - *pos) as usize] += acc;
    }
}

/// Quantize one row to `i16` so that it sums to `one`, carrying the rounding
/// error from tap to tap.
fn normalize_row(row: &[i64], out: &mut [i16], one: i64) {
    let mut sum = (row.iter().sum::<i64>() + one / 2) / one;
    if sum == 0 {
        tracing::warn!("zero vector in scaling");
        sum = 1;
    }
    row.iter()
        .zip(out.iter_mut())
        .fold(0i64, |error, (&raw, out)| {
            let v = raw + error;
            let q = rounded_div(v, sum);
            *out = q as i16;
            v - q * sum
        });
}

#[cfg(test)]
#[path = "../../tests/unit/filter/synth.rs"]
mod tests;
