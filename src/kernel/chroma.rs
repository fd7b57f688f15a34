use crate::foundation::math::clip_u8;
use crate::format::pixel::ChromaOrder;
use crate::kernel::vertical::accumulate;

/// Vertical chroma pass writing interleaved byte pairs (NV12 / NV21).
///
/// `dst` holds `2 * width` bytes.
pub fn interleave_chroma(
    coeffs: &[i16],
    u_rows: &[&[i16]],
    v_rows: &[&[i16]],
    dst: &mut [u8],
    order: ChromaOrder,
) {
    for (i, pair) in dst.chunks_exact_mut(2).enumerate() {
        let u = clip_u8(accumulate(coeffs, u_rows, i) >> 19);
        let v = clip_u8(accumulate(coeffs, v_rows, i) >> 19);
        match order {
            ChromaOrder::Uv => {
                pair[0] = u;
                pair[1] = v;
            }
            ChromaOrder::Vu => {
                pair[0] = v;
                pair[1] = u;
            }
        }
    }
}

/// Split one interleaved chroma row into separate U and V rows.
pub fn deinterleave_chroma(src: &[u8], dst_u: &mut [u8], dst_v: &mut [u8], order: ChromaOrder) {
    let (first, second) = match order {
        ChromaOrder::Uv => (dst_u, dst_v),
        ChromaOrder::Vu => (dst_v, dst_u),
    };
    for ((pair, a), b) in src.chunks_exact(2).zip(first.iter_mut()).zip(second.iter_mut()) {
        *a = pair[0];
        *b = pair[1];
    }
}
