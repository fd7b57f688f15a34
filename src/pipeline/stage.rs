use crate::filter::FilterSet;
use crate::filter::synth::Filter;
use crate::foundation::core::ChromaShift;
use crate::foundation::error::{ScaleError, ScaleResult};
use crate::format::pixel::ChromaOrder;
use crate::kernel::chroma::{deinterleave_chroma, interleave_chroma};
use crate::kernel::horizontal::hscale;
use crate::kernel::vertical::{vscale_multi, vscale_single};
use crate::scale::context::StreamStats;
use crate::slice::plane::{LinePlane, LineSlice};
use crate::slice::view::{SinkView, SourceView};
use crate::slice::window::Populate;

/// Output kernel bound to a vertical stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum VKernel {
    /// One tap, no blending.
    Plane1,
    /// Multi-tap blend into a planar row.
    PlaneX,
    /// Multi-tap blend of U and V into one interleaved row.
    Nv12cX(ChromaOrder),
}

impl VKernel {
    pub(crate) fn select(tap_count: usize, interleave: Option<ChromaOrder>) -> Self {
        match interleave {
            Some(order) => Self::Nv12cX(order),
            None if tap_count == 1 => Self::Plane1,
            None => Self::PlaneX,
        }
    }
}

/// Where the horizontal chroma stage reads its 8-bit rows from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ChromaInput {
    /// Planar chroma planes of the caller's slice.
    Source,
    /// Rows split out of an interleaved plane by a convert stage.
    Converted,
}

/// One step of the scaling pipeline.
///
/// Horizontal stages take a range of source rows; vertical stages take a
/// single destination row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Stage {
    LumaHScale,
    ChromaConvert(ChromaOrder),
    ChromaHScale(ChromaInput),
    LumaVScale(VKernel),
    ChromaVScale(VKernel),
}

/// 8-bit U/V rows produced by [`Stage::ChromaConvert`].
#[derive(Clone, Debug)]
pub(crate) struct ConvertPlanes {
    pub(crate) u: LinePlane<u8>,
    pub(crate) v: LinePlane<u8>,
}

impl ConvertPlanes {
    pub(crate) fn new(width: usize, lines: usize) -> Self {
        Self {
            u: LinePlane::new(width, lines),
            v: LinePlane::new(width, lines),
        }
    }
}

/// Scratch storage owned by the context and shared by all stages.
#[derive(Clone, Debug)]
pub(crate) struct Buffers {
    pub(crate) lines: LineSlice,
    pub(crate) converted: Option<ConvertPlanes>,
}

impl Buffers {
    pub(crate) fn clear(&mut self) {
        self.lines.clear();
        if let Some(conv) = &mut self.converted {
            conv.u.clear();
            conv.v.clear();
        }
    }
}

/// Everything a stage may touch during one streaming call.
pub(crate) struct StageIo<'a, 'src, 'dst> {
    pub(crate) filters: &'a FilterSet,
    pub(crate) source: &'a SourceView<'src>,
    pub(crate) buffers: &'a mut Buffers,
    pub(crate) sink: &'a mut SinkView<'dst>,
    pub(crate) stats: &'a mut StreamStats,
    pub(crate) src_height: i32,
    pub(crate) src_chroma_height: i32,
    pub(crate) dst_chroma_shift: ChromaShift,
}

impl Stage {
    /// Run the stage over `count` rows starting at `first`. Returns the number
    /// of rows written.
    pub(crate) fn process(&self, io: &mut StageIo<'_, '_, '_>, first: i32, count: i32) -> ScaleResult<u32> {
        match *self {
            Stage::LumaHScale => luma_hscale(io, first, count),
            Stage::ChromaConvert(order) => chroma_convert(io, order, first, count),
            Stage::ChromaHScale(input) => chroma_hscale(io, input, first, count),
            Stage::LumaVScale(kernel) => luma_vscale(io, kernel, first),
            Stage::ChromaVScale(kernel) => chroma_vscale(io, kernel, first),
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Stage::LumaHScale => "luma_hscale",
            Stage::ChromaConvert(_) => "chroma_convert",
            Stage::ChromaHScale(_) => "chroma_hscale",
            Stage::LumaVScale(_) => "luma_vscale",
            Stage::ChromaVScale(_) => "chroma_vscale",
        }
    }
}

fn hscale_into(line: &mut [i16], src: &[u8], filter: &Filter) {
    hscale(
        line,
        src,
        filter.coefficients(),
        filter.padded_positions(),
        filter.tap_count(),
    );
}

fn luma_hscale(io: &mut StageIo<'_, '_, '_>, first: i32, count: i32) -> ScaleResult<u32> {
    let filter = &io.filters.h_luma;
    for row in first..first + count {
        let src = io.source.luma_row(row)?;
        let (populate, line) = io.buffers.lines.luma.write_row(row)?;
        if populate == Populate::HoleReset {
            io.stats.hole_resets += 1;
        }
        hscale_into(line, src, filter);
        io.stats.luma_rows_hscaled += 1;
    }
    Ok(count.max(0) as u32)
}

fn chroma_convert(
    io: &mut StageIo<'_, '_, '_>,
    order: ChromaOrder,
    first: i32,
    count: i32,
) -> ScaleResult<u32> {
    let conv = io
        .buffers
        .converted
        .as_mut()
        .ok_or_else(|| ScaleError::contract("chroma convert stage without convert planes"))?;
    conv.u.reset(first);
    conv.v.reset(first);
    for row in first..first + count {
        let src = io.source.interleaved_row(row)?;
        let (_, u) = conv.u.write_row(row)?;
        let (_, v) = conv.v.write_row(row)?;
        deinterleave_chroma(src, u, v, order);
        io.stats.chroma_rows_converted += 1;
    }
    Ok(count.max(0) as u32)
}

fn chroma_hscale(
    io: &mut StageIo<'_, '_, '_>,
    input: ChromaInput,
    first: i32,
    count: i32,
) -> ScaleResult<u32> {
    let filter = &io.filters.h_chroma;
    let Buffers { lines, converted } = &mut *io.buffers;
    for row in first..first + count {
        let (src_u, src_v) = match input {
            ChromaInput::Source => io.source.chroma_rows(row)?,
            ChromaInput::Converted => {
                let conv = converted.as_ref().ok_or_else(|| {
                    ScaleError::contract("converted chroma requested without convert planes")
                })?;
                (conv.u.row(row)?, conv.v.row(row)?)
            }
        };
        let (populate, line) = lines.chroma_u.write_row(row)?;
        if populate == Populate::HoleReset {
            io.stats.hole_resets += 1;
        }
        hscale_into(line, src_u, filter);
        let (_, line) = lines.chroma_v.write_row(row)?;
        hscale_into(line, src_v, filter);
        io.stats.chroma_rows_hscaled += 1;
    }
    Ok(count.max(0) as u32)
}

fn luma_vscale(io: &mut StageIo<'_, '_, '_>, kernel: VKernel, dst_row: i32) -> ScaleResult<u32> {
    let filter = &io.filters.v_luma;
    let (first, last) = filter.span(dst_row as usize, io.src_height as usize);
    let rows = io.buffers.lines.luma.rows(first, last)?;
    let coeffs = filter.coeffs(dst_row as usize);
    let dst = io.sink.luma_row_mut(dst_row)?;
    match kernel {
        VKernel::Plane1 => vscale_single(rows[0], dst),
        VKernel::PlaneX => vscale_multi(coeffs, &rows, dst),
        VKernel::Nv12cX(_) => {
            return Err(ScaleError::contract("interleaving kernel bound to the luma plane"));
        }
    }
    Ok(1)
}

fn chroma_vscale(io: &mut StageIo<'_, '_, '_>, kernel: VKernel, dst_row: i32) -> ScaleResult<u32> {
    let shift = io.dst_chroma_shift;
    if dst_row as u32 & shift.row_mask() != 0 {
        return Ok(0);
    }
    let chroma_row = dst_row >> shift.log2_h;
    let filter = &io.filters.v_chroma;
    let (first, last) = filter.span(chroma_row as usize, io.src_chroma_height as usize);
    let lines = &io.buffers.lines;
    let u_rows = lines.chroma_u.rows(first, last)?;
    let v_rows = lines.chroma_v.rows(first, last)?;
    let coeffs = filter.coeffs(chroma_row as usize);

    match kernel {
        VKernel::Nv12cX(order) => {
            let (dst, _) = io.sink.interleaved_row_mut(chroma_row)?;
            interleave_chroma(coeffs, &u_rows, &v_rows, dst, order);
        }
        VKernel::Plane1 => {
            let (dst_u, dst_v) = io.sink.chroma_rows_mut(chroma_row)?;
            vscale_single(u_rows[0], dst_u);
            vscale_single(v_rows[0], dst_v);
        }
        VKernel::PlaneX => {
            let (dst_u, dst_v) = io.sink.chroma_rows_mut(chroma_row)?;
            vscale_multi(coeffs, &u_rows, dst_u);
            vscale_multi(coeffs, &v_rows, dst_v);
        }
    }
    Ok(1)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/stage.rs"]
mod tests;
