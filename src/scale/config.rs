use crate::filter::FilterSet;
use crate::filter::synth::{FilterParams, axis_increment, synthesize};
use crate::foundation::core::Dimensions;
use crate::foundation::error::{ScaleError, ScaleResult};
use crate::format::pixel::{FormatDescriptor, PixelFormat};
use crate::scale::options::ScaleOptions;

/// Fixed-point value of a unit horizontal weight.
const H_ONE: i64 = 1 << 14;
/// Fixed-point value of a unit vertical weight.
const V_ONE: i64 = 1 << 12;

const H_ALIGN: usize = 4;
const V_ALIGN: usize = 2;

/// One side (source or destination) of a scaling job.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageGeometry {
    /// Pixel format.
    pub format: PixelFormat,
    /// Resolved format layout.
    pub descriptor: FormatDescriptor,
    /// Luma plane size.
    pub luma: Dimensions,
    /// Chroma plane size (subsampled, rounded up).
    pub chroma: Dimensions,
}

impl ImageGeometry {
    fn new(width: u32, height: u32, format: PixelFormat) -> ScaleResult<Self> {
        let descriptor = format.descriptor();
        if descriptor.uniform_depth() != Some(8) {
            return Err(ScaleError::configuration(format!(
                "{format} is not an 8-bit format"
            )));
        }
        let luma = Dimensions::new(width, height)?;
        Ok(Self {
            format,
            descriptor,
            luma,
            chroma: luma.subsampled(descriptor.chroma_shift),
        })
    }
}

/// Immutable part of a scaling context, built once at creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScaleConfig {
    /// Source geometry.
    pub src: ImageGeometry,
    /// Destination geometry.
    pub dst: ImageGeometry,
    /// Luma `(x, y)` increments in 16.16 fixed point.
    pub luma_inc: (i64, i64),
    /// Chroma `(x, y)` increments in 16.16 fixed point.
    pub chroma_inc: (i64, i64),
    /// The four synthesized filters.
    pub filters: FilterSet,
    /// Lines in the intermediate luma ring.
    pub luma_lines: usize,
    /// Lines in each intermediate chroma ring.
    pub chroma_lines: usize,
    /// Options the context was built with.
    pub options: ScaleOptions,
}

impl ScaleConfig {
    /// Validate the job and synthesize its filters.
    pub fn new(
        src: (u32, u32, PixelFormat),
        dst: (u32, u32, PixelFormat),
        options: ScaleOptions,
    ) -> ScaleResult<Self> {
        options.validate()?;
        let src = ImageGeometry::new(src.0, src.1, src.2)?;
        let dst = ImageGeometry::new(dst.0, dst.1, dst.2)?;
        if dst.chroma.height > dst.luma.height {
            return Err(ScaleError::configuration(format!(
                "destination chroma height {} exceeds luma height {}",
                dst.chroma.height, dst.luma.height
            )));
        }

        let (src_ch, src_cv) = options.src_chroma_position.anchors(src.format);
        let (dst_ch, dst_cv) = options.dst_chroma_position.anchors(dst.format);

        let params = |src_len: u32, dst_len: u32, align, one| {
            FilterParams::new(src_len as usize, dst_len as usize, align, one)
                .with_flags(options.accurate_rounding, options.bitexact)
        };

        let filters = FilterSet {
            h_luma: synthesize(&params(src.luma.width, dst.luma.width, H_ALIGN, H_ONE))?,
            h_chroma: synthesize(
                &params(src.chroma.width, dst.chroma.width, H_ALIGN, H_ONE)
                    .with_anchors(src_ch, dst_ch),
            )?,
            v_luma: synthesize(&params(src.luma.height, dst.luma.height, V_ALIGN, V_ONE))?,
            v_chroma: synthesize(
                &params(src.chroma.height, dst.chroma.height, V_ALIGN, V_ONE)
                    .with_anchors(src_cv, dst_cv),
            )?,
        };

        let (luma_lines, chroma_lines) = ring_sizes(&src, &dst, &filters, options.lines_ahead);

        let config = Self {
            luma_inc: (
                axis_increment(src.luma.width as usize, dst.luma.width as usize),
                axis_increment(src.luma.height as usize, dst.luma.height as usize),
            ),
            chroma_inc: (
                axis_increment(src.chroma.width as usize, dst.chroma.width as usize),
                axis_increment(src.chroma.height as usize, dst.chroma.height as usize),
            ),
            src,
            dst,
            filters,
            luma_lines,
            chroma_lines,
            options,
        };

        tracing::debug!(
            h_luma_taps = config.filters.h_luma.tap_count(),
            h_chroma_taps = config.filters.h_chroma.tap_count(),
            v_luma_taps = config.filters.v_luma.tap_count(),
            v_chroma_taps = config.filters.v_chroma.tap_count(),
            luma_lines,
            chroma_lines,
            "filters synthesized"
        );
        Ok(config)
    }

    /// Source rows the destination row `dst_row` depends on.
    pub fn required_rows(&self, dst_row: u32) -> RowRequirement {
        requirement(&self.src, &self.dst, &self.filters, dst_row)
    }
}

/// Source rows needed to emit one destination row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowRequirement {
    /// First luma row of this destination row's window.
    pub first_luma: i32,
    /// Last luma row of this destination row's window.
    pub last_luma: i32,
    /// Last luma row needed by any row sharing this chroma row.
    pub last_luma_group: i32,
    /// First chroma row of the paired chroma window.
    pub first_chroma: i32,
    /// Last chroma row of the paired chroma window.
    pub last_chroma: i32,
}

fn requirement(
    src: &ImageGeometry,
    dst: &ImageGeometry,
    filters: &FilterSet,
    dst_row: u32,
) -> RowRequirement {
    let shift = dst.descriptor.chroma_shift;
    let chroma_row = dst_row >> shift.log2_h;
    let group_last = (dst_row | shift.row_mask()).min(dst.luma.height - 1);

    let src_h = src.luma.height as usize;
    let src_ch = src.chroma.height as usize;
    let (first_luma, last_luma) = filters.v_luma.span(dst_row as usize, src_h);
    let (_, last_luma_group) = filters.v_luma.span(group_last as usize, src_h);
    let (first_chroma, last_chroma) = filters.v_chroma.span(chroma_row as usize, src_ch);

    RowRequirement {
        first_luma,
        last_luma,
        last_luma_group,
        first_chroma,
        last_chroma,
    }
}

/// Smallest ring capacities that let every destination row be produced
/// regardless of how the source is sliced.
fn ring_sizes(
    src: &ImageGeometry,
    dst: &ImageGeometry,
    filters: &FilterSet,
    lines_ahead: usize,
) -> (usize, usize) {
    let vs = src.descriptor.chroma_shift.log2_h;
    let mut luma = filters.v_luma.tap_count() + lines_ahead;
    let mut chroma = filters.v_chroma.tap_count() + lines_ahead;

    for d in 0..dst.luma.height {
        let r = requirement(src, dst, filters, d);
        let luma_span = r.last_luma_group.max(((r.last_chroma + 1) << vs) - 1) - r.first_luma + 1;
        let chroma_span = r.last_chroma.max(r.last_luma_group >> vs) - r.first_chroma + 1;
        luma = luma.max(luma_span as usize);
        chroma = chroma.max(chroma_span as usize);
    }
    (luma, chroma)
}

#[cfg(test)]
#[path = "../../tests/unit/scale/config.rs"]
mod tests;
