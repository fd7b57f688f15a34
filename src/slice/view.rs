use std::ops::Range;

use crate::foundation::core::Dimensions;
use crate::foundation::error::{ScaleError, ScaleResult};
use crate::foundation::math::ceil_rshift_i32;
use crate::format::pixel::{ChromaOrder, FormatDescriptor};
use crate::slice::window::RowWindow;

/// Plane slots per image: luma, chroma A, chroma B, reserved.
pub const MAX_PLANES: usize = 4;

/// Borrowed read-only plane: rows of `stride` bytes.
#[derive(Clone, Copy, Debug)]
pub struct PlaneRef<'a> {
    /// Sample bytes, row 0 first.
    pub data: &'a [u8],
    /// Bytes between the starts of consecutive rows.
    pub stride: usize,
}

impl<'a> PlaneRef<'a> {
    /// Wrap `data` laid out with `stride` bytes per row.
    pub fn new(data: &'a [u8], stride: usize) -> Self {
        Self { data, stride }
    }
}

/// Borrowed writable plane: rows of `stride` bytes.
#[derive(Debug)]
pub struct PlaneMut<'a> {
    /// Sample bytes, row 0 first.
    pub data: &'a mut [u8],
    /// Bytes between the starts of consecutive rows.
    pub stride: usize,
}

impl<'a> PlaneMut<'a> {
    /// Wrap `data` laid out with `stride` bytes per row.
    pub fn new(data: &'a mut [u8], stride: usize) -> Self {
        Self { data, stride }
    }
}

/// Caller-owned input rows for one streaming call.
///
/// Row 0 of every plane is the first row of the slice, not of the image.
#[derive(Clone, Copy, Debug, Default)]
pub struct SourceImage<'a> {
    planes: [Option<PlaneRef<'a>>; MAX_PLANES],
}

impl<'a> SourceImage<'a> {
    /// Image with no planes attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach planes in slot order (luma first). Extra planes are ignored.
    pub fn from_planes(planes: impl IntoIterator<Item = PlaneRef<'a>>) -> Self {
        let mut out = Self::default();
        for (slot, plane) in out.planes.iter_mut().zip(planes) {
            *slot = Some(plane);
        }
        out
    }

    /// Set plane slot `index`.
    pub fn with_plane(mut self, index: usize, plane: PlaneRef<'a>) -> Self {
        if let Some(slot) = self.planes.get_mut(index) {
            *slot = Some(plane);
        }
        self
    }

    /// Plane in slot `index`, if attached.
    pub fn plane(&self, index: usize) -> Option<PlaneRef<'a>> {
        self.planes.get(index).copied().flatten()
    }
}

/// Caller-owned output frame. Rows are absolute destination rows.
#[derive(Debug, Default)]
pub struct DestImage<'a> {
    planes: [Option<PlaneMut<'a>>; MAX_PLANES],
}

impl<'a> DestImage<'a> {
    /// Image with no planes attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach planes in slot order (luma first). Extra planes are ignored.
    pub fn from_planes(planes: impl IntoIterator<Item = PlaneMut<'a>>) -> Self {
        let mut out = Self::default();
        for (slot, plane) in out.planes.iter_mut().zip(planes) {
            *slot = Some(plane);
        }
        out
    }

    /// Set plane slot `index`.
    pub fn with_plane(mut self, index: usize, plane: PlaneMut<'a>) -> Self {
        if let Some(slot) = self.planes.get_mut(index) {
            *slot = Some(plane);
        }
        self
    }

    /// Plane in slot `index`, if attached.
    pub fn plane_mut(&mut self, index: usize) -> Option<&mut PlaneMut<'a>> {
        self.planes.get_mut(index).and_then(Option::as_mut)
    }
}

fn check_plane(
    what: &str,
    len: usize,
    stride: usize,
    row_bytes: usize,
    rows: usize,
) -> ScaleResult<()> {
    if rows == 0 {
        return Ok(());
    }
    if stride < row_bytes {
        return Err(ScaleError::contract(format!(
            "{what}: stride {stride} is shorter than a row ({row_bytes} bytes)"
        )));
    }
    let needed = (rows - 1) * stride + row_bytes;
    if len < needed {
        return Err(ScaleError::contract(format!(
            "{what}: buffer holds {len} bytes, {rows} rows need {needed}"
        )));
    }
    Ok(())
}

fn row_span(stride: usize, index: i32, row_bytes: usize) -> Range<usize> {
    let at = index as usize * stride;
    at..at + row_bytes
}

fn required<T>(plane: Option<T>, what: &str) -> ScaleResult<T> {
    plane.ok_or_else(|| ScaleError::contract(format!("{what} plane is missing")))
}

#[derive(Clone, Copy, Debug)]
enum ChromaSource<'a> {
    Planar { u: PlaneRef<'a>, v: PlaneRef<'a> },
    Interleaved { uv: PlaneRef<'a> },
}

/// Read side of one streaming call: the caller's rows `[first, first + count)`
/// plus the matching chroma rows.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SourceView<'a> {
    luma: PlaneRef<'a>,
    chroma: ChromaSource<'a>,
    luma_window: RowWindow,
    chroma_window: RowWindow,
    width: usize,
    chroma_width: usize,
}

impl<'a> SourceView<'a> {
    pub(crate) fn new(
        image: &SourceImage<'a>,
        format: &FormatDescriptor,
        dims: Dimensions,
        chroma_dims: Dimensions,
        first: i32,
        count: i32,
    ) -> ScaleResult<Self> {
        let vs = format.chroma_shift.log2_h;
        let chroma_first = first >> vs;
        let chroma_end = ceil_rshift_i32(first + count, vs).min(chroma_dims.height as i32);
        let chroma_rows = (chroma_end - chroma_first).max(0);

        let width = dims.width as usize;
        let chroma_width = chroma_dims.width as usize;

        let luma = required(image.plane(0), "source luma")?;
        check_plane("source luma", luma.data.len(), luma.stride, width, count as usize)?;

        let chroma = if format.interleaved_chroma {
            let uv = required(image.plane(1), "source chroma")?;
            check_plane(
                "source chroma",
                uv.data.len(),
                uv.stride,
                2 * chroma_width,
                chroma_rows as usize,
            )?;
            ChromaSource::Interleaved { uv }
        } else {
            let u = required(image.plane(1), "source U")?;
            let v = required(image.plane(2), "source V")?;
            check_plane("source U", u.data.len(), u.stride, chroma_width, chroma_rows as usize)?;
            check_plane("source V", v.data.len(), v.stride, chroma_width, chroma_rows as usize)?;
            ChromaSource::Planar { u, v }
        };

        Ok(Self {
            luma,
            chroma,
            luma_window: RowWindow::fixed(first, count),
            chroma_window: RowWindow::fixed(chroma_first, chroma_rows),
            width,
            chroma_width,
        })
    }

    /// One past the last luma row of the slice.
    pub(crate) fn luma_end(&self) -> i32 {
        self.luma_window.end()
    }

    /// One past the last chroma row of the slice.
    pub(crate) fn chroma_end(&self) -> i32 {
        self.chroma_window.end()
    }

    pub(crate) fn luma_row(&self, row: i32) -> ScaleResult<&'a [u8]> {
        self.luma_window.ensure(row, row, "source luma")?;
        let local = row - self.luma_window.start();
        Ok(&self.luma.data[row_span(self.luma.stride, local, self.width)])
    }

    /// Separate U and V rows of a planar source.
    pub(crate) fn chroma_rows(&self, row: i32) -> ScaleResult<(&'a [u8], &'a [u8])> {
        self.chroma_window.ensure(row, row, "source chroma")?;
        let local = row - self.chroma_window.start();
        match self.chroma {
            ChromaSource::Planar { u, v } => Ok((
                &u.data[row_span(u.stride, local, self.chroma_width)],
                &v.data[row_span(v.stride, local, self.chroma_width)],
            )),
            ChromaSource::Interleaved { .. } => Err(ScaleError::contract(
                "planar chroma requested from an interleaved source",
            )),
        }
    }

    /// Interleaved chroma row (`2 * chroma_width` bytes).
    pub(crate) fn interleaved_row(&self, row: i32) -> ScaleResult<&'a [u8]> {
        self.chroma_window.ensure(row, row, "source chroma")?;
        let local = row - self.chroma_window.start();
        match self.chroma {
            ChromaSource::Interleaved { uv } => {
                Ok(&uv.data[row_span(uv.stride, local, 2 * self.chroma_width)])
            }
            ChromaSource::Planar { .. } => Err(ScaleError::contract(
                "interleaved chroma requested from a planar source",
            )),
        }
    }
}

enum ChromaSink<'s> {
    Planar {
        u: &'s mut [u8],
        u_stride: usize,
        v: &'s mut [u8],
        v_stride: usize,
    },
    Interleaved {
        uv: &'s mut [u8],
        stride: usize,
        order: ChromaOrder,
    },
}

/// Write side of one streaming call: the whole destination frame.
pub(crate) struct SinkView<'s> {
    luma: &'s mut [u8],
    luma_stride: usize,
    chroma: ChromaSink<'s>,
    luma_window: RowWindow,
    chroma_window: RowWindow,
    width: usize,
    chroma_width: usize,
}

impl<'s> SinkView<'s> {
    pub(crate) fn new(
        image: &'s mut DestImage<'_>,
        format: &FormatDescriptor,
        dims: Dimensions,
        chroma_dims: Dimensions,
    ) -> ScaleResult<Self> {
        let width = dims.width as usize;
        let chroma_width = chroma_dims.width as usize;
        let height = dims.height as usize;
        let chroma_height = chroma_dims.height as usize;

        let [p0, p1, p2, _] = &mut image.planes;
        let luma = required(p0.as_mut(), "destination luma")?;
        check_plane("destination luma", luma.data.len(), luma.stride, width, height)?;
        let luma_stride = luma.stride;

        let chroma = if format.interleaved_chroma {
            let uv = required(p1.as_mut(), "destination chroma")?;
            check_plane(
                "destination chroma",
                uv.data.len(),
                uv.stride,
                2 * chroma_width,
                chroma_height,
            )?;
            ChromaSink::Interleaved {
                stride: uv.stride,
                uv: &mut *uv.data,
                order: format.chroma_order.unwrap_or(ChromaOrder::Uv),
            }
        } else {
            let u = required(p1.as_mut(), "destination U")?;
            let v = required(p2.as_mut(), "destination V")?;
            check_plane("destination U", u.data.len(), u.stride, chroma_width, chroma_height)?;
            check_plane("destination V", v.data.len(), v.stride, chroma_width, chroma_height)?;
            ChromaSink::Planar {
                u_stride: u.stride,
                u: &mut *u.data,
                v_stride: v.stride,
                v: &mut *v.data,
            }
        };

        Ok(Self {
            luma: &mut *luma.data,
            luma_stride,
            chroma,
            luma_window: RowWindow::fixed(0, height as i32),
            chroma_window: RowWindow::fixed(0, chroma_height as i32),
            width,
            chroma_width,
        })
    }

    pub(crate) fn luma_row_mut(&mut self, row: i32) -> ScaleResult<&mut [u8]> {
        self.luma_window.ensure(row, row, "destination luma")?;
        Ok(&mut self.luma[row_span(self.luma_stride, row, self.width)])
    }

    /// Separate U and V rows of a planar destination.
    pub(crate) fn chroma_rows_mut(&mut self, row: i32) -> ScaleResult<(&mut [u8], &mut [u8])> {
        self.chroma_window.ensure(row, row, "destination chroma")?;
        let width = self.chroma_width;
        match &mut self.chroma {
            ChromaSink::Planar {
                u,
                u_stride,
                v,
                v_stride,
            } => Ok((
                &mut u[row_span(*u_stride, row, width)],
                &mut v[row_span(*v_stride, row, width)],
            )),
            ChromaSink::Interleaved { .. } => Err(ScaleError::contract(
                "planar chroma requested from an interleaved destination",
            )),
        }
    }

    /// Interleaved chroma row and its byte order.
    pub(crate) fn interleaved_row_mut(&mut self, row: i32) -> ScaleResult<(&mut [u8], ChromaOrder)> {
        self.chroma_window.ensure(row, row, "destination chroma")?;
        let width = self.chroma_width;
        match &mut self.chroma {
            ChromaSink::Interleaved { uv, stride, order } => {
                Ok((&mut uv[row_span(*stride, row, 2 * width)], *order))
            }
            ChromaSink::Planar { .. } => Err(ScaleError::contract(
                "interleaved chroma requested from a planar destination",
            )),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/slice/view.rs"]
mod tests;
