use crate::foundation::core::Dimensions;
use crate::foundation::error::{ScaleError, ScaleResult};
use crate::foundation::math::ceil_rshift;
use crate::format::pixel::{ChromaOrder, FormatDescriptor, PixelFormat};
use crate::slice::view::{DestImage, PlaneMut, PlaneRef, SourceImage};

/// Owned, tightly packed YUV frame.
///
/// Planar formats keep three planes (Y, U, V); semi-planar formats keep two
/// (Y, interleaved chroma).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct YuvFrame {
    format: PixelFormat,
    dims: Dimensions,
    chroma: Dimensions,
    planes: Vec<Vec<u8>>,
}

impl YuvFrame {
    /// Zero-filled frame.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> ScaleResult<Self> {
        let dims = Dimensions::new(width, height)?;
        let desc = format.descriptor();
        let chroma = dims.subsampled(desc.chroma_shift);
        let planes = plane_sizes(&desc, dims, chroma)
            .into_iter()
            .map(|len| vec![0u8; len])
            .collect();
        Ok(Self {
            format,
            dims,
            chroma,
            planes,
        })
    }

    /// Frame with every sample set to `(y, u, v)`.
    pub fn filled(
        width: u32,
        height: u32,
        format: PixelFormat,
        y: u8,
        u: u8,
        v: u8,
    ) -> ScaleResult<Self> {
        let mut frame = Self::new(width, height, format)?;
        frame.planes[0].fill(y);
        if frame.is_interleaved() {
            let (a, b) = frame.pair_order(u, v);
            for pair in frame.planes[1].chunks_exact_mut(2) {
                pair[0] = a;
                pair[1] = b;
            }
        } else {
            frame.planes[1].fill(u);
            frame.planes[2].fill(v);
        }
        Ok(frame)
    }

    /// Bytes of a packed frame: Y, then U and V (or the interleaved plane).
    pub fn packed_len(width: u32, height: u32, format: PixelFormat) -> ScaleResult<usize> {
        let dims = Dimensions::new(width, height)?;
        let desc = format.descriptor();
        let chroma = dims.subsampled(desc.chroma_shift);
        Ok(plane_sizes(&desc, dims, chroma).iter().sum())
    }

    /// Split packed bytes into planes.
    pub fn from_packed(
        width: u32,
        height: u32,
        format: PixelFormat,
        bytes: &[u8],
    ) -> ScaleResult<Self> {
        let expected = Self::packed_len(width, height, format)?;
        if bytes.len() != expected {
            return Err(ScaleError::configuration(format!(
                "{format} {width}x{height} needs {expected} bytes, got {}",
                bytes.len()
            )));
        }
        let mut frame = Self::new(width, height, format)?;
        let mut rest = bytes;
        for plane in &mut frame.planes {
            let (head, tail) = rest.split_at(plane.len());
            plane.copy_from_slice(head);
            rest = tail;
        }
        Ok(frame)
    }

    /// Concatenate planes into the packed layout read by [`YuvFrame::from_packed`].
    pub fn to_packed(&self) -> Vec<u8> {
        self.planes.concat()
    }

    /// Pixel format.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Luma width.
    pub fn width(&self) -> u32 {
        self.dims.width
    }

    /// Luma height.
    pub fn height(&self) -> u32 {
        self.dims.height
    }

    /// Luma plane size.
    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Chroma plane size.
    pub fn chroma_dimensions(&self) -> Dimensions {
        self.chroma
    }

    /// Number of stored planes.
    pub fn plane_count(&self) -> usize {
        self.planes.len()
    }

    /// Plane bytes, if `index` exists.
    pub fn plane(&self, index: usize) -> Option<&[u8]> {
        self.planes.get(index).map(Vec::as_slice)
    }

    /// Mutable plane bytes, if `index` exists.
    pub fn plane_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        self.planes.get_mut(index).map(Vec::as_mut_slice)
    }

    /// Row stride of plane `index` in bytes (0 for a missing plane).
    pub fn stride(&self, index: usize) -> usize {
        match index {
            0 => self.dims.width as usize,
            1 if self.is_interleaved() => 2 * self.chroma.width as usize,
            1 | 2 if !self.is_interleaved() => self.chroma.width as usize,
            _ => 0,
        }
    }

    /// Whole frame as streaming input.
    pub fn as_source(&self) -> SourceImage<'_> {
        SourceImage::from_planes(
            self.planes
                .iter()
                .enumerate()
                .map(|(i, p)| PlaneRef::new(p, self.stride(i))),
        )
    }

    /// Rows `[first_row, first_row + count)` as streaming input.
    ///
    /// Chroma rows start at `first_row >> chroma_log2_h`.
    pub fn slice_source(&self, first_row: u32, count: u32) -> SourceImage<'_> {
        let vs = self.format.descriptor().chroma_shift.log2_h;
        let end = first_row.saturating_add(count).min(self.dims.height);
        let chroma_first = first_row >> vs;
        let chroma_end = ceil_rshift(end, vs).min(self.chroma.height);

        SourceImage::from_planes(self.planes.iter().enumerate().map(|(i, p)| {
            let stride = self.stride(i);
            let (from, to) = if i == 0 {
                (first_row, end)
            } else {
                (chroma_first, chroma_end)
            };
            let lo = (from as usize * stride).min(p.len());
            let hi = (to as usize * stride).min(p.len());
            PlaneRef::new(&p[lo..hi.max(lo)], stride)
        }))
    }

    /// Whole frame as streaming output.
    pub fn as_dest(&mut self) -> DestImage<'_> {
        let strides: Vec<usize> = (0..self.planes.len()).map(|i| self.stride(i)).collect();
        DestImage::from_planes(
            self.planes
                .iter_mut()
                .zip(strides)
                .map(|(p, stride)| PlaneMut::new(p, stride)),
        )
    }

    /// Luma sample at `(x, y)`.
    pub fn luma(&self, x: u32, y: u32) -> u8 {
        self.planes[0][index(self.dims, x, y)]
    }

    /// `(u, v)` at chroma coordinates `(x, y)`.
    pub fn chroma(&self, x: u32, y: u32) -> (u8, u8) {
        let at = index(self.chroma, x, y);
        if self.is_interleaved() {
            let pair = &self.planes[1][2 * at..2 * at + 2];
            let (a, b) = (pair[0], pair[1]);
            match self.order() {
                ChromaOrder::Uv => (a, b),
                ChromaOrder::Vu => (b, a),
            }
        } else {
            (self.planes[1][at], self.planes[2][at])
        }
    }

    /// Set the luma sample at `(x, y)`.
    pub fn set_luma(&mut self, x: u32, y: u32, value: u8) {
        let at = index(self.dims, x, y);
        self.planes[0][at] = value;
    }

    /// Set `(u, v)` at chroma coordinates `(x, y)`.
    pub fn set_chroma(&mut self, x: u32, y: u32, u: u8, v: u8) {
        let at = index(self.chroma, x, y);
        if self.is_interleaved() {
            let (a, b) = self.pair_order(u, v);
            self.planes[1][2 * at] = a;
            self.planes[1][2 * at + 1] = b;
        } else {
            self.planes[1][at] = u;
            self.planes[2][at] = v;
        }
    }

    fn is_interleaved(&self) -> bool {
        self.format.descriptor().interleaved_chroma
    }

    fn order(&self) -> ChromaOrder {
        self.format.descriptor().chroma_order.unwrap_or(ChromaOrder::Uv)
    }

    fn pair_order(&self, u: u8, v: u8) -> (u8, u8) {
        match self.order() {
            ChromaOrder::Uv => (u, v),
            ChromaOrder::Vu => (v, u),
        }
    }
}

fn index(dims: Dimensions, x: u32, y: u32) -> usize {
    y as usize * dims.width as usize + x as usize
}

fn plane_sizes(desc: &FormatDescriptor, dims: Dimensions, chroma: Dimensions) -> Vec<usize> {
    let luma = dims.width as usize * dims.height as usize;
    let chroma_len = chroma.width as usize * chroma.height as usize;
    if desc.interleaved_chroma {
        vec![luma, 2 * chroma_len]
    } else {
        vec![luma, chroma_len, chroma_len]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/yuv.rs"]
mod tests;
