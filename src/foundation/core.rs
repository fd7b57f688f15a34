use crate::foundation::error::{ScaleError, ScaleResult};
use crate::foundation::math::ceil_rshift;

/// Width/height of one image or plane, in samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Dimensions {
    /// Samples per row.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
}

impl Dimensions {
    /// Build non-empty dimensions.
    pub fn new(width: u32, height: u32) -> ScaleResult<Self> {
        if width == 0 || height == 0 {
            return Err(ScaleError::configuration(format!(
                "dimensions must be non-zero, got {width}x{height}"
            )));
        }
        // Row and column indices are carried as i32 inside the engine.
        if width > i32::MAX as u32 / 4 || height > i32::MAX as u32 / 4 {
            return Err(ScaleError::configuration(format!(
                "dimensions {width}x{height} are too large"
            )));
        }
        Ok(Self { width, height })
    }

    /// Dimensions of a chroma plane under the given subsampling (rounded up).
    pub fn subsampled(self, shift: ChromaShift) -> Self {
        Self {
            width: ceil_rshift(self.width, shift.log2_w),
            height: ceil_rshift(self.height, shift.log2_h),
        }
    }
}

/// Chroma subsampling expressed as log2 factors relative to luma.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ChromaShift {
    /// Horizontal log2 factor (1 for 4:2:0).
    pub log2_w: u8,
    /// Vertical log2 factor (1 for 4:2:0).
    pub log2_h: u8,
}

impl ChromaShift {
    /// Mask of the luma row bits that do not advance the chroma row.
    pub fn row_mask(self) -> u32 {
        (1u32 << self.log2_h) - 1
    }

    /// Number of luma rows sharing one chroma row.
    pub fn rows_per_chroma_row(self) -> u32 {
        1u32 << self.log2_h
    }
}

/// Half-open range of absolute row indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RowRange {
    pub(crate) start: i32,
    pub(crate) end: i32,
}

impl RowRange {
    pub(crate) fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub(crate) fn contains(self, row: i32) -> bool {
        self.start <= row && row < self.end
    }
}
