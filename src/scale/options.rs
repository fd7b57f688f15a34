use crate::filter::synth::local_position;
use crate::foundation::error::{ScaleError, ScaleResult};
use crate::format::pixel::PixelFormat;

/// Extra ring-buffer lines kept beyond the vertical tap count by default.
pub const MAX_LINES_AHEAD: usize = 4;

const LINES_AHEAD_LIMIT: usize = 64;

/// Chroma sample siting in 1/256 luma-sample units.
///
/// `None` selects the format default: centered, except the vertical siting
/// of planar 4:2:0 which follows the MPEG-2 convention (128).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChromaPosition {
    /// Horizontal siting.
    pub h: Option<i32>,
    /// Vertical siting.
    pub v: Option<i32>,
}

impl ChromaPosition {
    /// Explicit siting on both axes.
    pub fn new(h: i32, v: i32) -> Self {
        Self {
            h: Some(h),
            v: Some(v),
        }
    }

    /// Filter anchors `(horizontal, vertical)` for a plane of `format`.
    pub(crate) fn anchors(self, format: PixelFormat) -> (i32, i32) {
        let shift = format.descriptor().chroma_shift;
        let v = match (self.v, format) {
            (None, PixelFormat::Yuv420p) => Some(128),
            (v, _) => v,
        };
        (
            local_position(shift.log2_w, self.h),
            local_position(shift.log2_h, v),
        )
    }
}

/// Tunables of a scaling context.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScaleOptions {
    /// Chroma siting of the source.
    pub src_chroma_position: ChromaPosition,
    /// Chroma siting of the destination.
    pub dst_chroma_position: ChromaPosition,
    /// Ring-buffer lines kept beyond the vertical tap count.
    pub lines_ahead: usize,
    /// Reserve precision headroom; lowers the maximum tap count.
    pub accurate_rounding: bool,
    /// Zero alignment padding taps.
    pub bitexact: bool,
}

impl Default for ScaleOptions {
    fn default() -> Self {
        Self {
            src_chroma_position: ChromaPosition::default(),
            dst_chroma_position: ChromaPosition::default(),
            lines_ahead: MAX_LINES_AHEAD,
            accurate_rounding: false,
            bitexact: false,
        }
    }
}

impl ScaleOptions {
    /// Return options with the given source chroma siting.
    pub fn with_src_chroma_position(mut self, pos: ChromaPosition) -> Self {
        self.src_chroma_position = pos;
        self
    }

    /// Return options with the given destination chroma siting.
    pub fn with_dst_chroma_position(mut self, pos: ChromaPosition) -> Self {
        self.dst_chroma_position = pos;
        self
    }

    /// Return options with a different ring-buffer lookahead.
    pub fn with_lines_ahead(mut self, lines: usize) -> Self {
        self.lines_ahead = lines;
        self
    }

    /// Return options with accurate rounding toggled.
    pub fn with_accurate_rounding(mut self, on: bool) -> Self {
        self.accurate_rounding = on;
        self
    }

    /// Return options with bit-exact filters toggled.
    pub fn with_bitexact(mut self, on: bool) -> Self {
        self.bitexact = on;
        self
    }

    /// Reject out-of-range values.
    pub fn validate(&self) -> ScaleResult<()> {
        if self.lines_ahead > LINES_AHEAD_LIMIT {
            return Err(ScaleError::configuration(format!(
                "lines_ahead must be <= {LINES_AHEAD_LIMIT}, got {}",
                self.lines_ahead
            )));
        }
        Ok(())
    }
}
