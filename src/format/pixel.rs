use std::fmt;
use std::str::FromStr;

use crate::foundation::core::ChromaShift;
use crate::foundation::error::{ScaleError, ScaleResult};

/// Supported 8-bit YUV layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    /// Planar 4:2:0 (Y, U, V planes).
    Yuv420p,
    /// Planar 4:4:4 (Y, U, V planes).
    Yuv444p,
    /// Semi-planar 4:2:0 with interleaved U,V byte pairs.
    Nv12,
    /// Semi-planar 4:2:0 with interleaved V,U byte pairs.
    Nv21,
}

/// Byte order of an interleaved chroma plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ChromaOrder {
    /// U first, then V (NV12).
    Uv,
    /// V first, then U (NV21).
    Vu,
}

/// Location of one component inside the plane set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ComponentDescriptor {
    /// Plane holding the component.
    pub plane: u8,
    /// Bytes between horizontally adjacent samples.
    pub step: u8,
    /// Bytes before the first sample of a row.
    pub offset: u8,
    /// Bits per sample.
    pub depth: u8,
}

/// Everything the scaler needs to know about a pixel format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FormatDescriptor {
    /// Canonical lowercase name.
    pub name: &'static str,
    /// Whether each plane holds a single component kind (true for all supported formats).
    pub planar: bool,
    /// Chroma subsampling factors.
    pub chroma_shift: ChromaShift,
    /// Y, U and V component layout.
    pub components: [ComponentDescriptor; 3],
    /// Chroma lives in one plane of interleaved pairs.
    pub interleaved_chroma: bool,
    /// Pair order when `interleaved_chroma` is set.
    pub chroma_order: Option<ChromaOrder>,
}

const fn comp(plane: u8, step: u8, offset: u8) -> ComponentDescriptor {
    ComponentDescriptor {
        plane,
        step,
        offset,
        depth: 8,
    }
}

const YUV420P: FormatDescriptor = FormatDescriptor {
    name: "yuv420p",
    planar: true,
    chroma_shift: ChromaShift {
        log2_w: 1,
        log2_h: 1,
    },
    components: [comp(0, 1, 0), comp(1, 1, 0), comp(2, 1, 0)],
    interleaved_chroma: false,
    chroma_order: None,
};

const YUV444P: FormatDescriptor = FormatDescriptor {
    name: "yuv444p",
    planar: true,
    chroma_shift: ChromaShift {
        log2_w: 0,
        log2_h: 0,
    },
    components: [comp(0, 1, 0), comp(1, 1, 0), comp(2, 1, 0)],
    interleaved_chroma: false,
    chroma_order: None,
};

const NV12: FormatDescriptor = FormatDescriptor {
    name: "nv12",
    planar: true,
    chroma_shift: ChromaShift {
        log2_w: 1,
        log2_h: 1,
    },
    components: [comp(0, 1, 0), comp(1, 2, 0), comp(1, 2, 1)],
    interleaved_chroma: true,
    chroma_order: Some(ChromaOrder::Uv),
};

const NV21: FormatDescriptor = FormatDescriptor {
    name: "nv21",
    planar: true,
    chroma_shift: ChromaShift {
        log2_w: 1,
        log2_h: 1,
    },
    components: [comp(0, 1, 0), comp(1, 2, 1), comp(1, 2, 0)],
    interleaved_chroma: true,
    chroma_order: Some(ChromaOrder::Vu),
};

/// Look up the descriptor for a pixel format.
pub fn describe(format: PixelFormat) -> FormatDescriptor {
    match format {
        PixelFormat::Yuv420p => YUV420P,
        PixelFormat::Yuv444p => YUV444P,
        PixelFormat::Nv12 => NV12,
        PixelFormat::Nv21 => NV21,
    }
}

impl PixelFormat {
    /// All supported formats.
    pub const ALL: [PixelFormat; 4] = [
        PixelFormat::Yuv420p,
        PixelFormat::Yuv444p,
        PixelFormat::Nv12,
        PixelFormat::Nv21,
    ];

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        describe(self).name
    }

    /// Shorthand for `describe(self)`.
    pub fn descriptor(self) -> FormatDescriptor {
        describe(self)
    }
}

impl FormatDescriptor {
    /// Number of planes carrying data.
    pub fn plane_count(&self) -> usize {
        if self.interleaved_chroma { 2 } else { 3 }
    }

    /// Average bits per pixel over a full image.
    pub fn bits_per_pixel(&self) -> u32 {
        let chroma_div = 1u32 << (self.chroma_shift.log2_w + self.chroma_shift.log2_h);
        let mut bits = u32::from(self.components[0].depth);
        for c in &self.components[1..] {
            bits += u32::from(c.depth) / chroma_div;
        }
        bits
    }

    /// Depth shared by every component, if uniform.
    pub fn uniform_depth(&self) -> Option<u8> {
        let d = self.components[0].depth;
        self.components.iter().all(|c| c.depth == d).then_some(d)
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PixelFormat {
    type Err = ScaleError;

    fn from_str(s: &str) -> ScaleResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "yuv420p" => Ok(Self::Yuv420p),
            "yuv444p" => Ok(Self::Yuv444p),
            "nv12" => Ok(Self::Nv12),
            "nv21" => Ok(Self::Nv21),
            other => Err(ScaleError::configuration(format!(
                "unknown pixel format '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/format/pixel.rs"]
mod tests;
