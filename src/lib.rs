//! yuvslice is a slice-streaming polyphase scaler for 8-bit YUV images.
//!
//! Source rows arrive in horizontal slices of arbitrary height; destination
//! rows are emitted as soon as every source row they depend on has been seen.
//! Intermediate horizontally scaled rows live in fixed-size ring buffers, so
//! memory stays bounded regardless of image height.
//!
//! # Pipeline overview
//!
//! 1. **Synthesize**: a [`ScaleConfig`] builds four fixed-point filters
//!    (horizontal/vertical for luma and chroma) once per geometry pair.
//! 2. **Horizontal**: each new source row is scaled into a 15-bit ring line.
//!    Interleaved (NV12/NV21) chroma is split into planes first.
//! 3. **Vertical**: each destination row blends the ring lines its filter
//!    names and writes 8-bit samples into the caller's frame.
//!
//! Supported formats are `yuv420p`, `yuv444p`, `nv12` and `nv21` on either
//! side; conversion between them happens along the way.
//!
//! # Getting started
//!
//! - [`ScalingContext::create`] then [`ScalingContext::scale`] for streaming.
//! - [`ScalingContext::scale_frame`] with [`YuvFrame`] for whole frames.
//! - [`scale_frames`] for batches, optionally on a rayon pool.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod batch;
mod filter;
mod format;
mod foundation;
mod frame;
mod kernel;
mod pipeline;
mod scale;
mod slice;

pub use batch::parallel::{BatchOptions, scale_frames};
pub use filter::FilterSet;
pub use filter::synth::{
    Filter, FilterParams, MAX_FILTER_SIZE, REPLICATED_TAIL, axis_increment, local_position,
    synthesize,
};
pub use format::pixel::{
    ChromaOrder, ComponentDescriptor, FormatDescriptor, PixelFormat, describe,
};
pub use foundation::core::{ChromaShift, Dimensions};
pub use foundation::error::{ScaleError, ScaleResult};
pub use frame::yuv::YuvFrame;
pub use kernel::chroma::{deinterleave_chroma, interleave_chroma};
pub use kernel::horizontal::hscale;
pub use kernel::vertical::{vscale_multi, vscale_single};
pub use scale::config::{ImageGeometry, RowRequirement, ScaleConfig};
pub use scale::context::{ScalingContext, StreamPhase, StreamState, StreamStats};
pub use scale::options::{ChromaPosition, MAX_LINES_AHEAD, ScaleOptions};
pub use slice::view::{DestImage, MAX_PLANES, PlaneMut, PlaneRef, SourceImage};
