use std::sync::Arc;

use rayon::prelude::*;

use crate::foundation::error::{ScaleError, ScaleResult};
use crate::format::pixel::PixelFormat;
use crate::frame::yuv::YuvFrame;
use crate::scale::config::ScaleConfig;
use crate::scale::context::ScalingContext;
use crate::scale::options::ScaleOptions;

/// How [`scale_frames`] spreads work across threads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchOptions {
    /// Scale frames on a dedicated thread pool.
    pub parallel: bool,
    /// Worker count; `None` lets rayon decide.
    pub threads: Option<usize>,
    /// Frames handed to the pool per round.
    pub chunk_size: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            parallel: false,
            threads: None,
            chunk_size: 64,
        }
    }
}

/// Scale every frame of `frames` to `dst_w x dst_h` in `dst_format`.
///
/// Filters are synthesized once and shared; each worker streams through its
/// own [`ScalingContext`]. Output order matches input order.
pub fn scale_frames(
    frames: &[YuvFrame],
    dst_w: u32,
    dst_h: u32,
    dst_format: PixelFormat,
    options: &ScaleOptions,
    batch: &BatchOptions,
) -> ScaleResult<Vec<YuvFrame>> {
    let Some(first) = frames.first() else {
        return Ok(Vec::new());
    };
    if let Some((idx, odd)) = frames
        .iter()
        .enumerate()
        .find(|(_, f)| f.format() != first.format() || f.dimensions() != first.dimensions())
    {
        return Err(ScaleError::configuration(format!(
            "frame {idx} is {} {}x{}, batch expects {} {}x{}",
            odd.format(),
            odd.width(),
            odd.height(),
            first.format(),
            first.width(),
            first.height()
        )));
    }

    let config = Arc::new(ScaleConfig::new(
        (first.width(), first.height(), first.format()),
        (dst_w, dst_h, dst_format),
        options.clone(),
    )?);
    tracing::debug!(
        frames = frames.len(),
        parallel = batch.parallel,
        threads = ?batch.threads,
        "scaling batch"
    );

    if !batch.parallel {
        let mut ctx = ScalingContext::from_config(Arc::clone(&config));
        return frames
            .iter()
            .map(|frame| scale_one(&mut ctx, frame, dst_w, dst_h, dst_format))
            .collect();
    }

    let pool = build_thread_pool(batch.threads)?;
    let chunk_size = batch.chunk_size.max(1);
    let mut out = Vec::with_capacity(frames.len());
    for chunk in frames.chunks(chunk_size) {
        let scaled = pool.install(|| {
            chunk
                .par_iter()
                .map_init(
                    || ScalingContext::from_config(Arc::clone(&config)),
                    |ctx, frame| scale_one(ctx, frame, dst_w, dst_h, dst_format),
                )
                .collect::<Vec<_>>()
        });
        for frame in scaled {
            out.push(frame?);
        }
    }
    Ok(out)
}

fn scale_one(
    ctx: &mut ScalingContext,
    frame: &YuvFrame,
    dst_w: u32,
    dst_h: u32,
    dst_format: PixelFormat,
) -> ScaleResult<YuvFrame> {
    let mut dst = YuvFrame::new(dst_w, dst_h, dst_format)?;
    ctx.scale_frame(frame, &mut dst)?;
    Ok(dst)
}

fn build_thread_pool(threads: Option<usize>) -> ScaleResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ScaleError::configuration(
            "batch threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ScaleError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/batch/parallel.rs"]
mod tests;
