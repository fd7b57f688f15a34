use std::sync::Arc;

use crate::foundation::error::ScaleResult;
use crate::format::pixel::PixelFormat;
use crate::pipeline::build::StagePlan;
use crate::pipeline::stage::{Buffers, ConvertPlanes};
use crate::scale::config::ScaleConfig;
use crate::scale::options::ScaleOptions;
use crate::slice::plane::LineSlice;

/// Counters accumulated since the last restart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StreamStats {
    /// Streaming calls accepted.
    pub calls: u64,
    /// Destination rows emitted.
    pub rows_produced: u64,
    /// Source luma rows scaled horizontally.
    pub luma_rows_hscaled: u64,
    /// Source chroma rows scaled horizontally (U and V together count once).
    pub chroma_rows_hscaled: u64,
    /// Interleaved source chroma rows split into planes.
    pub chroma_rows_converted: u64,
    /// Ring windows restarted because needed rows did not abut buffered ones.
    pub hole_resets: u64,
    /// Ring rotation steps.
    pub ring_rotations: u64,
    /// Calls that stopped early waiting for more input.
    pub underruns: u64,
}

/// Where a context is in its stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StreamPhase {
    /// No rows received since creation or the last restart.
    #[default]
    NotStarted,
    /// Some but not all destination rows emitted.
    Streaming,
    /// Every destination row emitted.
    Drained,
}

/// Mutable cursors threaded through streaming calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamState {
    pub(crate) dst_y: u32,
    pub(crate) next_src_row: u32,
    pub(crate) phase: StreamPhase,
}

impl StreamState {
    /// Next destination row to emit.
    pub fn dst_y(&self) -> u32 {
        self.dst_y
    }

    /// Source row a continuation call must start at.
    pub fn next_src_row(&self) -> u32 {
        self.next_src_row
    }

    /// Current phase.
    pub fn phase(&self) -> StreamPhase {
        self.phase
    }
}

pub(crate) struct Engine {
    pub(crate) config: Arc<ScaleConfig>,
    pub(crate) plan: StagePlan,
    pub(crate) buffers: Buffers,
}

impl Engine {
    fn new(config: Arc<ScaleConfig>) -> Self {
        let plan = StagePlan::build(
            &config.src.descriptor,
            &config.dst.descriptor,
            config.filters.v_luma.tap_count(),
            config.filters.v_chroma.tap_count(),
        );
        let lines = LineSlice::new(
            config.dst.luma.width as usize,
            config.dst.chroma.width as usize,
            config.luma_lines,
            config.chroma_lines,
        );
        let converted = plan
            .converts_chroma()
            .then(|| ConvertPlanes::new(config.src.chroma.width as usize, config.chroma_lines));
        Self {
            config,
            plan,
            buffers: Buffers { lines, converted },
        }
    }
}

/// Long-lived scaler for one (source, destination) geometry pair.
///
/// A context is not shareable across threads while streaming; create one per
/// concurrent job (see [`ScalingContext::from_config`]).
pub struct ScalingContext {
    pub(crate) engine: Option<Engine>,
    pub(crate) state: StreamState,
    pub(crate) stats: StreamStats,
}

impl ScalingContext {
    /// Build a context with default options.
    pub fn create(
        src_w: u32,
        src_h: u32,
        src_format: PixelFormat,
        dst_w: u32,
        dst_h: u32,
        dst_format: PixelFormat,
    ) -> ScaleResult<Self> {
        Self::with_options(
            src_w,
            src_h,
            src_format,
            dst_w,
            dst_h,
            dst_format,
            ScaleOptions::default(),
        )
    }

    /// Build a context with explicit options.
    #[tracing::instrument(level = "debug", skip(options))]
    pub fn with_options(
        src_w: u32,
        src_h: u32,
        src_format: PixelFormat,
        dst_w: u32,
        dst_h: u32,
        dst_format: PixelFormat,
        options: ScaleOptions,
    ) -> ScaleResult<Self> {
        let config = ScaleConfig::new(
            (src_w, src_h, src_format),
            (dst_w, dst_h, dst_format),
            options,
        )?;
        Ok(Self::from_config(Arc::new(config)))
    }

    /// Fresh context (own buffers and cursors) sharing already synthesized filters.
    pub fn from_config(config: Arc<ScaleConfig>) -> Self {
        Self {
            engine: Some(Engine::new(config)),
            state: StreamState::default(),
            stats: StreamStats::default(),
        }
    }

    /// The immutable configuration, or `None` once destroyed.
    pub fn config(&self) -> Option<&ScaleConfig> {
        self.engine.as_ref().map(|e| e.config.as_ref())
    }

    /// Shared handle to the configuration, or `None` once destroyed.
    pub fn shared_config(&self) -> Option<Arc<ScaleConfig>> {
        self.engine.as_ref().map(|e| Arc::clone(&e.config))
    }

    /// Streaming cursors.
    pub fn state(&self) -> &StreamState {
        &self.state
    }

    /// Counters since the last restart.
    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    /// Release filters and line buffers. Calling it again does nothing.
    pub fn destroy(&mut self) {
        if self.engine.take().is_some() {
            tracing::debug!("scaling context destroyed");
        }
        self.state = StreamState::default();
    }

    /// `true` after [`ScalingContext::destroy`].
    pub fn is_destroyed(&self) -> bool {
        self.engine.is_none()
    }

    pub(crate) fn restart(&mut self) {
        self.state = StreamState::default();
        self.stats = StreamStats::default();
        if let Some(engine) = &mut self.engine {
            engine.buffers.clear();
        }
    }
}

impl std::fmt::Debug for ScalingContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("ScalingContext");
        if let Some(config) = self.config() {
            s.field("src", &config.src.luma)
                .field("src_format", &config.src.format)
                .field("dst", &config.dst.luma)
                .field("dst_format", &config.dst.format);
        } else {
            s.field("destroyed", &true);
        }
        s.field("state", &self.state).finish()
    }
}
