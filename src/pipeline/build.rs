use std::ops::Range;

use crate::format::pixel::FormatDescriptor;
use crate::pipeline::stage::{ChromaInput, Stage, VKernel};

/// Ordered stages of one context, split into the three groups the driver
/// invokes separately.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct StagePlan {
    pub(crate) stages: Vec<Stage>,
    pub(crate) luma_h: Range<usize>,
    pub(crate) chroma_h: Range<usize>,
    pub(crate) vertical: Range<usize>,
}

impl StagePlan {
    /// Wire the stages for a format pair and the vertical tap counts.
    pub(crate) fn build(
        src: &FormatDescriptor,
        dst: &FormatDescriptor,
        v_luma_taps: usize,
        v_chroma_taps: usize,
    ) -> Self {
        let mut stages = vec![Stage::LumaHScale];
        let luma_h = 0..stages.len();

        let chroma_input = match src.chroma_order.filter(|_| src.interleaved_chroma) {
            Some(order) => {
                stages.push(Stage::ChromaConvert(order));
                ChromaInput::Converted
            }
            None => ChromaInput::Source,
        };
        stages.push(Stage::ChromaHScale(chroma_input));
        let chroma_h = luma_h.end..stages.len();

        let interleave = dst.chroma_order.filter(|_| dst.interleaved_chroma);
        stages.push(Stage::LumaVScale(VKernel::select(v_luma_taps, None)));
        stages.push(Stage::ChromaVScale(VKernel::select(v_chroma_taps, interleave)));
        let vertical = chroma_h.end..stages.len();

        let plan = Self {
            stages,
            luma_h,
            chroma_h,
            vertical,
        };
        tracing::debug!(
            src = src.name,
            dst = dst.name,
            stages = ?plan.stages.iter().map(Stage::name).collect::<Vec<_>>(),
            "pipeline wired"
        );
        plan
    }

    pub(crate) fn luma_stages(&self) -> &[Stage] {
        &self.stages[self.luma_h.clone()]
    }

    pub(crate) fn chroma_stages(&self) -> &[Stage] {
        &self.stages[self.chroma_h.clone()]
    }

    pub(crate) fn vertical_stages(&self) -> &[Stage] {
        &self.stages[self.vertical.clone()]
    }

    /// `true` when source chroma must be split before horizontal scaling.
    pub(crate) fn converts_chroma(&self) -> bool {
        self.chroma_stages()
            .iter()
            .any(|s| matches!(s, Stage::ChromaConvert(_)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/build.rs"]
mod tests;
