use crate::foundation::error::{ScaleError, ScaleResult};
use crate::pipeline::stage::{Stage, StageIo};
use crate::scale::config::ScaleConfig;
use crate::scale::context::{ScalingContext, StreamPhase};
use crate::slice::view::{DestImage, SinkView, SourceImage, SourceView};

impl ScalingContext {
    /// Feed source rows `[src_row_offset, src_row_offset + src_row_count)` and
    /// emit every destination row they complete.
    ///
    /// `src` holds only the rows of this slice (its row 0 is `src_row_offset`);
    /// `dst` is the whole destination frame. An offset of 0 restarts the
    /// stream; any other offset must continue exactly where the previous call
    /// ended. Returns the number of destination rows written, which is 0 when
    /// more input is needed.
    #[tracing::instrument(level = "trace", skip(self, src, dst))]
    pub fn scale(
        &mut self,
        src: &SourceImage<'_>,
        src_row_offset: u32,
        src_row_count: u32,
        dst: &mut DestImage<'_>,
    ) -> ScaleResult<u32> {
        let config = match &self.engine {
            Some(engine) => std::sync::Arc::clone(&engine.config),
            None => return Err(ScaleError::contract("scale called on a destroyed context")),
        };
        check_slice(&config, src_row_offset, src_row_count)?;
        if src_row_offset != 0 && src_row_offset != self.state.next_src_row {
            return Err(ScaleError::contract(format!(
                "slice starts at row {src_row_offset}, expected 0 or {}",
                self.state.next_src_row
            )));
        }

        // A rejected call leaves the cursor where it was.
        let first = src_row_offset as i32;
        let source = SourceView::new(
            src,
            &config.src.descriptor,
            config.src.luma,
            config.src.chroma,
            first,
            src_row_count as i32,
        )?;
        let mut sink = SinkView::new(dst, &config.dst.descriptor, config.dst.luma, config.dst.chroma)?;

        if src_row_offset == 0 {
            self.restart();
        }
        self.state.next_src_row = src_row_offset + src_row_count;
        self.stats.calls += 1;

        if self.state.phase == StreamPhase::Drained {
            return Ok(0);
        }
        self.state.phase = StreamPhase::Streaming;

        let produced = self.run(&config, &source, &mut sink, first)?;

        if self.state.dst_y == config.dst.luma.height {
            self.state.phase = StreamPhase::Drained;
            tracing::trace!(dst_rows = self.state.dst_y, "stream drained");
        }
        Ok(produced)
    }

    fn run(
        &mut self,
        config: &ScaleConfig,
        source: &SourceView<'_>,
        sink: &mut SinkView<'_>,
        first: i32,
    ) -> ScaleResult<u32> {
        let Some(engine) = self.engine.as_mut() else {
            return Err(ScaleError::contract("scale called on a destroyed context"));
        };
        let state = &mut self.state;

        let luma_end = source.luma_end();
        let chroma_end = source.chroma_end();
        let chroma_start = first >> config.src.descriptor.chroma_shift.log2_h;
        let luma_cap = config.luma_lines as i32;
        let chroma_cap = config.chroma_lines as i32;
        let plan = &engine.plan;

        let mut io = StageIo {
            filters: &config.filters,
            source,
            buffers: &mut engine.buffers,
            sink,
            stats: &mut self.stats,
            src_height: config.src.luma.height as i32,
            src_chroma_height: config.src.chroma.height as i32,
            dst_chroma_shift: config.dst.descriptor.chroma_shift,
        };

        let start_row = state.dst_y;
        while state.dst_y < config.dst.luma.height {
            let dst_row = state.dst_y;
            let need = config.required_rows(dst_row);
            let enough = need.last_luma_group < luma_end && need.last_chroma < chroma_end;

            let (luma_target, chroma_target) = if enough {
                (need.last_luma, need.last_chroma)
            } else {
                (
                    (luma_end - 1).min(need.first_luma + luma_cap - 1),
                    (chroma_end - 1).min(need.first_chroma + chroma_cap - 1),
                )
            };

            let rotations = io.buffers.lines.rotate(luma_target, chroma_target);
            io.stats.ring_rotations += u64::from(rotations);

            let holes = io.stats.hole_resets;
            let luma_from = need.first_luma.max(io.buffers.lines.luma.window().end());
            produce(plan.luma_stages(), &mut io, luma_from, luma_target, first)?;
            let chroma_from = need.first_chroma.max(io.buffers.lines.chroma_u.window().end());
            produce(plan.chroma_stages(), &mut io, chroma_from, chroma_target, chroma_start)?;
            if io.stats.hole_resets != holes {
                tracing::trace!(dst_row, luma_from, chroma_from, "ring window restarted");
            }

            if !enough {
                io.stats.underruns += 1;
                tracing::trace!(
                    dst_row,
                    need_luma = need.last_luma_group,
                    need_chroma = need.last_chroma,
                    buffered = io.buffers.lines.luma.window().height(),
                    "buffering slice"
                );
                break;
            }

            for stage in plan.vertical_stages() {
                stage.process(&mut io, dst_row as i32, 1)?;
            }
            state.dst_y += 1;
            io.stats.rows_produced += 1;
        }

        Ok(state.dst_y - start_row)
    }

    /// Scale a whole frame in one call (restarting the stream).
    pub fn scale_frame(
        &mut self,
        src: &crate::frame::yuv::YuvFrame,
        dst: &mut crate::frame::yuv::YuvFrame,
    ) -> ScaleResult<u32> {
        let config = self
            .config()
            .ok_or_else(|| ScaleError::contract("scale called on a destroyed context"))?;
        if src.format() != config.src.format || src.dimensions() != config.src.luma {
            return Err(ScaleError::contract(format!(
                "source frame is {} {}x{}, context expects {} {}x{}",
                src.format(),
                src.width(),
                src.height(),
                config.src.format,
                config.src.luma.width,
                config.src.luma.height
            )));
        }
        if dst.format() != config.dst.format || dst.dimensions() != config.dst.luma {
            return Err(ScaleError::contract(format!(
                "destination frame is {} {}x{}, context expects {} {}x{}",
                dst.format(),
                dst.width(),
                dst.height(),
                config.dst.format,
                config.dst.luma.width,
                config.dst.luma.height
            )));
        }
        let height = src.height();
        self.scale(&src.as_source(), 0, height, &mut dst.as_dest())
    }
}

/// Run `stages` over rows `from..=to` of their input.
fn produce(
    stages: &[Stage],
    io: &mut StageIo<'_, '_, '_>,
    from: i32,
    to: i32,
    slice_start: i32,
) -> ScaleResult<()> {
    if from > to {
        return Ok(());
    }
    if from < slice_start {
        return Err(ScaleError::contract(format!(
            "row {from} is needed but was neither buffered nor part of this slice (starts at {slice_start})"
        )));
    }
    for stage in stages {
        stage.process(io, from, to - from + 1)?;
    }
    Ok(())
}

fn check_slice(config: &ScaleConfig, offset: u32, count: u32) -> ScaleResult<()> {
    let src_h = config.src.luma.height;
    if count == 0 {
        return Err(ScaleError::contract("source slice is empty"));
    }
    let end = offset.checked_add(count).filter(|&end| end <= src_h).ok_or_else(|| {
        ScaleError::contract(format!(
            "slice rows {offset}..{} exceed source height {src_h}",
            u64::from(offset) + u64::from(count)
        ))
    })?;
    let mask = config.src.descriptor.chroma_shift.row_mask();
    if offset & mask != 0 {
        return Err(ScaleError::contract(format!(
            "slice offset {offset} is not a multiple of {}",
            mask + 1
        )));
    }
    if count & mask != 0 && end != src_h {
        return Err(ScaleError::contract(format!(
            "slice height {count} is not a multiple of {} and does not end the image",
            mask + 1
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scale/driver.rs"]
mod tests;
