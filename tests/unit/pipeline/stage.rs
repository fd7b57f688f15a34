use super::*;
use crate::format::pixel::PixelFormat;
use crate::frame::yuv::YuvFrame;
use crate::scale::config::ScaleConfig;
use crate::scale::options::ScaleOptions;
use crate::slice::view::SourceView;

struct Rig {
    config: ScaleConfig,
    buffers: Buffers,
    stats: StreamStats,
}

fn rig(src: (u32, u32, PixelFormat), dst: (u32, u32, PixelFormat)) -> Rig {
    let config = ScaleConfig::new(src, dst, ScaleOptions::default()).unwrap();
    let lines = LineSlice::new(
        config.dst.luma.width as usize,
        config.dst.chroma.width as usize,
        config.luma_lines,
        config.chroma_lines,
    );
    let converted = config
        .src
        .descriptor
        .interleaved_chroma
        .then(|| ConvertPlanes::new(config.src.chroma.width as usize, config.chroma_lines));
    Rig {
        config,
        buffers: Buffers { lines, converted },
        stats: StreamStats::default(),
    }
}

fn with_io<R>(
    rig: &mut Rig,
    src: &YuvFrame,
    dst: &mut YuvFrame,
    f: impl FnOnce(&mut StageIo<'_, '_, '_>) -> R,
) -> R {
    let c = &rig.config;
    let image = src.as_source();
    let source = SourceView::new(
        &image,
        &c.src.descriptor,
        c.src.luma,
        c.src.chroma,
        0,
        c.src.luma.height as i32,
    )
    .unwrap();
    let mut dest = dst.as_dest();
    let mut sink = SinkView::new(&mut dest, &c.dst.descriptor, c.dst.luma, c.dst.chroma).unwrap();
    let mut io = StageIo {
        filters: &c.filters,
        source: &source,
        buffers: &mut rig.buffers,
        sink: &mut sink,
        stats: &mut rig.stats,
        src_height: c.src.luma.height as i32,
        src_chroma_height: c.src.chroma.height as i32,
        dst_chroma_shift: c.dst.descriptor.chroma_shift,
    };
    f(&mut io)
}

fn ramp(w: u32, h: u32, format: PixelFormat) -> YuvFrame {
    let mut f = YuvFrame::new(w, h, format).unwrap();
    for y in 0..h {
        for x in 0..w {
            f.set_luma(x, y, (10 * y + x) as u8);
        }
    }
    let c = f.chroma_dimensions();
    for y in 0..c.height {
        for x in 0..c.width {
            f.set_chroma(x, y, (40 + 10 * y + x) as u8, (200 - 10 * y - x) as u8);
        }
    }
    f
}

#[test]
fn unity_luma_hscale_lifts_samples_to_15_bit() {
    let mut r = rig((4, 4, PixelFormat::Yuv444p), (4, 4, PixelFormat::Yuv444p));
    let src = ramp(4, 4, PixelFormat::Yuv444p);
    let mut dst = YuvFrame::new(4, 4, PixelFormat::Yuv444p).unwrap();

    let n = with_io(&mut r, &src, &mut dst, |io| Stage::LumaHScale.process(io, 0, 4)).unwrap();
    assert_eq!(n, 4);
    assert_eq!(r.stats.luma_rows_hscaled, 4);
    for y in 0..4 {
        let row = r.buffers.lines.luma.row(y).unwrap();
        let expected: Vec<i16> = (0..4).map(|x| i16::from(src.luma(x, y as u32)) << 7).collect();
        assert_eq!(row, expected.as_slice(), "row {y}");
    }
}

#[test]
fn convert_splits_interleaved_chroma_before_hscale() {
    let mut r = rig((4, 4, PixelFormat::Nv21), (4, 4, PixelFormat::Yuv420p));
    let src = ramp(4, 4, PixelFormat::Nv21);
    let mut dst = YuvFrame::new(4, 4, PixelFormat::Yuv420p).unwrap();

    with_io(&mut r, &src, &mut dst, |io| {
        Stage::ChromaConvert(ChromaOrder::Vu).process(io, 0, 2)?;
        Stage::ChromaHScale(ChromaInput::Converted).process(io, 0, 2)
    })
    .unwrap();

    assert_eq!(r.stats.chroma_rows_converted, 2);
    assert_eq!(r.stats.chroma_rows_hscaled, 2);
    let conv = r.buffers.converted.as_ref().unwrap();
    for y in 0..2 {
        let (u, v): (Vec<u8>, Vec<u8>) = (0..2).map(|x| src.chroma(x, y)).unzip();
        assert_eq!(conv.u.row(y as i32).unwrap(), u.as_slice());
        assert_eq!(conv.v.row(y as i32).unwrap(), v.as_slice());
        let lifted: Vec<i16> = u.iter().map(|&s| i16::from(s) << 7).collect();
        assert_eq!(r.buffers.lines.chroma_u.row(y as i32).unwrap(), lifted.as_slice());
    }
}

#[test]
fn converted_input_needs_convert_planes() {
    let mut r = rig((4, 4, PixelFormat::Yuv420p), (4, 4, PixelFormat::Yuv420p));
    let src = ramp(4, 4, PixelFormat::Yuv420p);
    let mut dst = YuvFrame::new(4, 4, PixelFormat::Yuv420p).unwrap();
    let err = with_io(&mut r, &src, &mut dst, |io| {
        Stage::ChromaHScale(ChromaInput::Converted).process(io, 0, 1)
    })
    .unwrap_err();
    assert!(matches!(err, ScaleError::ContractViolation(_)));
}

#[test]
fn unity_vertical_stages_reproduce_the_source() {
    let mut r = rig((4, 4, PixelFormat::Yuv444p), (4, 4, PixelFormat::Yuv444p));
    let src = ramp(4, 4, PixelFormat::Yuv444p);
    let mut dst = YuvFrame::new(4, 4, PixelFormat::Yuv444p).unwrap();
    let v_taps = r.config.filters.v_luma.tap_count();

    with_io(&mut r, &src, &mut dst, |io| -> ScaleResult<()> {
        Stage::LumaHScale.process(io, 0, 4)?;
        Stage::ChromaHScale(ChromaInput::Source).process(io, 0, 4)?;
        for d in 0..4 {
            Stage::LumaVScale(VKernel::select(v_taps, None)).process(io, d, 1)?;
            Stage::ChromaVScale(VKernel::select(v_taps, None)).process(io, d, 1)?;
        }
        Ok(())
    })
    .unwrap();
    assert_eq!(dst, src);
}

#[test]
fn chroma_vscale_skips_rows_sharing_a_chroma_row() {
    let mut r = rig((4, 4, PixelFormat::Yuv420p), (4, 4, PixelFormat::Yuv420p));
    let src = ramp(4, 4, PixelFormat::Yuv420p);
    let mut dst = YuvFrame::filled(4, 4, PixelFormat::Yuv420p, 0, 77, 77).unwrap();
    let n = with_io(&mut r, &src, &mut dst, |io| {
        Stage::ChromaVScale(VKernel::PlaneX).process(io, 1, 1)
    })
    .unwrap();
    assert_eq!(n, 0);
    assert!(dst.plane(1).unwrap().iter().all(|&s| s == 77));
}

#[test]
fn luma_rejects_the_interleaving_kernel() {
    let mut r = rig((4, 4, PixelFormat::Yuv420p), (4, 4, PixelFormat::Nv12));
    let src = ramp(4, 4, PixelFormat::Yuv420p);
    let mut dst = YuvFrame::new(4, 4, PixelFormat::Nv12).unwrap();
    let err = with_io(&mut r, &src, &mut dst, |io| -> ScaleResult<u32> {
        Stage::LumaHScale.process(io, 0, 4)?;
        Stage::LumaVScale(VKernel::Nv12cX(ChromaOrder::Uv)).process(io, 0, 1)
    })
    .unwrap_err();
    assert!(matches!(err, ScaleError::ContractViolation(_)), "{err}");
}

#[test]
fn non_abutting_rows_restart_the_ring() {
    let mut r = rig((4, 16, PixelFormat::Yuv444p), (4, 16, PixelFormat::Yuv444p));
    let src = ramp(4, 16, PixelFormat::Yuv444p);
    let mut dst = YuvFrame::new(4, 16, PixelFormat::Yuv444p).unwrap();
    with_io(&mut r, &src, &mut dst, |io| -> ScaleResult<()> {
        Stage::LumaHScale.process(io, 0, 2)?;
        Stage::LumaHScale.process(io, 10, 2)?;
        Ok(())
    })
    .unwrap();
    assert_eq!(r.stats.hole_resets, 1);
    assert_eq!(r.buffers.lines.luma.window().start(), 10);
    assert!(r.buffers.lines.luma.row(0).is_err());
}

#[test]
fn stage_names_are_stable() {
    assert_eq!(Stage::LumaHScale.name(), "luma_hscale");
    assert_eq!(Stage::ChromaConvert(ChromaOrder::Uv).name(), "chroma_convert");
    assert_eq!(Stage::ChromaVScale(VKernel::Plane1).name(), "chroma_vscale");
}
