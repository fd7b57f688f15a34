use super::*;
use crate::format::pixel::{PixelFormat, describe};

fn dims(w: u32, h: u32) -> Dimensions {
    Dimensions::new(w, h).unwrap()
}

#[test]
fn source_rows_are_relative_to_the_slice() {
    let luma: Vec<u8> = (0..4 * 6).map(|v| v as u8).collect();
    let u = [7u8; 2 * 3];
    let v = [9u8; 2 * 3];
    let image = SourceImage::from_planes([
        PlaneRef::new(&luma, 6),
        PlaneRef::new(&u, 3),
        PlaneRef::new(&v, 3),
    ]);
    let fmt = describe(PixelFormat::Yuv420p);
    // Rows 4..8 of an 8-row image.
    let view = SourceView::new(&image, &fmt, dims(5, 8), dims(3, 4), 4, 4).unwrap();
    assert_eq!(view.luma_row(4).unwrap(), &[0, 1, 2, 3, 4]);
    assert_eq!(view.luma_row(7).unwrap(), &[18, 19, 20, 21, 22]);
    assert!(view.luma_row(3).is_err());
    assert!(view.luma_row(8).is_err());
    assert_eq!(view.chroma_end(), 4);
    assert_eq!(view.chroma_rows(2).unwrap(), (&[7u8, 7, 7][..], &[9u8, 9, 9][..]));
    assert!(view.chroma_rows(1).is_err());
    assert!(view.interleaved_row(2).is_err());
}

#[test]
fn short_source_buffers_are_rejected() {
    let luma = [0u8; 10];
    let uv = [0u8; 4];
    let image = SourceImage::from_planes([PlaneRef::new(&luma, 4), PlaneRef::new(&uv, 4)]);
    let fmt = describe(PixelFormat::Nv12);
    let err = SourceView::new(&image, &fmt, dims(4, 4), dims(2, 2), 0, 4).unwrap_err();
    assert!(matches!(err, ScaleError::ContractViolation(_)), "{err}");

    let image = SourceImage::new().with_plane(0, PlaneRef::new(&luma, 2));
    assert!(SourceView::new(&image, &fmt, dims(4, 2), dims(2, 1), 0, 2).is_err());
}

#[test]
fn sink_rows_are_absolute() {
    let mut y = vec![0u8; 4 * 4];
    let mut uv = vec![0u8; 4 * 2];
    let mut image = DestImage::from_planes([PlaneMut::new(&mut y, 4), PlaneMut::new(&mut uv, 4)]);
    let fmt = describe(PixelFormat::Nv21);
    {
        let mut sink = SinkView::new(&mut image, &fmt, dims(4, 4), dims(2, 2)).unwrap();
        sink.luma_row_mut(3).unwrap().fill(5);
        let (row, order) = sink.interleaved_row_mut(1).unwrap();
        assert_eq!(order, ChromaOrder::Vu);
        row.copy_from_slice(&[1, 2, 3, 4]);
        assert!(sink.luma_row_mut(4).is_err());
        assert!(sink.chroma_rows_mut(0).is_err());
    }
    drop(image);
    assert_eq!(&y[12..], &[5, 5, 5, 5]);
    assert_eq!(&uv[4..], &[1, 2, 3, 4]);
}

#[test]
fn sink_requires_every_plane() {
    let mut y = vec![0u8; 4];
    let mut image = DestImage::new().with_plane(0, PlaneMut::new(&mut y, 2));
    let fmt = describe(PixelFormat::Yuv444p);
    assert!(SinkView::new(&mut image, &fmt, dims(2, 2), dims(2, 2)).is_err());
    assert!(image.plane_mut(0).is_some());
    assert!(image.plane_mut(1).is_none());
}
