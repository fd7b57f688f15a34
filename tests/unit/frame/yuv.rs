use super::*;

#[test]
fn planar_frames_keep_three_tight_planes() {
    let f = YuvFrame::new(5, 3, PixelFormat::Yuv420p).unwrap();
    assert_eq!(f.plane_count(), 3);
    assert_eq!(f.chroma_dimensions(), Dimensions { width: 3, height: 2 });
    assert_eq!(f.plane(0).unwrap().len(), 15);
    assert_eq!(f.plane(1).unwrap().len(), 6);
    assert_eq!(f.plane(2).unwrap().len(), 6);
    assert!(f.plane(3).is_none());
    assert_eq!((f.stride(0), f.stride(1), f.stride(2), f.stride(3)), (5, 3, 3, 0));
}

#[test]
fn semi_planar_frames_interleave_chroma() {
    let f = YuvFrame::filled(4, 4, PixelFormat::Nv21, 16, 90, 240).unwrap();
    assert_eq!(f.plane_count(), 2);
    assert_eq!(f.stride(1), 4);
    assert_eq!(&f.plane(1).unwrap()[..4], &[240, 90, 240, 90]);
    assert_eq!(f.chroma(1, 1), (90, 240));
    assert_eq!(f.luma(3, 3), 16);
}

#[test]
fn packed_bytes_round_trip() {
    let len = YuvFrame::packed_len(4, 2, PixelFormat::Nv12).unwrap();
    assert_eq!(len, 8 + 4);
    let bytes: Vec<u8> = (0..len as u8).collect();
    let f = YuvFrame::from_packed(4, 2, PixelFormat::Nv12, &bytes).unwrap();
    assert_eq!(f.chroma(0, 0), (8, 9));
    assert_eq!(f.to_packed(), bytes);

    let err = YuvFrame::from_packed(4, 2, PixelFormat::Nv12, &bytes[1..]).unwrap_err();
    assert!(matches!(err, ScaleError::Configuration(_)));
}

#[test]
fn setters_respect_chroma_order() {
    let mut f = YuvFrame::new(2, 2, PixelFormat::Nv21).unwrap();
    f.set_chroma(0, 0, 1, 2);
    f.set_luma(1, 0, 7);
    assert_eq!(f.plane(1).unwrap(), &[2, 1]);
    assert_eq!(f.chroma(0, 0), (1, 2));
    assert_eq!(f.plane(0).unwrap(), &[0, 7, 0, 0]);
}

#[test]
fn slice_source_cuts_matching_chroma_rows() {
    let mut f = YuvFrame::new(2, 6, PixelFormat::Yuv420p).unwrap();
    for y in 0..6 {
        f.set_luma(0, y, y as u8);
    }
    for y in 0..3 {
        f.set_chroma(0, y, 10 + y as u8, 20 + y as u8);
    }
    let slice = f.slice_source(2, 3);
    let luma = slice.plane(0).unwrap();
    assert_eq!(luma.data.len(), 6);
    assert_eq!(luma.data[0], 2);
    let u = slice.plane(1).unwrap();
    // Rows 2..5 touch chroma rows 1 and 2.
    assert_eq!(u.data, &[11, 12]);
}

#[test]
fn zero_sized_frames_are_rejected() {
    assert!(YuvFrame::new(0, 4, PixelFormat::Yuv444p).is_err());
}

#[test]
fn slice_source_clamps_rows_past_the_bottom() {
    let f = YuvFrame::filled(2, 4, PixelFormat::Nv12, 9, 1, 2).unwrap();
    let tail = f.slice_source(2, u32::MAX);
    assert_eq!(tail.plane(0).unwrap().data, &[9, 9, 9, 9]);
    assert_eq!(tail.plane(1).unwrap().data, &[1, 2]);
    let past = f.slice_source(u32::MAX, u32::MAX);
    assert!(past.plane(0).unwrap().data.is_empty());
    assert!(past.plane(1).unwrap().data.is_empty());
}

#[cfg(target_pointer_width = "64")]
#[test]
fn sample_index_is_computed_in_usize() {
    let dims = Dimensions::new(100_000, 100_000).unwrap();
    assert_eq!(index(dims, 5, 50_000), 5_000_000_005);
    assert_eq!(index(dims, 99_999, 99_999), 9_999_999_999);
}
