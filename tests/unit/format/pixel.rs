use super::*;

#[test]
fn semi_planar_formats_swap_chroma_order() {
    let nv12 = describe(PixelFormat::Nv12);
    let nv21 = describe(PixelFormat::Nv21);
    assert!(nv12.interleaved_chroma && nv21.interleaved_chroma);
    assert_eq!(nv12.chroma_order, Some(ChromaOrder::Uv));
    assert_eq!(nv21.chroma_order, Some(ChromaOrder::Vu));
    assert_eq!(nv12.components[1].offset, 0);
    assert_eq!(nv21.components[1].offset, 1);
    assert_eq!(nv12.plane_count(), 2);
}

#[test]
fn planar_subsampling_shifts() {
    let p420 = describe(PixelFormat::Yuv420p);
    assert_eq!((p420.chroma_shift.log2_w, p420.chroma_shift.log2_h), (1, 1));
    assert!(!p420.interleaved_chroma);
    assert_eq!(p420.chroma_order, None);

    let p444 = describe(PixelFormat::Yuv444p);
    assert_eq!((p444.chroma_shift.log2_w, p444.chroma_shift.log2_h), (0, 0));
    assert_eq!(p444.plane_count(), 3);
}

#[test]
fn bits_per_pixel_matches_layout() {
    assert_eq!(describe(PixelFormat::Yuv420p).bits_per_pixel(), 12);
    assert_eq!(describe(PixelFormat::Nv21).bits_per_pixel(), 12);
    assert_eq!(describe(PixelFormat::Yuv444p).bits_per_pixel(), 24);
    for f in PixelFormat::ALL {
        assert_eq!(f.descriptor().uniform_depth(), Some(8));
    }
}

#[test]
fn names_parse_back() {
    for f in PixelFormat::ALL {
        assert_eq!(f.name().parse::<PixelFormat>().unwrap(), f);
    }
    assert_eq!("NV12".parse::<PixelFormat>().unwrap(), PixelFormat::Nv12);
    assert!("rgb24".parse::<PixelFormat>().is_err());
}
