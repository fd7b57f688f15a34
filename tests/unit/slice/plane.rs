use super::*;

fn fill(plane: &mut LinePlane<i16>, row: i32) -> Populate {
    let (populate, line) = plane.write_row(row).unwrap();
    line.fill(row as i16);
    populate
}

#[test]
fn rows_read_back_by_absolute_index() {
    let mut p = LinePlane::<i16>::new(3, 4);
    for r in 0..4 {
        assert_eq!(fill(&mut p, r), Populate::Extended);
    }
    assert_eq!(p.row(2).unwrap(), &[2, 2, 2]);
    let rows = p.rows(1, 3).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[2], &[3, 3, 3]);
}

#[test]
fn wrapped_slot_does_not_alias_old_rows() {
    let mut p = LinePlane::<i16>::new(2, 3);
    for r in 0..5 {
        fill(&mut p, r);
    }
    // Row 4 reused the slot of row 1.
    assert_eq!(p.row(4).unwrap(), &[4, 4]);
    let err = p.row(1).unwrap_err();
    assert!(matches!(err, ScaleError::ContractViolation(_)));
    assert!(p.rows(1, 4).is_err());
}

#[test]
fn gaps_are_reported_as_hole_resets() {
    let mut p = LinePlane::<i16>::new(1, 4);
    fill(&mut p, 0);
    assert_eq!(fill(&mut p, 3), Populate::HoleReset);
    assert!(p.row(0).is_err());
    assert_eq!(p.row(3).unwrap(), &[3]);
}

#[test]
fn clear_forgets_everything() {
    let mut p = LinePlane::<u8>::new(2, 2);
    p.write_row(0).unwrap().1.fill(9);
    p.clear();
    assert!(p.row(0).is_err());
    assert_eq!(p.window().height(), 0);
}

#[test]
fn slice_rotates_luma_and_chroma_independently() {
    let mut s = LineSlice::new(4, 2, 2, 2);
    for r in 0..4 {
        fill(&mut s.luma, r);
    }
    for r in 0..2 {
        fill(&mut s.chroma_u, r);
        fill(&mut s.chroma_v, r);
    }
    assert_eq!(s.rotate(4, 1), 1);
    assert_eq!(s.luma.window().start(), 2);
    assert_eq!(s.chroma_u.window().start(), 0);
}
