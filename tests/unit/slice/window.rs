use super::*;

#[test]
fn contiguous_rows_extend_the_window() {
    let mut w = RowWindow::ring(4);
    assert_eq!(w.populate(0, 2).unwrap(), Populate::Extended);
    assert_eq!(w.populate(2, 1).unwrap(), Populate::Extended);
    assert_eq!((w.start(), w.end()), (0, 3));
    assert!(w.contains(0) && w.contains(2));
    assert!(!w.contains(3));
}

#[test]
fn gaps_restart_the_window() {
    let mut w = RowWindow::ring(4);
    w.populate(0, 2).unwrap();
    assert_eq!(w.populate(5, 1).unwrap(), Populate::HoleReset);
    assert_eq!((w.start(), w.height()), (5, 1));
    assert!(!w.contains(1));
}

#[test]
fn rewriting_an_old_row_is_a_contract_violation() {
    let mut w = RowWindow::ring(4);
    w.populate(0, 3).unwrap();
    let err = w.populate(1, 1).unwrap_err();
    assert!(matches!(err, ScaleError::ContractViolation(_)));
}

#[test]
fn ring_exposes_only_the_newest_capacity_rows() {
    let mut w = RowWindow::ring(3);
    w.populate(0, 5).unwrap();
    assert_eq!(w.valid(), RowRange::new(2, 5));
    assert!(!w.contains(1));
    assert!(w.ensure(2, 4, "luma").is_ok());
    assert!(w.ensure(1, 4, "luma").is_err());
    assert_eq!(w.slot(4), 1);
    assert_eq!(w.slot(1), 1);
}

#[test]
fn rotation_waits_for_twice_the_capacity() {
    let mut w = RowWindow::ring(4);
    w.populate(0, 7).unwrap();
    assert_eq!(w.rotate(7), 0);
    assert_eq!(w.start(), 0);

    w.populate(7, 2).unwrap();
    assert_eq!(w.rotate(8), 1);
    assert_eq!((w.start(), w.height()), (4, 5));
    assert_eq!(w.valid(), RowRange::new(5, 9));
}

#[test]
fn fixed_windows_never_rotate() {
    let mut w = RowWindow::fixed(8, 4);
    assert_eq!(w.rotate(100), 0);
    assert_eq!(w.valid(), RowRange::new(8, 12));
    assert_eq!(w.slot(9), 1);
    assert!(w.ensure(7, 9, "source").is_err());
}

#[test]
fn reset_empties_the_window() {
    let mut w = RowWindow::ring(2);
    w.populate(0, 2).unwrap();
    w.reset(10);
    assert_eq!(w.valid(), RowRange::new(10, 10));
    assert_eq!(w.populate(10, 1).unwrap(), Populate::Extended);
}
