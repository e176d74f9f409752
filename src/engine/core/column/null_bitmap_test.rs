use crate::engine::core::column::NullBitmap;

#[test]
fn null_bitmap_checks_bits() {
    let nb = NullBitmap::from_flags([false, true, false, false, true, false]);
    assert!(!nb.is_null(0));
    assert!(nb.is_null(1));
    assert!(nb.is_null(4));
    assert!(!nb.is_null(5));
    assert_eq!(nb.null_count(), 2);
    assert_eq!(nb.len(), 6);
}

#[test]
fn null_bitmap_with_len_has_no_nulls() {
    let nb = NullBitmap::with_len(20);
    assert_eq!(nb.len(), 20);
    for i in 0..20 {
        assert!(!nb.is_null(i));
    }
    assert!(!nb.has_nulls());
}

#[test]
fn null_bitmap_set_and_clear_across_bytes() {
    let mut nb = NullBitmap::with_len(17);
    nb.set(16, true);
    nb.set(8, true);
    assert!(nb.is_null(16));
    assert!(nb.is_null(8));
    nb.set(8, false);
    assert!(!nb.is_null(8));
    assert_eq!(nb.null_count(), 1);
}
