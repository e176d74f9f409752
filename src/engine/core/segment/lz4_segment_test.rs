use crate::engine::core::column::NullBitmap;
use crate::engine::core::segment::Lz4Segment;

#[test]
fn decompresses_to_the_original_values() {
    let values: Vec<String> = (0..200).map(|i| format!("key-{}", i % 7)).collect();
    let segment = Lz4Segment::encode(&values, None).expect("encode");

    assert_eq!(segment.len(), 200);
    assert!(segment.compressed_size() > 0);
    assert_eq!(segment.decompress().expect("decompress"), values);
}

#[test]
fn repetitive_data_compresses() {
    let values = vec![42i64; 4096];
    let segment = Lz4Segment::encode(&values, None).expect("encode");
    assert!(segment.compressed_size() < 4096 * 8 / 4);
}

#[test]
fn cursor_respects_nulls() {
    let values = vec![1.5f64, 0.0, -2.25];
    let nulls = NullBitmap::from_flags([false, true, false]);
    let segment = Lz4Segment::encode(&values, Some(nulls)).expect("encode");

    let mut cursor = segment.cursor().expect("cursor");
    assert_eq!(cursor.get(0).as_deref(), Some(&1.5));
    assert_eq!(cursor.get(1), None);
    assert_eq!(cursor.get(2).as_deref(), Some(&-2.25));
    assert!(segment.null_values().is_some_and(|n| n.is_null(1)));
}

#[test]
fn empty_segment_roundtrips() {
    let segment = Lz4Segment::<i32>::encode(&[], None).expect("encode");
    assert!(segment.is_empty());
    assert!(segment.decompress().expect("decompress").is_empty());
}
