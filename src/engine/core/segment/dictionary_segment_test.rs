use crate::engine::core::column::NullBitmap;
use crate::engine::core::segment::DictionarySegment;
use crate::engine::core::vector::VectorCompressionType;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[test]
fn dictionary_is_sorted_and_unique() {
    let values = strings(&["pear", "apple", "pear", "fig", "apple"]);
    let segment =
        DictionarySegment::encode(&values, None, VectorCompressionType::FixedSizeByteAligned);

    assert_eq!(segment.dictionary(), strings(&["apple", "fig", "pear"]).as_slice());
    assert_eq!(segment.null_value_id(), 3);
    assert_eq!(segment.len(), 5);

    let mut cursor = segment.cursor();
    let ids: Vec<u32> = (0..5).map(|i| cursor.value_id(i)).collect();
    assert_eq!(ids, vec![2, 0, 2, 1, 0]);
    for (i, expected) in values.iter().enumerate() {
        assert_eq!(cursor.get(i).as_deref(), Some(expected));
    }
}

#[test]
fn null_rows_use_the_id_past_the_dictionary() {
    let values = vec![7i32, 0, 3, 0];
    let nulls = NullBitmap::from_flags([false, true, false, true]);
    let segment =
        DictionarySegment::encode(&values, Some(&nulls), VectorCompressionType::BitPacked128);

    // The zeros behind the null rows never reach the dictionary.
    assert_eq!(segment.dictionary(), &[3, 7]);
    assert_eq!(segment.null_value_id(), 2);

    let mut cursor = segment.cursor();
    assert_eq!(cursor.get(0).as_deref(), Some(&7));
    assert_eq!(cursor.get(1), None);
    assert_eq!(cursor.value_id(1), 2);
    assert_eq!(cursor.get(3), None);
    assert_eq!(segment.value_of_value_id(2), None);
}

#[test]
fn bounds_follow_dictionary_order() {
    let values = vec![10i64, 20, 20, 30];
    let segment =
        DictionarySegment::encode(&values, None, VectorCompressionType::FixedSizeByteAligned);

    assert_eq!(segment.lower_bound(&20), 1);
    assert_eq!(segment.upper_bound(&20), 2);
    assert_eq!(segment.lower_bound(&15), 1);
    assert_eq!(segment.upper_bound(&15), 1);
    assert_eq!(segment.lower_bound(&5), 0);
    assert_eq!(segment.upper_bound(&40), 3);
}

#[test]
fn all_null_segment_has_empty_dictionary() {
    let values = vec![0.0f64; 3];
    let nulls = NullBitmap::from_flags([true, true, true]);
    let segment =
        DictionarySegment::encode(&values, Some(&nulls), VectorCompressionType::BitPacked128);

    assert!(segment.dictionary().is_empty());
    assert_eq!(segment.null_value_id(), 0);
    let mut cursor = segment.cursor();
    assert!((0..3).all(|i| cursor.get(i).is_none()));
}

#[test]
fn keeps_requested_vector_compression() {
    let values: Vec<i32> = (0..500).map(|i| i % 9).collect();
    let packed = DictionarySegment::encode(&values, None, VectorCompressionType::BitPacked128);
    let fixed =
        DictionarySegment::encode(&values, None, VectorCompressionType::FixedSizeByteAligned);
    assert_eq!(packed.compression_type(), VectorCompressionType::BitPacked128);
    assert_eq!(fixed.compression_type(), VectorCompressionType::FixedSizeByteAligned);
    assert_eq!(packed.dictionary(), fixed.dictionary());
}
