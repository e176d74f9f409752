use crate::engine::core::segment::{EncodingType, Segment, TypedSegment};
use crate::engine::errors::{EncodingError, TableError};
use crate::engine::types::{DataType, Value};
use crate::test_helpers::factory::Factory;

#[test]
fn value_segment_accepts_appends_of_its_type() {
    let mut segment = Segment::new_value_segment(DataType::Int64, true);
    segment.append(&Value::Int64(5), "x").expect("append");
    segment.append(&Value::Int32(-2), "x").expect("narrow int");
    segment.append(&Value::Null, "x").expect("null");

    assert_eq!(segment.len(), 3);
    assert_eq!(segment.data_type(), DataType::Int64);
    assert_eq!(segment.kind(), "data");
    assert_eq!(segment.encoding_type(), Some(EncodingType::Unencoded));
    assert_eq!(
        segment.values().expect("values"),
        vec![Value::Int64(5), Value::Int64(-2), Value::Null]
    );
}

#[test]
fn append_rejects_foreign_types() {
    let mut segment = Segment::new_value_segment(DataType::Int32, false);
    let err = segment.append(&Value::from("text"), "x").unwrap_err();
    assert!(matches!(err, TableError::TypeMismatch { expected: DataType::Int32, .. }));
    assert!(segment.is_empty());
}

#[test]
fn encoded_segments_are_immutable() {
    let mut segment = Factory::segment()
        .with_encoding(EncodingType::Dictionary)
        .create_all(&[1i32, 2, 3]);
    let err = segment.append(&Value::Int32(4), "x").unwrap_err();
    assert!(matches!(err, TableError::ChunkImmutable));
}

#[test]
fn typed_view_matches_the_tag() {
    let segment = Factory::segment().create_all(&[String::from("a")]);
    assert!(matches!(
        segment.typed::<String>(),
        Ok(TypedSegment::Value(_))
    ));
    assert!(matches!(
        segment.typed::<f64>(),
        Err(EncodingError::TypeMismatch {
            requested: DataType::Float64,
            actual: DataType::String
        })
    ));
}

#[test]
fn value_at_reads_every_encoding() {
    for encoding in EncodingType::ALL {
        let segment = Factory::segment()
            .with_encoding(encoding)
            .create(vec![Some(9i64), None, Some(-4)]);
        assert_eq!(segment.value_at(0).expect("row 0"), Value::Int64(9), "{encoding}");
        assert_eq!(segment.value_at(1).expect("row 1"), Value::Null, "{encoding}");
        assert_eq!(segment.value_at(2).expect("row 2"), Value::Int64(-4), "{encoding}");
        assert!(segment.value_at(3).is_err(), "{encoding}");
    }
}

#[test]
fn estimates_memory_for_all_encodings() {
    let values: Vec<Option<i32>> = (0..1000).map(|i| Some(i % 4)).collect();
    let plain = Factory::segment().create(values.clone());
    let dictionary = Factory::segment()
        .with_encoding(EncodingType::Dictionary)
        .create(values.clone());
    let run_length = Factory::segment()
        .with_encoding(EncodingType::RunLength)
        .create(vec![Some(1i32); 1000]);

    assert!(plain.estimate_memory_usage() >= 4000);
    assert!(dictionary.estimate_memory_usage() < plain.estimate_memory_usage());
    assert!(run_length.estimate_memory_usage() < plain.estimate_memory_usage());
}
