use std::sync::Arc;

use crate::engine::core::chunk::{Chunk, PositionList};
use crate::engine::core::segment::{
    ChunkEncoder, EncodingType, ReferenceSegment, Segment, SegmentEncodingSpec,
};
use crate::engine::core::table::ColumnDefinition;
use crate::engine::core::vector::VectorCompressionType;
use crate::engine::errors::{EncodingError, TableError};
use crate::engine::types::{DataType, OrderByMode, RowId, Value};
use crate::test_helpers::factory::Factory;

fn chunk_with_rows(rows: &[(i32, &str)]) -> (Chunk, Vec<ColumnDefinition>) {
    let definitions = vec![
        ColumnDefinition::new("n", DataType::Int32, true),
        ColumnDefinition::new("s", DataType::String, false),
    ];
    let chunk = Chunk::new_mutable(&definitions, false);
    for (n, s) in rows {
        chunk
            .append(&[Value::Int32(*n), Value::from(*s)], &definitions, None)
            .expect("append");
    }
    (chunk, definitions)
}

#[test]
fn every_encoding_preserves_values() {
    let values = vec![Some(4i32), Some(4), None, Some(-9), Some(100), None];
    let plain = Factory::segment().create(values.clone());
    for encoding in EncodingType::ALL {
        for compression in [
            VectorCompressionType::FixedSizeByteAligned,
            VectorCompressionType::BitPacked128,
        ] {
            let spec = SegmentEncodingSpec::new(encoding).with_vector_compression(compression);
            let encoded = ChunkEncoder::encode_segment(&plain, spec).expect("encode");
            assert_eq!(encoded.encoding_type(), Some(encoding));
            assert_eq!(
                encoded.values().expect("values"),
                plain.values().expect("values"),
                "{encoding}/{compression}"
            );
            if encoding.uses_vector_compression() {
                assert_eq!(encoded.vector_compression(), Some(compression));
            } else {
                assert_eq!(encoded.vector_compression(), None);
            }
        }
    }
}

#[test]
fn reencoding_is_idempotent() {
    let plain = Factory::segment().create(vec![Some(1i64), None, Some(7), Some(7)]);
    let spec = SegmentEncodingSpec::new(EncodingType::FrameOfReference);
    let once = ChunkEncoder::encode_segment(&plain, spec).expect("first");
    let twice = ChunkEncoder::encode_segment(&once, spec).expect("second");
    assert_eq!(once.values().expect("once"), twice.values().expect("twice"));

    let back =
        ChunkEncoder::encode_segment(&twice, SegmentEncodingSpec::new(EncodingType::Unencoded))
            .expect("decode");
    assert_eq!(back.values().expect("back"), plain.values().expect("plain"));
}

#[test]
fn frame_of_reference_rejects_strings_and_floats() {
    for segment in [
        Factory::segment().create_all(&[String::from("x")]),
        Factory::segment().create_all(&[1.0f32]),
    ] {
        let err = ChunkEncoder::encode_segment(
            &segment,
            SegmentEncodingSpec::new(EncodingType::FrameOfReference),
        )
        .unwrap_err();
        assert!(matches!(err, EncodingError::UnsupportedEncoding { .. }));
    }
}

#[test]
fn encode_chunk_requires_a_finalized_chunk() {
    let (chunk, _) = chunk_with_rows(&[(1, "a")]);
    let specs = vec![SegmentEncodingSpec::new(EncodingType::Dictionary); 2];
    let err = ChunkEncoder::encode_chunk(&chunk, &specs).unwrap_err();
    assert!(matches!(
        err,
        TableError::Encoding(EncodingError::ChunkNotFinalized)
    ));
}

#[test]
fn encode_chunk_checks_spec_count() {
    let (chunk, _) = chunk_with_rows(&[(1, "a")]);
    chunk.finalize();
    let err = ChunkEncoder::encode_chunk(&chunk, &[SegmentEncodingSpec::default()]).unwrap_err();
    assert!(matches!(err, TableError::ArityMismatch { expected: 2, actual: 1 }));
}

#[test]
fn encode_chunk_swaps_segments_and_keeps_sort_order() {
    let (chunk, _) = chunk_with_rows(&[(1, "b"), (2, "a"), (3, "a")]);
    chunk.finalize();
    chunk
        .set_ordered_by(0, OrderByMode::Ascending)
        .expect("sorted");
    let before = chunk.snapshot();

    ChunkEncoder::encode_chunk(
        &chunk,
        &[
            SegmentEncodingSpec::new(EncodingType::FrameOfReference),
            SegmentEncodingSpec::new(EncodingType::Dictionary),
        ],
    )
    .expect("encode");

    let after = chunk.snapshot();
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(
        before.segment(0).map(Segment::encoding_type),
        Some(Some(EncodingType::Unencoded))
    );
    assert_eq!(
        after.segment(0).map(Segment::encoding_type),
        Some(Some(EncodingType::FrameOfReference))
    );
    assert_eq!(after.ordered_by(), Some((0, OrderByMode::Ascending)));
    assert_eq!(
        after.segment(1).expect("column 1").values().expect("values"),
        vec![Value::from("b"), Value::from("a"), Value::from("a")]
    );
}

#[test]
fn reference_segments_cannot_be_encoded() {
    let table = Factory::table()
        .with_column("n", DataType::Int32, false)
        .with_row(vec![Value::Int32(1)])
        .create();
    let positions: Arc<PositionList> = Arc::new(vec![RowId::new(0, 0)].into());
    let reference =
        Segment::Reference(ReferenceSegment::new(table, 0, positions).expect("reference"));
    let err = ChunkEncoder::encode_segment(&reference, SegmentEncodingSpec::default()).unwrap_err();
    assert!(matches!(err, EncodingError::ReferenceSegment));
}
