use crate::engine::core::segment::{ChunkOffsetMapping, EncodingType, Segment};
use crate::engine::core::vector::VectorCompressionType;
use crate::test_helpers::factory::Factory;

fn all_encodings() -> Vec<(EncodingType, VectorCompressionType)> {
    let mut out = Vec::new();
    for encoding in EncodingType::ALL {
        for compression in [
            VectorCompressionType::FixedSizeByteAligned,
            VectorCompressionType::BitPacked128,
        ] {
            out.push((encoding, compression));
        }
    }
    out
}

fn sample() -> Vec<Option<i32>> {
    vec![Some(3), None, Some(-1), Some(3), Some(3), None, Some(12), Some(0)]
}

fn encoded(encoding: EncodingType, compression: VectorCompressionType) -> Segment {
    Factory::segment()
        .with_encoding(encoding)
        .with_vector_compression(compression)
        .create(sample())
}

#[test]
fn sequential_iteration_agrees_for_every_encoding() {
    for (encoding, compression) in all_encodings() {
        let segment = encoded(encoding, compression);
        assert_eq!(segment.encoding_type(), Some(encoding));

        let positions: Vec<_> = segment.iter::<i32>().expect("iter").collect();
        assert_eq!(positions.len(), sample().len());
        for (offset, (position, expected)) in positions.iter().zip(sample()).enumerate() {
            assert_eq!(position.chunk_offset() as usize, offset);
            assert_eq!(position.is_null(), expected.is_none(), "{encoding} @ {offset}");
            assert_eq!(position.as_option().copied(), expected, "{encoding} @ {offset}");
        }
    }
}

#[test]
fn point_iteration_reports_position_list_offsets() {
    let mappings = vec![
        ChunkOffsetMapping {
            offset_in_poslist: 0,
            offset_in_referenced_chunk: 6,
        },
        ChunkOffsetMapping {
            offset_in_poslist: 1,
            offset_in_referenced_chunk: 1,
        },
        ChunkOffsetMapping {
            offset_in_poslist: 2,
            offset_in_referenced_chunk: 6,
        },
        ChunkOffsetMapping {
            offset_in_poslist: 3,
            offset_in_referenced_chunk: 2,
        },
    ];
    for (encoding, compression) in all_encodings() {
        let segment = encoded(encoding, compression);
        let got: Vec<_> = segment
            .point_iter::<i32>(mappings.clone())
            .expect("point iter")
            .map(|p| (p.chunk_offset(), p.into_option()))
            .collect();
        assert_eq!(
            got,
            vec![(0, Some(12)), (1, None), (2, Some(12)), (3, Some(-1))],
            "{encoding}"
        );
    }
}

#[test]
fn point_iteration_rejects_out_of_range_offsets() {
    let segment = encoded(EncodingType::Dictionary, VectorCompressionType::BitPacked128);
    let mappings = vec![ChunkOffsetMapping {
        offset_in_poslist: 0,
        offset_in_referenced_chunk: 8,
    }];
    assert!(segment.point_iter::<i32>(mappings).is_err());
}

#[test]
fn iterators_report_exact_size() {
    let segment = encoded(EncodingType::RunLength, VectorCompressionType::BitPacked128);
    let mut iter = segment.iter::<i32>().expect("iter");
    assert_eq!(iter.size_hint(), (8, Some(8)));
    iter.next();
    assert_eq!(iter.size_hint(), (7, Some(7)));
}

#[test]
fn typed_access_checks_the_requested_type() {
    let segment = encoded(EncodingType::Unencoded, VectorCompressionType::BitPacked128);
    assert!(segment.iter::<i64>().is_err());
    assert!(segment.iter::<String>().is_err());
}
