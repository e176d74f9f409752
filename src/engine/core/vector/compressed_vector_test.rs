use crate::engine::core::vector::{CompressedVector, VectorCompressionType};

#[test]
fn compression_names_roundtrip_through_display() {
    for t in [
        VectorCompressionType::FixedSizeByteAligned,
        VectorCompressionType::BitPacked128,
    ] {
        assert_eq!(t.to_string().parse::<VectorCompressionType>(), Ok(t));
    }
    assert_eq!(VectorCompressionType::BitPacked128.to_string(), "SIMD-BP128");
    assert!("Zstd".parse::<VectorCompressionType>().is_err());
}

#[test]
fn both_compressions_decode_the_same_values() {
    let values: Vec<u32> = (0..300).map(|i| i % 17).collect();
    for t in [
        VectorCompressionType::FixedSizeByteAligned,
        VectorCompressionType::BitPacked128,
    ] {
        let vector = CompressedVector::compress(&values, t);
        assert_eq!(vector.compression_type(), t);
        assert_eq!(vector.len(), values.len());
        assert_eq!(vector.iter().collect::<Vec<_>>(), values);
    }
}

#[test]
fn bit_packing_is_smaller_for_narrow_values() {
    let values = vec![1u32; 4096];
    let fixed = CompressedVector::compress(&values, VectorCompressionType::FixedSizeByteAligned);
    let packed = CompressedVector::compress(&values, VectorCompressionType::BitPacked128);
    assert!(packed.data_size() < fixed.data_size());
}
