use crate::engine::core::vector::FixedSizeByteAlignedVector;

#[test]
fn picks_narrowest_width() {
    assert_eq!(FixedSizeByteAlignedVector::compress(&[0, 255]).width_bytes(), 1);
    assert_eq!(FixedSizeByteAlignedVector::compress(&[0, 256]).width_bytes(), 2);
    assert_eq!(FixedSizeByteAlignedVector::compress(&[70_000]).width_bytes(), 4);
    assert_eq!(FixedSizeByteAlignedVector::compress(&[]).width_bytes(), 1);
}

#[test]
fn decompressor_returns_original_values() {
    let values = vec![3, 65_535, 0, 12, 40_000];
    let vector = FixedSizeByteAlignedVector::compress(&values);
    let decompressor = vector.create_decompressor();
    assert_eq!(decompressor.len(), values.len());
    for (i, v) in values.iter().enumerate() {
        assert_eq!(decompressor.get(i), *v);
    }
    assert_eq!(vector.data_size(), values.len() * 2);
}
