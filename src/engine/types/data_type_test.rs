use crate::engine::types::DataType;

#[test]
fn parses_and_prints_type_names() {
    for data_type in [
        DataType::Int32,
        DataType::Int64,
        DataType::Float32,
        DataType::Float64,
        DataType::String,
    ] {
        let parsed: DataType = data_type.to_string().parse().expect("parse");
        assert_eq!(parsed, data_type);
    }
    assert_eq!("LONG".parse::<DataType>(), Ok(DataType::Int64));
    assert!("decimal".parse::<DataType>().is_err());
}

#[test]
fn classifies_type_families() {
    assert!(DataType::Int32.is_integral());
    assert!(!DataType::Float64.is_integral());
    assert!(DataType::Float32.is_numeric());
    assert!(!DataType::String.is_numeric());
    assert!(DataType::Int32.is_comparable_with(DataType::Float64));
    assert!(!DataType::String.is_comparable_with(DataType::Int64));
}
