use std::cmp::Ordering;

use crate::engine::types::{DataType, Value};

#[test]
fn null_has_no_type_and_never_compares() {
    assert!(Value::Null.is_null());
    assert_eq!(Value::Null.data_type(), None);
    assert_eq!(Value::Null.compare(&Value::Int32(1)), None);
}

#[test]
fn compares_across_numeric_types() {
    assert_eq!(Value::Int32(2).compare(&Value::Float64(2.0)), Some(Ordering::Equal));
    assert_eq!(Value::Int64(3).compare(&Value::Int32(4)), Some(Ordering::Less));
    assert_eq!(Value::from("a").compare(&Value::Int32(4)), None);
}

#[test]
fn checks_literal_compatibility() {
    assert!(Value::Int32(1).is_comparable_with(DataType::Float32));
    assert!(!Value::from("x").is_comparable_with(DataType::Int32));
    assert!(Value::Null.is_comparable_with(DataType::String));
}

#[test]
fn converts_options_and_serializes_untagged() {
    assert_eq!(Value::from(None::<i32>), Value::Null);
    assert_eq!(Value::from(Some(5i64)), Value::Int64(5));
    let json = serde_json::to_string(&vec![Value::Int32(1), Value::Null, Value::from("x")])
        .expect("serialize");
    assert_eq!(json, r#"[1,null,"x"]"#);
}
