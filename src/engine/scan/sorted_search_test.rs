use crate::engine::core::segment::{EncodingType, Segment};
use crate::engine::scan::{PredicateCondition, sorted_range_search};
use crate::engine::types::{ChunkOffset, ColumnType, DataType, OrderByMode, Value};
use crate::test_helpers::factory::Factory;

const MODES: [OrderByMode; 4] = [
    OrderByMode::Ascending,
    OrderByMode::Descending,
    OrderByMode::AscendingNullsLast,
    OrderByMode::DescendingNullsLast,
];

fn sorted<T: ColumnType>(mut values: Vec<Option<T>>, mode: OrderByMode) -> Vec<Option<T>> {
    values.sort_by(|a, b| mode.compare(a.as_ref(), b.as_ref(), T::total_cmp));
    values
}

fn naive<T: ColumnType>(
    values: &[Option<T>],
    condition: PredicateCondition,
    literal: &Value,
) -> Vec<ChunkOffset> {
    let Some(literal) = literal.as_scalar() else {
        return Vec::new();
    };
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| {
            v.as_ref()
                .is_some_and(|v| condition.evaluate(v.scalar().partial_cmp(&literal)))
        })
        .map(|(i, _)| i as ChunkOffset)
        .collect()
}

fn check_all<T: ColumnType>(
    values: Vec<Option<T>>,
    literals: &[Value],
    encodings: &[EncodingType],
) {
    for mode in MODES {
        let values = sorted(values.clone(), mode);
        for &encoding in encodings {
            let segment: Segment = Factory::segment()
                .with_encoding(encoding)
                .create(values.clone());
            for condition in PredicateCondition::ALL {
                for literal in literals {
                    let got = sorted_range_search(&segment, mode, condition, literal)
                        .expect("search");
                    assert_eq!(
                        got,
                        naive(&values, condition, literal),
                        "{mode} {encoding} {condition} {literal}"
                    );
                }
            }
        }
    }
}

#[test]
fn integer_segments_match_a_linear_scan() {
    let values = vec![
        Some(4),
        None,
        Some(1),
        Some(4),
        Some(9),
        None,
        Some(-3),
        Some(4),
        Some(7),
    ];
    let literals = [
        Value::Int32(-5),
        Value::Int32(-3),
        Value::Int32(4),
        Value::Int32(5),
        Value::Int32(9),
        Value::Int32(12),
        Value::Float64(4.5),
        Value::Int64(7),
    ];
    check_all::<i32>(values, &literals, &EncodingType::ALL);
}

#[test]
fn randomized_segments_match_a_linear_scan() {
    let mut generator = Factory::values(7).with_null_ratio(0.2).with_max_int(20);
    for _ in 0..5 {
        let values: Vec<Option<i64>> = (0..60)
            .map(|_| i64::from_value(&generator.next_value(DataType::Int64, true)))
            .collect();
        let literals: Vec<Value> = (-12..12).step_by(3).map(Value::Int64).collect();
        check_all::<i64>(
            values,
            &literals,
            &[EncodingType::Unencoded, EncodingType::FrameOfReference],
        );
    }
}

#[test]
fn string_segments_match_a_linear_scan() {
    let values: Vec<Option<String>> = ["m", "a", "q", "m", "", "z"]
        .iter()
        .map(|s| Some(s.to_string()))
        .chain([None])
        .collect();
    let literals = [Value::from("m"), Value::from("b"), Value::from(""), Value::from("zz")];
    check_all::<String>(
        values,
        &literals,
        &[EncodingType::Dictionary, EncodingType::Lz4, EncodingType::RunLength],
    );
}

#[test]
fn nan_rows_are_never_matched() {
    let values = vec![
        Some(1.0f64),
        Some(f64::NAN),
        None,
        Some(-2.5),
        Some(1.0),
        Some(f64::NAN),
    ];
    let literals = [
        Value::Float64(1.0),
        Value::Float64(0.0),
        Value::Float64(f64::NAN),
        Value::Int32(-3),
    ];
    check_all::<f64>(values, &literals, &[EncodingType::Unencoded, EncodingType::Dictionary]);
}

#[test]
fn null_literal_and_empty_segment_match_nothing() {
    let segment = Factory::segment().create(vec![Some(1i32), None]);
    for condition in PredicateCondition::ALL {
        assert!(
            sorted_range_search(&segment, OrderByMode::Ascending, condition, &Value::Null)
                .expect("search")
                .is_empty()
        );
    }
    let empty = Factory::segment().create::<i32>(vec![]);
    let got = sorted_range_search(
        &empty,
        OrderByMode::Ascending,
        PredicateCondition::NotEquals,
        &Value::Int32(0),
    )
    .expect("search");
    assert!(got.is_empty());
}
