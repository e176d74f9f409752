use crate::engine::core::index::{ChunkIndex, GroupKeyIndex, IndexKind};
use crate::engine::core::segment::EncodingType;
use crate::engine::errors::IndexError;
use crate::engine::scan::PredicateCondition;
use crate::engine::types::{ChunkOffset, Value};
use crate::test_helpers::factory::Factory;

fn index_over(values: Vec<Option<i32>>) -> GroupKeyIndex {
    let segment = Factory::segment()
        .with_encoding(EncodingType::Dictionary)
        .create(values);
    GroupKeyIndex::build(3, &segment).expect("build")
}

fn naive(values: &[Option<i32>], condition: PredicateCondition, literal: i32) -> Vec<ChunkOffset> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_some_and(|v| condition.evaluate(Some(v.cmp(&literal)))))
        .map(|(i, _)| i as ChunkOffset)
        .collect()
}

#[test]
fn lookups_match_a_linear_filter() {
    let values = vec![Some(5), Some(1), None, Some(5), Some(9), Some(1), None, Some(7)];
    let index = index_over(values.clone());
    assert_eq!(index.kind(), IndexKind::GroupKey);
    assert_eq!(index.columns(), &[3]);
    assert_eq!(index.supported_encoding(), EncodingType::Dictionary);
    assert_eq!(
        index.dictionary(),
        &[Value::Int32(1), Value::Int32(5), Value::Int32(7), Value::Int32(9)]
    );

    for condition in PredicateCondition::ALL {
        for literal in [0, 1, 5, 6, 9, 10] {
            let got = index
                .lookup(condition, &[Value::Int32(literal)])
                .expect("lookup");
            assert_eq!(got, naive(&values, condition, literal), "{condition} {literal}");
        }
    }
}

#[test]
fn null_literal_matches_nothing() {
    let index = index_over(vec![Some(1), None]);
    for condition in PredicateCondition::ALL {
        assert!(index.lookup(condition, &[Value::Null]).expect("lookup").is_empty());
    }
}

#[test]
fn wider_numeric_literals_are_compared_by_value() {
    let index = index_over(vec![Some(1), Some(2), Some(3)]);
    let got = index
        .lookup(PredicateCondition::GreaterThan, &[Value::Float64(1.5)])
        .expect("lookup");
    assert_eq!(got, vec![1, 2]);
    let got = index
        .lookup(PredicateCondition::Equals, &[Value::Int64(3)])
        .expect("lookup");
    assert_eq!(got, vec![2]);
}

#[test]
fn rejects_bad_lookups() {
    let index = index_over(vec![Some(1)]);
    assert!(matches!(
        index.lookup(PredicateCondition::Equals, &[]).unwrap_err(),
        IndexError::InvalidValueCount { expected: 1, actual: 0 }
    ));
    assert!(matches!(
        index
            .lookup(PredicateCondition::Equals, &[Value::from("1")])
            .unwrap_err(),
        IndexError::IncompatibleValue { .. }
    ));
}

#[test]
fn build_requires_dictionary_encoding() {
    for encoding in [EncodingType::Unencoded, EncodingType::RunLength, EncodingType::Lz4] {
        let segment = Factory::segment()
            .with_encoding(encoding)
            .create_all(&[1i32, 2]);
        assert!(matches!(
            GroupKeyIndex::build(0, &segment).unwrap_err(),
            IndexError::EncodingMismatch { .. }
        ));
    }
}

#[test]
fn string_dictionary_lookup() {
    let segment = Factory::segment()
        .with_encoding(EncodingType::Dictionary)
        .create(vec![
            Some("b".to_string()),
            Some("a".to_string()),
            Some("b".to_string()),
        ]);
    let index = GroupKeyIndex::build(0, &segment).expect("build");
    assert_eq!(
        index
            .lookup(PredicateCondition::Equals, &[Value::from("b")])
            .expect("lookup"),
        vec![0, 2]
    );
    assert!(index.memory_consumption() > 0);
}
