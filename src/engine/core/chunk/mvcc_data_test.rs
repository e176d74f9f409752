use crate::engine::core::chunk::{MvccData, RowVersion};
use crate::engine::errors::TransactionError;
use crate::engine::types::{INVALID_TRANSACTION_ID, MAX_COMMIT_ID, RowId};

#[test]
fn constructors_set_the_expected_horizons() {
    let committed = RowVersion::committed(3);
    assert_eq!(committed.last_writer_tid, INVALID_TRANSACTION_ID);
    assert_eq!(committed.begin_cid, 3);
    assert_eq!(committed.end_cid, MAX_COMMIT_ID);

    let pending = RowVersion::uncommitted_insert(9);
    assert_eq!(pending.last_writer_tid, 9);
    assert_eq!(pending.begin_cid, MAX_COMMIT_ID);
    assert_eq!(pending.end_cid, MAX_COMMIT_ID);
}

#[test]
fn row_lock_is_exclusive_and_reentrant() {
    let mvcc = MvccData::with_rows(vec![RowVersion::committed(0); 2]);
    let row = RowId::new(0, 1);

    mvcc.try_lock_row(row, 4).expect("first lock");
    mvcc.try_lock_row(row, 4).expect("same owner");
    let err = mvcc.try_lock_row(row, 5).unwrap_err();
    assert!(matches!(err, TransactionError::WriteConflict { owner: 4, .. }));

    assert_eq!(mvcc.get(1).map(|v| v.last_writer_tid), Some(4));
    assert_eq!(mvcc.get(0).map(|v| v.last_writer_tid), Some(INVALID_TRANSACTION_ID));
}

#[test]
fn missing_rows_are_reported() {
    let mvcc = MvccData::new();
    let row = RowId::new(0, 0);
    assert!(matches!(
        mvcc.try_lock_row(row, 1).unwrap_err(),
        TransactionError::RowOutOfRange(_)
    ));
    assert!(mvcc.update(row, |_| {}).is_err());
}

#[test]
fn update_changes_one_row() {
    let mvcc = MvccData::new();
    mvcc.push(RowVersion::uncommitted_insert(2));
    mvcc.push(RowVersion::committed(1));
    mvcc.update(RowId::new(0, 0), |v| v.begin_cid = 7)
        .expect("update");

    let rows = mvcc.read();
    assert_eq!(rows[0].begin_cid, 7);
    assert_eq!(rows[1], RowVersion::committed(1));
}
