//! Integration tests for error types

use graphstage_foundation::{EntityId, Error, ErrorKind, StoreLimit};

#[test]
fn error_kind_is_matchable() {
    let err = Error::unknown_slot("Blog", "editor");
    assert!(matches!(
        err.kind,
        ErrorKind::UnknownSlot {
            type_name: "Blog",
            slot: "editor"
        }
    ));
    assert_eq!(format!("{err}"), "unknown slot editor on Blog");
}

#[test]
fn error_without_operation_by_default() {
    let err = Error::borrow_conflict(EntityId::from_raw(0x20), "Post");
    assert!(err.operation.is_none());
    let err = err.during("commit");
    assert_eq!(err.operation, Some("commit"));
}

#[test]
fn limit_error_carries_limit() {
    let err = Error::limit_exceeded(StoreLimit::MaxTracked { limit: 10 });
    match err.kind {
        ErrorKind::LimitExceeded(StoreLimit::MaxTracked { limit }) => assert_eq!(limit, 10),
        other => panic!("unexpected error kind: {other:?}"),
    }
}

#[test]
fn error_is_std_error() {
    fn assert_std_error<E: std::error::Error>(_: &E) {}
    let err = Error::slot_kind_mismatch("Blog", "posts", "singular", "plural");
    assert_std_error(&err);
}
