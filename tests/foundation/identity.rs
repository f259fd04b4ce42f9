//! Integration tests for entity identity

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use graphstage_foundation::EntityId;

#[derive(Clone, PartialEq, Eq, Hash)]
struct Post {
    title: String,
}

fn post(title: &str) -> Rc<RefCell<Post>> {
    Rc::new(RefCell::new(Post {
        title: title.to_string(),
    }))
}

#[test]
fn identity_ignores_value_equality() {
    let a = post("same");
    let b = post("same");
    assert!(*a.borrow() == *b.borrow());
    assert_ne!(EntityId::of(&a), EntityId::of(&b));
}

#[test]
fn identity_survives_mutation() {
    let a = post("before");
    let before = EntityId::of(&a);
    a.borrow_mut().title = "after".to_string();
    assert_eq!(EntityId::of(&a), before);
}

#[test]
fn identities_dedupe_in_sets() {
    let a = post("a");
    let b = post("b");
    let ids: HashSet<EntityId> = [&a, &b, &a, &a]
        .into_iter()
        .map(EntityId::of)
        .collect();
    assert_eq!(ids.len(), 2);
}
