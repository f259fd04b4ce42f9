//! Integration tests for commit-time reconciliation

use std::rc::Rc;

use graphstage_store::{CommitSummary, EntityStore};

use crate::domain::{Author, Blog, Post, author, blog, blog_with_posts, post, site};

// =============================================================================
// Orphan Pruning
// =============================================================================

#[test]
fn commit_removes_orphaned_collection_members() {
    let mut store = EntityStore::new();
    let p1 = post("one");
    let p2 = post("two");
    let b = blog_with_posts(&[&p1, &p2]);
    store.add(&b).unwrap();
    store.commit().unwrap();

    b.borrow_mut()
        .posts
        .as_mut()
        .unwrap()
        .retain(|p| !Rc::ptr_eq(p, &p2));
    store.commit().unwrap();

    let posts = store.query::<Post>();
    assert!(posts.iter().any(|p| Rc::ptr_eq(p, &p1)));
    assert!(!posts.iter().any(|p| Rc::ptr_eq(p, &p2)));
}

#[test]
fn commit_removes_members_when_whole_collection_removed() {
    let mut store = EntityStore::new();
    let p1 = post("one");
    let p2 = post("two");
    let b = blog_with_posts(&[&p1, &p2]);
    store.add(&b).unwrap();
    store.commit().unwrap();

    b.borrow_mut().posts = None;
    store.commit().unwrap();

    assert!(!store.contains(&p1));
    assert!(!store.contains(&p2));
    assert_eq!(store.query::<Post>().len(), 0);
}

#[test]
fn commit_removes_orphaned_members() {
    let mut store = EntityStore::new();
    let b = blog();
    let s = site(Some(b.clone()));
    store.add(&s).unwrap();
    store.commit().unwrap();

    s.borrow_mut().blog = None;
    store.commit().unwrap();

    assert!(!store.contains(&b));
    assert_eq!(store.query::<Blog>().len(), 0);
}

#[test]
fn commit_prunes_transitively() {
    let mut store = EntityStore::new();
    let b = blog_with_posts(&[&post("a"), &post("b")]);
    b.borrow_mut().author = Some(author("ada"));
    let s = site(Some(b));
    store.add(&s).unwrap();
    assert_eq!(store.len(), 5);

    s.borrow_mut().blog = None;
    let summary = store.commit_with_summary().unwrap();

    assert_eq!(summary, CommitSummary { added: 0, purged: 4 });
    assert_eq!(store.count::<Author>(), 0);
    assert_eq!(store.count::<Post>(), 0);
    assert_eq!(store.len(), 1);
}

#[test]
fn commit_keeps_child_moved_to_another_tracked_parent() {
    let mut store = EntityStore::new();
    let p = post("moving");
    let from = blog_with_posts(&[&p]);
    let to = blog();
    store.add(&from).unwrap();
    store.add(&to).unwrap();

    from.borrow_mut().posts = None;
    to.borrow_mut().posts = Some(vec![p.clone()]);
    store.commit().unwrap();

    assert!(store.contains(&p));
    // The refreshed detach descriptor points at the new owner.
    store.remove(&p).unwrap();
    assert!(to.borrow().posts.as_ref().unwrap().is_empty());
}

// =============================================================================
// Discovery On Commit
// =============================================================================

#[test]
fn commit_tracks_entities_added_externally() {
    let mut store = EntityStore::new();
    let b = blog();
    store.add(&b).unwrap();

    let late = post("late");
    b.borrow_mut().posts = Some(vec![late.clone()]);
    let summary = store.commit_with_summary().unwrap();

    assert_eq!(summary.added, 1);
    assert!(store.contains(&late));
}

#[test]
fn commit_on_unchanged_graph_is_stable() {
    let mut store = EntityStore::new();
    let b = blog_with_posts(&[&post("a"), &post("b")]);
    store.add(&b).unwrap();
    let before: Vec<_> = store.iter().map(|n| n.id()).collect();

    let summary = store.commit_with_summary().unwrap();
    let after: Vec<_> = store.iter().map(|n| n.id()).collect();

    assert_eq!(summary, CommitSummary::default());
    assert_eq!(before, after);
}

#[test]
fn commit_on_empty_store() {
    let mut store = EntityStore::new();
    store.commit().unwrap();
    assert!(store.is_empty());
}
