use super::*;

#[test]
fn root_scope_has_no_session() {
    assert!(Scope::root().session().is_none());
    assert_eq!(try_use_session(&Scope::root()).unwrap_err(), ScopeError::OutsideProvider);
}

#[test]
#[should_panic(expected = "use_session must be used within a SessionProvider scope")]
fn use_session_outside_provider_panics() {
    let _ = use_session(&Scope::root().child());
}

#[test]
fn descendants_inherit_provided_store() {
    let root = Scope::root();
    let provided = root.child();
    let store = SessionStore::new();
    provided.provide(store.clone());

    let grandchild = provided.child().child();
    let found = use_session(&grandchild);
    store.set_missing_init_data();
    assert_eq!(found.snapshot(), store.snapshot());
}

#[test]
fn siblings_do_not_see_each_others_store() {
    let root = Scope::root();
    let provided = root.child();
    provided.provide(SessionStore::new());

    let sibling = root.child();
    assert!(try_use_session(&sibling).is_err());
    assert!(try_use_session(&root).is_err());
}

#[test]
fn nearest_provider_wins() {
    let outer = Scope::root().child();
    let outer_store = SessionStore::new();
    outer.provide(outer_store.clone());

    let inner = outer.child();
    let inner_store = SessionStore::new();
    inner_store.set_missing_init_data();
    inner.provide(inner_store);

    assert!(use_session(&inner.child()).snapshot().error.is_some());
    assert!(use_session(&outer.child()).snapshot().error.is_none());
}

#[test]
fn withdraw_removes_store() {
    let scope = Scope::root().child();
    scope.provide(SessionStore::new());
    let child = scope.child();
    assert!(try_use_session(&child).is_ok());

    scope.withdraw();
    assert!(try_use_session(&child).is_err());
}
