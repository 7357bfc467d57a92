use std::{
    panic::{catch_unwind, AssertUnwindSafe},
    sync::{Arc, Weak},
};

use scopewire_di::{DynError, Injector, Registration, ResolveError, Target};

struct Session {
    id: u32,
}

fn injector_with_scoped_session() -> Injector {
    let injector = Injector::new();
    injector
        .register(Registration::new(Target::factory(|_| Ok(Arc::new(Session { id: 7 })))).scoped())
        .unwrap();
    injector
}

#[test]
fn nested_scopes_are_independent() {
    let injector = injector_with_scoped_session();

    let outer = injector.open_scope();
    let x1 = outer.get_instance::<Session>().unwrap();

    let x2 = {
        let inner = injector.open_scope();
        assert_eq!(injector.scope_depth(), 2);
        let x2 = inner.get_instance::<Session>().unwrap();
        assert!(Arc::ptr_eq(&x2, &inner.get_instance::<Session>().unwrap()));
        x2
    };
    assert!(!Arc::ptr_eq(&x1, &x2));

    let again = outer.get_instance::<Session>().unwrap();
    assert!(Arc::ptr_eq(&x1, &again));
    assert_eq!(injector.scope_depth(), 1);
}

#[test]
fn closing_a_scope_releases_its_instances() {
    let injector = injector_with_scoped_session();

    let weak: Weak<Session> = {
        let scope = injector.open_scope();
        let session = scope.get_instance::<Session>().unwrap();
        assert_eq!(session.id, 7);
        Arc::downgrade(&session)
    };

    assert!(weak.upgrade().is_none());
    assert_eq!(injector.scope_depth(), 0);
}

#[test]
fn scope_is_closed_when_resolution_fails() {
    struct Unregistered;

    let injector = injector_with_scoped_session();

    let result: Result<(), DynError> = (|| {
        let scope = injector.open_scope();
        scope.get_instance::<Session>()?;
        scope.get_instance::<Unregistered>()?;
        Ok(())
    })();

    assert!(result.is_err());
    assert_eq!(injector.scope_depth(), 0);
}

#[test]
fn scope_is_closed_on_panic() {
    let injector = injector_with_scoped_session();

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let _scope = injector.open_scope();
        assert_eq!(injector.scope_depth(), 1);
        panic!("request handler failed");
    }));

    assert!(outcome.is_err());
    assert_eq!(injector.scope_depth(), 0);
    assert!(matches!(
        injector.get_instance::<Session>(),
        Err(ResolveError::NoActiveScope(_))
    ));
}

#[test]
fn out_of_order_release_removes_only_its_own_frame() {
    let injector = injector_with_scoped_session();

    let outer = injector.open_scope();
    let outer_session = outer.get_instance::<Session>().unwrap();
    let inner = injector.open_scope();
    let inner_session = inner.get_instance::<Session>().unwrap();

    drop(outer);
    assert_eq!(injector.scope_depth(), 1);
    assert!(Arc::ptr_eq(&inner_session, &inner.get_instance::<Session>().unwrap()));
    assert!(!Arc::ptr_eq(&outer_session, &inner_session));

    drop(inner);
    assert_eq!(injector.scope_depth(), 0);
}

#[test]
fn scope_ids_are_unique() {
    let injector = Injector::new();

    let first = injector.open_scope();
    let second = injector.open_scope();
    assert_ne!(first.id(), second.id());
    assert_ne!(first.id().to_string(), second.id().to_string());
}
