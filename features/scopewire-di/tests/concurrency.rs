use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use scopewire_di::{Injector, Registration, Target};

struct SlowPool {
    connections: usize,
}

#[test]
fn concurrent_resolution_creates_one_singleton() {
    let created = Arc::new(AtomicUsize::new(0));
    let counter = created.clone();

    let injector = Injector::new();
    injector
        .register(
            Registration::new(Target::factory(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(5));
                Ok(Arc::new(SlowPool { connections: 4 }))
            }))
            .singleton(),
        )
        .unwrap();

    let pools: Vec<Arc<SlowPool>> = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let injector = injector.clone();
                s.spawn(move || injector.get_instance::<SlowPool>().unwrap())
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    assert_eq!(created.load(Ordering::SeqCst), 1);
    assert!(pools.iter().all(|pool| Arc::ptr_eq(pool, &pools[0])));
    assert_eq!(pools[0].connections, 4);
}

#[test]
fn injector_handles_share_state() {
    let injector = Injector::new();
    let handle = injector.clone();

    handle
        .register(Target::factory(|_| Ok(Arc::new(SlowPool { connections: 1 }))))
        .unwrap();

    assert!(injector.is_registered::<SlowPool>());
    let _scope = handle.open_scope();
    assert_eq!(injector.scope_depth(), 1);
}
