#![allow(missing_docs)]
#![cfg(feature = "loom")]

use fjk::executor::JoinCounter;
use loom::{cell::UnsafeCell, sync::Arc, thread};

/// One slot per child. Each child writes only its own slot, and the parent
/// reads them only after observing the counter drained.
struct Slots([UnsafeCell<u32>; 2]);

// SAFETY: slot `i` is written by child `i` alone before it leaves the counter;
// the parent reads after the Acquire load that sees every Release decrement.
unsafe impl Sync for Slots {}

fn wait(counter: &JoinCounter<&'static str>) {
    while !counter.is_drained() {
        thread::yield_now();
    }
}

#[test]
fn loom_children_writes_are_visible_after_drain() {
    loom::model(|| {
        let counter = Arc::new(JoinCounter::<&'static str>::new());
        let slots = Arc::new(Slots([UnsafeCell::new(0), UnsafeCell::new(0)]));

        let children: Vec<_> = (0..2_usize)
            .map(|i| {
                counter.enter();
                let counter = Arc::clone(&counter);
                let slots = Arc::clone(&slots);
                thread::spawn(move || {
                    slots.0[i].with_mut(|slot| unsafe { *slot = 10 + i as u32 });
                    counter.leave(Ok(()));
                })
            })
            .collect();

        wait(&counter);
        let seen: Vec<u32> = slots.0.iter().map(|slot| slot.with(|v| unsafe { *v })).collect();
        assert_eq!(seen, [10, 11]);
        assert_eq!(counter.take_failure(), None);

        for child in children {
            child.join().unwrap();
        }
    });
}

#[test]
fn loom_failure_is_reported_once_after_drain() {
    loom::model(|| {
        let counter = Arc::new(JoinCounter::<&'static str>::new());
        let slots = Arc::new(Slots([UnsafeCell::new(0), UnsafeCell::new(0)]));

        let children: Vec<_> = (0..2_usize)
            .map(|i| {
                counter.enter();
                let counter = Arc::clone(&counter);
                let slots = Arc::clone(&slots);
                thread::spawn(move || {
                    slots.0[i].with_mut(|slot| unsafe { *slot = 1 });
                    counter.leave(if i == 0 { Err("left failed") } else { Ok(()) });
                })
            })
            .collect();

        wait(&counter);
        let total: u32 = slots.0.iter().map(|slot| slot.with(|v| unsafe { *v })).sum();
        assert_eq!(total, 2);
        assert_eq!(counter.take_failure(), Some("left failed"));
        assert_eq!(counter.take_failure(), None);

        for child in children {
            child.join().unwrap();
        }
    });
}

#[test]
fn loom_parked_parent_is_woken_by_the_last_leave() {
    loom::model(|| {
        let counter = Arc::new(JoinCounter::<&'static str>::new());
        let slots = Arc::new(Slots([UnsafeCell::new(0), UnsafeCell::new(0)]));

        let children: Vec<_> = (0..2_usize)
            .map(|i| {
                counter.enter();
                let counter = Arc::clone(&counter);
                let slots = Arc::clone(&slots);
                thread::spawn(move || {
                    slots.0[i].with_mut(|slot| unsafe { *slot = 3 });
                    counter.leave(Ok(()));
                })
            })
            .collect();

        while !counter.is_drained() {
            counter.park();
        }
        let total: u32 = slots.0.iter().map(|slot| slot.with(|v| unsafe { *v })).sum();
        assert_eq!(total, 6);

        for child in children {
            child.join().unwrap();
        }
    });
}

#[test]
fn loom_first_failure_wins() {
    loom::model(|| {
        let counter = Arc::new(JoinCounter::<usize>::new());

        let children: Vec<_> = (0..2_usize)
            .map(|i| {
                counter.enter();
                let counter = Arc::clone(&counter);
                thread::spawn(move || counter.leave(Err(i)))
            })
            .collect();

        while !counter.is_drained() {
            thread::yield_now();
        }
        let failure = counter.take_failure();
        assert!(matches!(failure, Some(0 | 1)));
        assert_eq!(counter.pending(), 0);

        for child in children {
            child.join().unwrap();
        }
    });
}
