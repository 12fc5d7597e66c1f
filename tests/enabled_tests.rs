mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;

use common::initialized_link;
use rigid_link::LinkDescription;

#[test]
fn repeated_enable_notifies_once() {
    let link = initialized_link(&LinkDescription::new("arm"));
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fired);
    link.connect_enabled(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    link.set_enabled(true);
    link.set_enabled(true);
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(link.enabled());

    link.set_enabled(false);
    link.set_enabled(false);
    assert_eq!(fired.load(Ordering::SeqCst), 2);
    assert!(!link.enabled());
}

#[test]
fn subscribers_run_in_connection_order_with_new_value() {
    let link = initialized_link(&LinkDescription::new("arm"));
    let log = Arc::new(Mutex::new(Vec::new()));
    for tag in ["first", "second"] {
        let log = Arc::clone(&log);
        link.connect_enabled(move |enabled| log.lock().unwrap().push((tag, enabled)));
    }

    link.set_enabled(true);
    assert_eq!(
        *log.lock().unwrap(),
        vec![("first", true), ("second", true)]
    );
}

#[test]
fn disconnected_subscriber_is_silent() {
    let link = initialized_link(&LinkDescription::new("arm"));
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fired);
    let id = link.connect_enabled(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    assert!(link.disconnect_enabled(id));
    assert!(!link.disconnect_enabled(id));
    link.set_enabled(true);
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

#[test]
fn callbacks_may_read_the_link() {
    let link = Arc::new(initialized_link(&LinkDescription::new("arm")));
    let seen = Arc::new(Mutex::new(None));

    let weak = Arc::downgrade(&link);
    let sink = Arc::clone(&seen);
    link.connect_enabled(move |_| {
        if let Some(link) = weak.upgrade() {
            *sink.lock().unwrap() = Some((link.enabled(), link.name()));
        }
    });

    link.set_enabled(true);
    assert_eq!(*seen.lock().unwrap(), Some((true, "arm".to_string())));
}

#[test]
fn racing_toggles_leave_notifications_in_step_with_backend() {
    let link = Arc::new(initialized_link(&LinkDescription::new("arm")));
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fired);
    link.connect_enabled(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = [true, false]
        .into_iter()
        .map(|value| {
            let link = Arc::clone(&link);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                for _ in 0..500 {
                    barrier.wait();
                    link.set_enabled(value);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Once quiet, a real transition fires exactly once and a repeat is silent.
    let target = !link.enabled();
    let before = fired.load(Ordering::SeqCst);
    link.set_enabled(target);
    assert_eq!(fired.load(Ordering::SeqCst), before + 1);
    link.set_enabled(target);
    assert_eq!(fired.load(Ordering::SeqCst), before + 1);
    assert_eq!(link.enabled(), target);
}
