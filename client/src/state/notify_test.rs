use std::cell::RefCell;
use std::rc::Rc;

use super::*;

#[test]
fn notify_calls_subscribers_in_order() {
    let subs = Subscribers::<u32>::default();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let first = Rc::clone(&seen);
    subs.subscribe(move |v| first.borrow_mut().push(("first", *v)));
    let second = Rc::clone(&seen);
    subs.subscribe(move |v| second.borrow_mut().push(("second", *v)));

    subs.notify(&7);
    assert_eq!(*seen.borrow(), vec![("first", 7), ("second", 7)]);
}

#[test]
fn unsubscribe_removes_only_that_callback() {
    let subs = Subscribers::<u32>::default();
    let hits = Rc::new(RefCell::new(0));

    let counter = Rc::clone(&hits);
    let keep = subs.subscribe(move |_| *counter.borrow_mut() += 1);
    let drop_me = subs.subscribe(|_| {});

    assert!(subs.unsubscribe(drop_me));
    assert!(!subs.unsubscribe(drop_me));
    assert_eq!(subs.len(), 1);

    subs.notify(&1);
    assert_eq!(*hits.borrow(), 1);
    assert!(subs.unsubscribe(keep));
    assert!(subs.is_empty());
}

#[test]
fn subscription_ids_are_not_reused() {
    let subs = Subscribers::<()>::default();
    let a = subs.subscribe(|_| {});
    assert!(subs.unsubscribe(a));
    let b = subs.subscribe(|_| {});
    assert_ne!(a, b);
}

#[test]
fn callback_may_unsubscribe_during_notify() {
    let subs = Rc::new(Subscribers::<u32>::default());
    let hits = Rc::new(RefCell::new(0));
    let own_id = Rc::new(RefCell::new(None));

    let registry = Rc::clone(&subs);
    let counter = Rc::clone(&hits);
    let slot = Rc::clone(&own_id);
    let id = subs.subscribe(move |_| {
        *counter.borrow_mut() += 1;
        if let Some(id) = *slot.borrow() {
            registry.unsubscribe(id);
        }
    });
    *own_id.borrow_mut() = Some(id);

    subs.notify(&1);
    subs.notify(&2);
    assert_eq!(*hits.borrow(), 1);
}
