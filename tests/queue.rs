use service_bridge::Core::Callback;
use service_bridge::{Bridge, QueueStore, Service, ServiceBuilder, RELEASE_HOLD};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

fn idle_queue<T: Send + 'static>() -> Service<QueueStore<T>> {
    ServiceBuilder::new()
        .with_name("queue-test")
        .build_queue(|_| {})
}

fn counting(service: &Service<QueueStore<u32>>) -> Arc<AtomicUsize> {
    let notified = Arc::new(AtomicUsize::new(0));
    let n = notified.clone();
    service.register(Some(Callback::from_fn(move || {
        n.fetch_add(1, Ordering::SeqCst);
    })));
    notified
}

/// One retrieve/release cycle through the C-shaped contract.
fn take_one(service: &Service<QueueStore<u32>>) -> Option<u32> {
    let raw = service.next_message();
    if raw.is_null() {
        return None;
    }
    let value = unsafe { *(raw as *const u32) };
    service.free_message(raw);
    Some(value)
}

#[test]
fn three_pushes_three_cycles_then_empty() {
    let service = idle_queue::<u32>();
    let notified = counting(&service);
    let producer = service.producer();

    producer.push(1);
    producer.push(2);
    producer.push(3);
    assert_eq!(notified.load(Ordering::SeqCst), 3);

    assert_eq!(take_one(&service), Some(1));
    assert_eq!(take_one(&service), Some(2));
    assert_eq!(take_one(&service), Some(3));
    assert_eq!(take_one(&service), None);
    assert!(service.next_message().is_null());
}

#[test]
fn interleaved_push_and_consume_keeps_fifo() {
    let service = idle_queue::<u32>();
    let producer = service.producer();
    let mut model = VecDeque::new();
    let mut next_value = 0u32;
    let mut received = Vec::new();

    for _ in 0..2_000 {
        if fastrand::u8(..3) > 0 {
            producer.push(next_value);
            model.push_back(next_value);
            next_value += 1;
        } else {
            assert_eq!(take_one(&service), model.pop_front());
        }
    }
    while let Some(v) = take_one(&service) {
        assert_eq!(Some(v), model.pop_front());
        received.push(v);
    }

    assert!(model.is_empty());
    assert!(received.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn one_notification_per_push_under_concurrency() {
    const PRODUCERS: usize = 4;
    const PER_PRODUCER: usize = 1_000;
    const TOTAL: usize = PRODUCERS * PER_PRODUCER;

    let service = Arc::new(idle_queue::<u32>());
    let notified = counting(&service);

    let mut handles = vec![];
    for p_id in 0..PRODUCERS {
        let producer = service.producer();
        handles.push(thread::spawn(move || {
            for i in 0..PER_PRODUCER {
                producer.push((p_id * PER_PRODUCER + i) as u32);
            }
        }));
    }

    let consumer = {
        let service = service.clone();
        thread::spawn(move || {
            let mut got = 0;
            let mut last_seen = [None::<u32>; PRODUCERS];
            while got < TOTAL {
                match take_one(&service) {
                    Some(v) => {
                        // per-producer order is preserved
                        let p = v as usize / PER_PRODUCER;
                        assert!(last_seen[p].map_or(true, |prev| prev < v));
                        last_seen[p] = Some(v);
                        got += 1;
                    }
                    None => thread::yield_now(),
                }
            }
            got
        })
    };

    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(consumer.join().unwrap(), TOTAL);
    assert_eq!(notified.load(Ordering::SeqCst), TOTAL);
    assert_eq!(service.pending(), 0);
}

#[test]
fn stale_and_foreign_releases_are_ignored() {
    let service = idle_queue::<u32>();
    let other = idle_queue::<u32>();
    let producer = service.producer();
    producer.push(10);
    producer.push(20);
    other.producer().push(10);

    let head = service.next_message();
    service.free_message(head);
    // double release
    service.free_message(head);
    // null and a pointer owned by another store
    service.free_message(std::ptr::null_mut());
    service.free_message(other.next_message());

    assert_eq!(service.pending(), 1);
    assert_eq!(other.pending(), 1);
    assert_eq!(take_one(&service), Some(20));
}

#[test]
fn late_duplicate_release_never_removes_a_newer_message() {
    let service = idle_queue::<u32>();
    let producer = service.producer();

    for round in 0..RELEASE_HOLD as u32 {
        producer.push(round);
        let stale = service.next_message();
        service.free_message(stale);

        producer.push(round + 1_000);
        let fresh = service.next_message();
        assert_ne!(stale, fresh);

        service.free_message(stale);
        assert_eq!(service.pending(), 1);
        assert_eq!(take_one(&service), Some(round + 1_000));
    }
}

#[test]
fn held_head_is_stable_while_producer_appends() {
    let service = idle_queue::<[u64; 4]>();
    let producer = service.producer();
    producer.push([7; 4]);

    let head = service.next().unwrap();
    let writer = {
        let producer = producer.clone();
        thread::spawn(move || {
            for i in 0..50_000u64 {
                producer.push([i; 4]);
            }
        })
    };
    for _ in 0..1_000 {
        assert_eq!(unsafe { *head.as_ref() }, [7; 4]);
    }
    writer.join().unwrap();

    assert_eq!(unsafe { *head.as_ref() }, [7; 4]);
    service.release(head.as_ptr());
    assert_eq!(unsafe { *service.next().unwrap().as_ref() }, [0; 4]);
}
