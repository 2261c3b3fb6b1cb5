// Doorbells are process-wide, so these tests run one at a time.

use serial_test::serial;
use service_bridge::Core::{Doorbell, DoorbellSlot, DOORBELL_SLOTS};
use service_bridge::Host::{Dispatcher, Turn};
use service_bridge::{BridgeError, CurrentValueStore, QueueStore, Service, ServiceBuilder};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const SHORT: Duration = Duration::from_millis(20);
const LONG: Duration = Duration::from_secs(5);

fn idle_queue() -> Service<QueueStore<u32>> {
    ServiceBuilder::new().with_name("dispatch-queue").build_queue(|_| {})
}

#[test]
#[serial]
fn one_turn_per_notification_in_push_order() {
    let service = idle_queue();
    let producer = service.producer();
    let mut dispatcher = Dispatcher::new(&service).unwrap();

    producer.push(1);
    producer.push(2);
    producer.push(3);
    assert_eq!(dispatcher.backlog(), 3);

    let mut seen = Vec::new();
    for _ in 0..3 {
        let turn = dispatcher.turn(SHORT, |msg| {
            seen.push(unsafe { *msg.cast::<u32>().as_ref() });
        });
        assert_eq!(turn, Turn::Handled);
    }

    assert_eq!(seen, vec![1, 2, 3]);
    assert_eq!(dispatcher.turn(SHORT, |_| panic!("no message expected")), Turn::Idle);
    assert_eq!(service.pending(), 0);
    assert_eq!(dispatcher.handled(), 3);
}

#[test]
#[serial]
fn turn_answers_only_one_message() {
    let service = idle_queue();
    let producer = service.producer();
    let mut dispatcher = Dispatcher::new(&service).unwrap();

    producer.push(1);
    producer.push(2);
    assert_eq!(dispatcher.turn(SHORT, |_| {}), Turn::Handled);
    // second message waits for its own notification to be consumed
    assert_eq!(service.pending(), 1);
    assert_eq!(dispatcher.backlog(), 1);
}

#[test]
#[serial]
fn folded_values_yield_empty_turns() {
    let service: Service<CurrentValueStore<u32>> = ServiceBuilder::new()
        .with_name("dispatch-cell")
        .build_current_value(|_| {});
    let producer = service.producer();
    let mut dispatcher = Dispatcher::new(&service).unwrap();

    producer.set(20);
    producer.set(21);

    let mut value = None;
    assert_eq!(
        dispatcher.turn(SHORT, |msg| value = Some(unsafe { *msg.cast::<u32>().as_ref() })),
        Turn::Handled
    );
    assert_eq!(value, Some(21));
    assert_eq!(dispatcher.turn(SHORT, |_| {}), Turn::Empty);
    assert_eq!(dispatcher.turn(SHORT, |_| {}), Turn::Idle);
}

#[test]
#[serial]
fn wakes_on_worker_notifications() {
    let service: Arc<Service<QueueStore<u32>>> = Arc::new(
        ServiceBuilder::new()
            .with_name("dispatch-worker")
            .build_queue(|producer| {
                let mut n = 0u32;
                while !producer.stopped() {
                    producer.push(n);
                    n += 1;
                    thread::sleep(Duration::from_millis(2));
                }
            }),
    );
    let mut dispatcher = Dispatcher::new(&*service).unwrap();
    service.start();

    let mut got = Vec::new();
    while got.len() < 10 {
        if dispatcher.turn(LONG, |msg| got.push(unsafe { *msg.cast::<u32>().as_ref() })) == Turn::Idle {
            panic!("worker stopped notifying");
        }
    }
    service.stop();

    assert_eq!(got, (0..10).collect::<Vec<_>>());
}

#[test]
#[serial]
fn run_until_flag() {
    let service = idle_queue();
    let producer = service.producer();
    let mut dispatcher = Dispatcher::new(&service).unwrap();
    for i in 0..5 {
        producer.push(i);
    }

    let stop = AtomicBool::new(false);
    let mut count = 0;
    let handled = dispatcher.run(&stop, SHORT, |_| {
        count += 1;
        if count == 5 {
            stop.store(true, Ordering::Release);
        }
    });
    assert_eq!(handled, 5);
}

#[test]
#[serial]
fn dropping_dispatcher_detaches_callback() {
    let service = idle_queue();
    {
        let dispatcher = Dispatcher::new(&service).unwrap();
        assert_eq!(dispatcher.backlog(), 0);
    }
    // no callback left to ring a recycled doorbell
    let slot = DoorbellSlot::claim().unwrap();
    let before = slot.bell().count();
    service.producer().push(1);
    assert_eq!(slot.bell().count(), before);
}

#[test]
#[serial]
fn doorbell_slots_run_out() {
    let claimed: Vec<_> = (0..DOORBELL_SLOTS)
        .map(|_| DoorbellSlot::claim().unwrap())
        .collect();
    assert!(matches!(
        DoorbellSlot::claim(),
        Err(BridgeError::DoorbellsExhausted { slots: DOORBELL_SLOTS })
    ));
    drop(claimed);
    assert!(DoorbellSlot::claim().is_ok());
}

#[test]
fn doorbell_wait_times_out_and_wakes() {
    let bell = Arc::new(Doorbell::new());
    assert_eq!(bell.wait_timeout(0, SHORT), 0);

    let ringer = {
        let bell = bell.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            bell.ring();
        })
    };
    assert_eq!(bell.wait_timeout(0, LONG), 1);
    ringer.join().unwrap();
}
