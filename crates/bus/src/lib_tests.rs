use super::*;
use sv_core::{DaemonEvent, EventType};

fn sample_event() -> Event {
    Event::new(EventType::Daemon(DaemonEvent::Started), 1_000)
}

#[tokio::test]
async fn publish_fans_out_to_all_subscribers() {
    let bus = EventBus::new(4);
    let mut a = bus.subscribe();
    let mut b = bus.subscribe();

    bus.publish(sample_event());

    assert_eq!(a.recv().await.unwrap().ty, EventType::Daemon(DaemonEvent::Started));
    assert_eq!(b.recv().await.unwrap().ty, EventType::Daemon(DaemonEvent::Started));
}

#[tokio::test]
async fn event_ids_are_monotonic_across_publishes() {
    let bus = EventBus::new(4);
    let mut sub = bus.subscribe();

    bus.publish(sample_event());
    bus.publish(sample_event());
    bus.publish(sample_event());

    let first = sub.recv().await.unwrap().id;
    let second = sub.recv().await.unwrap().id;
    let third = sub.recv().await.unwrap().id;
    assert!(first < second);
    assert!(second < third);
}

#[tokio::test]
async fn full_buffer_drops_only_for_that_subscriber() {
    let bus = EventBus::new(1);
    let mut slow = bus.subscribe();
    let mut fast = bus.subscribe();

    bus.publish(sample_event());
    // fast drains immediately, freeing its one slot; slow never does.
    assert!(fast.recv().await.is_some());

    bus.publish(sample_event()); // slow's buffer (cap=1) is still full; dropped for slow only
    assert!(fast.recv().await.is_some());

    // slow only ever received the first.
    assert!(slow.recv().await.is_some());
    assert!(slow.try_recv().is_err());
}

#[tokio::test]
async fn unsubscribe_is_idempotent_and_drains_handle() {
    let bus = EventBus::new(4);
    let mut sub = bus.subscribe();
    let id = sub.id();

    bus.unsubscribe(id);
    bus.unsubscribe(id); // second call must not panic

    assert!(sub.recv().await.is_none());
}

#[tokio::test]
async fn close_is_idempotent_and_publish_becomes_noop() {
    let bus = EventBus::new(4);
    let mut sub = bus.subscribe();

    bus.close();
    bus.close();

    assert!(bus.publish(sample_event()).is_none());
    assert!(sub.recv().await.is_none());
}

#[tokio::test]
async fn subscribe_after_close_returns_drained_handle() {
    let bus = EventBus::new(4);
    bus.close();

    let mut sub = bus.subscribe();
    assert!(sub.recv().await.is_none());
}
