use rsvp_event_bus::{EventBus, EventBusError, EventReceiverExt};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
struct GiftClaimed(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
struct AuditLine(&'static str);

#[tokio::test]
async fn publish_reaches_subscriber() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe::<GiftClaimed>().unwrap();

    assert_eq!(bus.publish(GiftClaimed(42)).unwrap(), 1);

    let received = rx.next_event().await.unwrap();
    assert_eq!(*received, GiftClaimed(42));
}

#[tokio::test]
async fn every_subscriber_gets_a_copy() {
    let bus = EventBus::new();
    let mut first = bus.subscribe::<GiftClaimed>().unwrap();
    let mut second = bus.subscribe::<GiftClaimed>().unwrap();

    assert_eq!(bus.publish(GiftClaimed(7)).unwrap(), 2);

    assert_eq!(first.next_event().await.unwrap().0, 7);
    assert_eq!(second.next_event().await.unwrap().0, 7);
}

#[test]
fn publish_without_subscribers_is_not_an_error() {
    let bus = EventBus::new();
    assert_eq!(bus.publish(GiftClaimed(1)).unwrap(), 0);
}

#[tokio::test]
async fn lagging_subscriber_skips_to_retained_events() {
    let bus = EventBus::new();
    let capacity = 2;
    let mut rx = bus.subscribe_with_capacity::<GiftClaimed>(capacity).unwrap();

    for i in 0..50 {
        bus.publish(GiftClaimed(i)).unwrap();
    }

    let first = rx.next_event().await.unwrap();
    assert_eq!(first.0, 48);
    let second = rx.next_event().await.unwrap();
    assert_eq!(second.0, 49);
}

#[tokio::test]
async fn receiver_sees_close_after_shutdown() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe::<GiftClaimed>().unwrap();

    assert_eq!(bus.shutdown(), 1);

    let next = tokio::time::timeout(Duration::from_secs(1), rx.next_event()).await.unwrap();
    assert!(next.is_none());
}

#[tokio::test]
async fn queue_delivers_in_order() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe_queue::<AuditLine>(4).unwrap();

    bus.enqueue(AuditLine("claimed")).unwrap();
    bus.enqueue(AuditLine("released")).unwrap();

    assert_eq!(rx.next_event().await.unwrap().0, "claimed");
    assert_eq!(rx.next_event().await.unwrap().0, "released");
}

#[test]
fn queue_receiver_can_only_be_taken_once() {
    let bus = EventBus::new();
    let _rx = bus.subscribe_queue::<AuditLine>(4).unwrap();

    let err = bus.subscribe_queue::<AuditLine>(4).unwrap_err();
    assert!(matches!(err, EventBusError::ReceiverTaken { .. }));
}

#[test]
fn full_queue_rejects_events() {
    let bus = EventBus::new();
    let _rx = bus.subscribe_queue::<AuditLine>(1).unwrap();

    bus.enqueue(AuditLine("one")).unwrap();
    let err = bus.enqueue(AuditLine("two")).unwrap_err();
    assert!(matches!(err, EventBusError::ChannelFull { .. }));
}

#[test]
fn mixing_channel_kinds_is_rejected() {
    let bus = EventBus::new();
    let _rx = bus.subscribe::<GiftClaimed>().unwrap();

    let err = bus.subscribe_queue::<GiftClaimed>(4).unwrap_err();
    assert!(matches!(err, EventBusError::ChannelKindMismatch { .. }));

    let _queue = bus.subscribe_queue::<AuditLine>(4).unwrap();
    let err = bus.publish(AuditLine("x")).unwrap_err();
    assert!(matches!(err, EventBusError::ChannelKindMismatch { .. }));
}

#[test]
fn zero_capacity_is_rejected() {
    let bus = EventBus::new();
    let err = bus.subscribe_with_capacity::<GiftClaimed>(0).unwrap_err();
    assert!(matches!(err, EventBusError::InvalidCapacity { .. }));
}
