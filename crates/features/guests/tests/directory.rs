use rsvp_database::Database;
use rsvp_event_bus::{EventBus, EventReceiverExt};
use rsvp_guests::{GuestDirectory, GuestError, UserProvisioned, UserRemoved};

async fn directory(events: EventBus) -> (GuestDirectory, Database) {
    let db = Database::builder()
        .url("mem://")
        .session("test", "guests")
        .migrations(rsvp_guests::migrations())
        .init()
        .await
        .expect("in-memory database");
    (GuestDirectory::new(db.clone(), events), db)
}

#[tokio::test]
async fn provisioning_writes_user_and_primary_guest() {
    let events = EventBus::new();
    let mut rx = events.subscribe::<UserProvisioned>().unwrap();
    let (directory, _) = directory(events).await;

    let user = directory.provision("u1", "jane@doe.com").await.unwrap();
    assert_eq!(user.key, "u1");
    assert_eq!(user.email, "jane@doe.com");
    assert_eq!(user.name, "Jane");
    assert!(!user.is_avec_allowed && !user.is_family_allowed && !user.is_admin);
    assert!(user.is_allowed_to_confirm);

    let guests = directory.guests_of("u1").await.unwrap();
    assert_eq!(guests.len(), 1);
    let guest = &guests[0];
    assert_eq!(guest.key, "u1");
    assert_eq!(guest.account, "u1");
    assert_eq!(guest.name, "jane@doe.com");
    assert_eq!(guest.is_coming, None);
    assert_eq!(guest.confirmed_at, None);

    let event = rx.next_event().await.unwrap();
    assert_eq!(event.uid, "u1");
}

#[tokio::test]
async fn provisioning_requires_uid_and_email() {
    let (directory, _) = directory(EventBus::new()).await;

    let err = directory.provision("", "jane@doe.com").await.unwrap_err();
    assert!(matches!(err, GuestError::InvalidArgument { .. }));
    let err = directory.provision("u1", " ").await.unwrap_err();
    assert!(matches!(err, GuestError::InvalidArgument { .. }));
}

#[tokio::test]
async fn reprovisioning_replaces_profiles() {
    let (directory, _) = directory(EventBus::new()).await;
    directory.provision("u1", "jane@doe.com").await.unwrap();
    let user = directory.provision("u1", "janet@doe.com").await.unwrap();

    assert_eq!(user.email, "janet@doe.com");
    assert_eq!(directory.guests_of("u1").await.unwrap().len(), 1);
}

#[tokio::test]
async fn removal_cascades_to_every_owned_guest() {
    let events = EventBus::new();
    let mut rx = events.subscribe::<UserRemoved>().unwrap();
    let (directory, db) = directory(events).await;

    directory.provision("u1", "jane@doe.com").await.unwrap();
    directory.provision("u2", "john@roe.com").await.unwrap();
    db.query("CREATE guest SET key = 'u1-avec', account = 'u1', name = 'Plus One', created_at = 0")
        .await
        .unwrap()
        .check()
        .unwrap();

    let removed = directory.remove("u1").await.unwrap();
    assert_eq!(removed, 2);
    assert!(directory.user("u1").await.unwrap().is_none());
    assert!(directory.guests_of("u1").await.unwrap().is_empty());
    assert_eq!(directory.guests_of("u2").await.unwrap().len(), 1);

    let event = rx.next_event().await.unwrap();
    assert_eq!(event.removed_guests, 2);
}

#[tokio::test]
async fn removing_twice_counts_nothing_the_second_time() {
    let events = EventBus::new();
    let mut rx = events.subscribe::<UserRemoved>().unwrap();
    let (directory, _db) = directory(events).await;

    directory.provision("u1", "jane@doe.com").await.unwrap();
    assert_eq!(directory.remove("u1").await.unwrap(), 1);
    assert_eq!(directory.remove("u1").await.unwrap(), 0);
    assert_eq!(directory.remove("nobody").await.unwrap(), 0);

    assert_eq!(rx.next_event().await.unwrap().removed_guests, 1);
    assert_eq!(rx.next_event().await.unwrap().removed_guests, 0);
}

#[tokio::test]
async fn rename_only_touches_email_shaped_names() {
    let (directory, db) = directory(EventBus::new()).await;
    directory.provision("u1", "jane@doe.com").await.unwrap();
    db.query("CREATE guest SET key = 'u1-avec', account = 'u1', name = 'Plus One', created_at = 0")
        .await
        .unwrap()
        .check()
        .unwrap();

    assert_eq!(directory.rename_guests().await.unwrap(), 1);

    let names: Vec<String> =
        directory.guests_of("u1").await.unwrap().into_iter().map(|g| g.name).collect();
    assert_eq!(names, vec!["Jane Doe".to_owned(), "Plus One".to_owned()]);

    assert_eq!(directory.rename_guests().await.unwrap(), 0);
}
