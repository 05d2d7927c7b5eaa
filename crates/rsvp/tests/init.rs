use rsvp::domain::config::ApiConfig;
use rsvp::features;
use rsvp::kernel::server::ApiState;
use rsvp_database::Database;
use rsvp_event_bus::EventBus;

#[test]
fn every_slice_is_enabled() {
    for name in ["gifts", "guests", "songs"] {
        assert!(features::is_enabled(name), "{name} should be enabled");
    }
    assert!(!features::is_enabled("licensing"));
}

#[test]
fn migrations_are_unique_per_slice() {
    let keys: Vec<String> =
        rsvp::migrations().iter().map(|m| format!("{}:{}", m.slice(), m.version())).collect();
    assert_eq!(keys, ["gifts:0001", "guests:0001", "songs:0001"]);
}

#[tokio::test]
async fn slices_register_into_state() {
    let config = ApiConfig::default();
    let db = Database::builder()
        .url("mem://")
        .session("test", "facade")
        .migrations(rsvp::migrations())
        .init()
        .await
        .unwrap();
    let events = EventBus::new();

    let slices = rsvp::init(&config, &db, &events).unwrap();
    let state = ApiState::builder()
        .config(config)
        .db(db)
        .events(events)
        .register_slices(slices)
        .build()
        .unwrap();

    assert_eq!(state.slice_count(), 3);
    assert!(state.get_slice::<features::gifts::Gifts>().is_some());
    assert!(state.get_slice::<features::songs::Songs>().is_some());
}
