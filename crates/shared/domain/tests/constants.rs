use rsvp_domain::constants::{GIFT, GUEST, OK, SERVICE_KEY_HEADER, SONG, USER};

#[test]
fn constants_match_table_names() {
    assert_eq!(GIFT, "gift");
    assert_eq!(USER, "user");
    assert_eq!(GUEST, "guest");
    assert_eq!(SONG, "song");
}

#[test]
fn wire_strings_are_stable() {
    assert_eq!(OK, "Ok");
    assert_eq!(SERVICE_KEY_HEADER, "x-rsvp-service-key");
}
