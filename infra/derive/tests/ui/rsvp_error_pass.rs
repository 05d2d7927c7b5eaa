use rsvp_derive::rsvp_error;
use std::borrow::Cow;

#[rsvp_error]
pub enum LedgerError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Gift not found{}: {gift_id}", format_context(.context))]
    NotFound { gift_id: String, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<(), std::io::Error> {
    Err(std::io::Error::other("disk unplugged"))
}

fn main() {
    let err = read().context("Reading gift list").unwrap_err();
    assert_eq!(err.to_string(), "IO error (Reading gift list): disk unplugged");

    let err: Result<(), LedgerError> =
        Err(LedgerError::NotFound { gift_id: "g1".to_owned(), context: None });
    let err = err.context("Claiming").unwrap_err();
    assert_eq!(err.to_string(), "Gift not found (Claiming): g1");

    let err = LedgerError::from("boom");
    assert!(matches!(err, LedgerError::Internal { .. }));

    let converted: LedgerError = std::io::Error::other("x").into();
    assert!(matches!(converted, LedgerError::Io { context: None, .. }));
}
