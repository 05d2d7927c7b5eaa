/// What happened to a gift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationAction {
    Claimed,
    Released,
}

/// Published after every successful claim or release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationChanged {
    pub gift_id: String,
    pub caller: String,
    pub action: ReservationAction,
}
