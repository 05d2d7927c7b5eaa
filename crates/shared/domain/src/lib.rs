//! # Domain
//!
//! Plain data shared by every crate: configuration, table names and the
//! slice registry. Keep it lean: `serde` is the only dependency.

pub mod config;
pub mod constants;
pub mod registry;
