#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Attribute macros used across the RSVP workspace: error enums, feature slice
//! handles, API models/handlers and the runtime entry point.
//!
//! The examples below are `ignore`d because they need the consuming crates
//! (`thiserror`, `serde`, `utoipa`, `rsvp-kernel`, `rsvp-runtime`) in scope.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Turns an `async fn main` into a blocking `fn main` running on an `rsvp_runtime` profile.
///
/// Accepted profiles: `high_performance`, `memory_efficient`, `default` (or no argument).
/// The function must be `async` and must return a `Result`.
///
/// ```rust,ignore
/// #[rsvp_runtime::main(high_performance)]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Declares a JSON data transfer object.
///
/// Adds `Debug`, `serde::Serialize`, `serde::Deserialize` and `utoipa::ToSchema`
/// when they are not derived already, and applies `#[serde(rename_all = "camelCase")]`
/// plus `#[serde(deny_unknown_fields)]` unless told otherwise.
///
/// ```rust,ignore
/// #[rsvp_derive::api_model(deny_unknown_fields = false)]
/// pub struct ClaimRequest {
///     pub gift_id: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Registers an axum handler with `utoipa::path`, forwarding all arguments.
///
/// ```rust,ignore
/// #[rsvp_derive::api_handler(
///     post,
///     path = "/gifts/claim",
///     responses((status = OK, body = GiftReply)),
///     tag = "Gifts"
/// )]
/// pub async fn claim_handler() -> impl IntoResponse { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Turns an enum into the workspace's error type.
///
/// * derives `Debug` and `thiserror::Error`;
/// * generates a `<Name>Ext` trait with `.context(...)` for `Result<T, Name>` and for
///   `Result<T, Source>` of every variant that wraps a `source`;
/// * implements `From<Source>` for those variants;
/// * implements `From<&'static str>` and `From<String>` when an `Internal` variant exists;
/// * emits a private `format_context` helper for `#[error(...)]` strings.
///
/// Variants must use named fields. A variant with a `source` must also have
/// `context: Option<Cow<'static, str>>`.
///
/// ```rust,ignore
/// #[rsvp_derive::rsvp_error]
/// pub enum GiftError {
///     #[error("Store error{}: {source}", format_context(.context))]
///     Database { source: DatabaseError, context: Option<Cow<'static, str>> },
///
///     #[error("Internal error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn rsvp_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Turns a struct into a cloneable feature slice handle.
///
/// `struct Gifts { .. }` becomes `GiftsInner { .. }` plus an `Arc`-backed `Gifts`
/// wrapper that derefs to the inner state and implements
/// `rsvp_kernel::domain::registry::FeatureSlice`.
///
/// ```rust,ignore
/// #[rsvp_derive::rsvp_slice]
/// pub struct Songs {
///     store: SongStore,
/// }
///
/// let slice = Songs::new(SongsInner { store });
/// ```
#[proc_macro_attribute]
pub fn rsvp_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
