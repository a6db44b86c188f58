#![deny(clippy::semicolon_if_nothing_returned)]
#![deny(clippy::unnecessary_semicolon)]
#![deny(clippy::explicit_iter_loop)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::unwrap_or_default)]

pub mod auth;
pub mod connection;
pub mod context;
pub mod facades;
pub mod params;
pub mod platform;
pub mod settings;
pub mod token;
pub mod trace;
pub mod utils;

pub use context::{Gateway, GatewayBuilder};
