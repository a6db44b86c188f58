//! # Facade Module
//!
//! Facades sit between the gateway's public surface and the connection
//! machinery. They hide the ordering constraints (connect, then authenticate,
//! then derive) so consumers only ask for ready-to-use handles.

mod facade_error;
pub use facade_error::*;

mod facade_reference;
pub use facade_reference::*;
