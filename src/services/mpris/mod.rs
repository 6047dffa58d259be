/// Bus client abstraction and notification types
pub mod bus;
/// One-shot player control
pub mod control;
/// Typed decoders for property payloads
pub mod conversion;
/// zbus implementation of the bus client
pub mod dbus;
/// Event dispatcher driving the player registry
pub mod dispatcher;
/// Media player error types
pub mod error;
/// Track metadata types
pub mod metadata;
/// Watcher output events
pub mod presenter;
/// D-Bus proxy trait definitions
pub mod proxy;
/// Player record and field table
pub mod record;
/// Registry of tracked players and their tickers
pub mod registry;
/// Pausable position ticker
pub mod ticker;
/// Player identifiers and status enums
pub mod types;
/// Untyped property payloads
pub mod value;

#[cfg(test)]
mod tests;

pub use bus::*;
pub use control::*;
pub use dbus::ZbusClient;
pub use dispatcher::*;
pub use error::*;
pub use metadata::*;
pub use presenter::*;
pub use proxy::*;
pub use record::*;
pub use types::*;
pub use value::PropertyValue;
