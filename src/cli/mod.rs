//! Command-line interface for one-shot player control.
//!
//! Commands are organized by category (`player`, `config`) in a registry
//! that validates argument counts and generates help text from metadata.

mod commands;
pub mod formatting;
mod registry;
mod service;
mod types;


pub use commands::player::SessionBus;
pub use registry::CommandRegistry;
pub use service::CliService;
pub use types::{ArgType, BusConnector, CliError, Command, CommandArg, CommandMetadata, CommandResult};
