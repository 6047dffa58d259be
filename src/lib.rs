//! mprisctl - MPRIS media player watcher and controller.
//!
//! Mirrors the state of every MPRIS player on the session bus and prints a
//! line for each observable change, including a once-per-second position
//! report while a player is playing. One-shot commands control a single
//! player.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use mprisctl::services::mpris::{PlayerWatcher, StdoutPresenter, ZbusClient};
//!
//! # async fn run() -> Result<(), mprisctl::services::mpris::MediaError> {
//! let bus = Arc::new(ZbusClient::connect().await?);
//! let mut watcher = PlayerWatcher::new(bus, Arc::new(StdoutPresenter), vec![]);
//! watcher.run().await?;
//! # Ok(())
//! # }
//! ```

/// Configuration schema definitions and loading.
pub mod config;

/// Core error types and result aliases.
pub mod core;

/// Command-line interface for one-shot player control.
pub mod cli;

/// Media player services.
pub mod services;

/// Logging setup.
pub mod tracing_config;

/// Re-exported core types for convenience.
pub use core::{MprisctlError, Result};
