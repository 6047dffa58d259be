/// Configuration inspection commands
pub mod config;
/// Media player control commands
pub mod player;
