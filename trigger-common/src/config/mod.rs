//! Startup configuration.
//!
//! Values are read once from the process environment when the daemon
//! starts and are immutable afterwards. Reading goes through [`EnvParser`],
//! which accepts an injectable lookup so tests never touch the real
//! environment.

pub mod env;
pub mod token;

pub use env::{ConfigSource, EnvError, EnvParser, Sourced};
pub use token::AuthToken;
