//! Shared types and utilities for the CI trigger daemon.
//!
//! This crate holds everything that is independent of the transport:
//! the JSON request/response shapes, the client-facing error taxonomy and
//! the startup configuration loaded from the environment.

pub mod config;
pub mod errors;
pub mod protocol;

pub use config::{AuthToken, ConfigSource, EnvParser, Sourced};
pub use errors::TriggerError;
pub use protocol::{
    DEFAULT_ACTION, DEFAULT_APP, HealthResponse, TEST_ACTION, TestReport, TriggerRequest,
    TriggerResponse,
};
