//! Environment variable parsing with source tracking.

use std::env::{self, VarError};
use std::fmt;
use thiserror::Error;

/// Errors that can occur during environment variable parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvError {
    /// Value is present but not valid UTF-8.
    #[error("Invalid value for {var}: not valid unicode")]
    NotUnicode { var: String },
}

/// Where a configuration value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Default,
    Environment,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value paired with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sourced<T> {
    pub value: T,
    pub source: ConfigSource,
    /// Variable name when `source` is [`ConfigSource::Environment`].
    pub var: Option<String>,
}

impl<T> Sourced<T> {
    pub fn default_value(value: T) -> Self {
        Self {
            value,
            source: ConfigSource::Default,
            var: None,
        }
    }

    pub fn from_env(value: T, var: impl Into<String>) -> Self {
        Self {
            value,
            source: ConfigSource::Environment,
            var: Some(var.into()),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        Sourced {
            value: f(self.value),
            source: self.source,
            var: self.var,
        }
    }

    pub fn is_default(&self) -> bool {
        self.source == ConfigSource::Default
    }
}

type Lookup<'a> = Box<dyn Fn(&str) -> Result<String, VarError> + 'a>;

/// Environment variable parser.
///
/// Collects errors during parsing so all issues can be reported at once.
pub struct EnvParser<'a> {
    lookup: Lookup<'a>,
    errors: Vec<EnvError>,
}

impl EnvParser<'static> {
    /// Parser backed by the real process environment.
    pub fn new() -> Self {
        Self::with_lookup(|name| env::var(name))
    }
}

impl Default for EnvParser<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> EnvParser<'a> {
    /// Parser backed by an arbitrary lookup function.
    pub fn with_lookup(lookup: impl Fn(&str) -> Result<String, VarError> + 'a) -> Self {
        Self {
            lookup: Box::new(lookup),
            errors: Vec::new(),
        }
    }

    /// Take ownership of errors.
    pub fn take_errors(&mut self) -> Vec<EnvError> {
        std::mem::take(&mut self.errors)
    }

    fn raw(&mut self, name: &str) -> Option<String> {
        match (self.lookup)(name) {
            Ok(value) => Some(value),
            Err(VarError::NotPresent) => None,
            Err(VarError::NotUnicode(_)) => {
                self.errors.push(EnvError::NotUnicode {
                    var: name.to_string(),
                });
                None
            }
        }
    }

    /// Get a string value with default. An empty value counts as set.
    pub fn get_string(&mut self, name: &str, default: &str) -> Sourced<String> {
        match self.raw(name) {
            Some(value) => Sourced::from_env(value, name),
            None => Sourced::default_value(default.to_string()),
        }
    }
}
