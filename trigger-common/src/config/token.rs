//! Bearer secret loaded at startup.

use std::fmt;
use std::sync::Arc;

use tracing::warn;

use super::env::{EnvParser, Sourced};

/// Shared secret that incoming bearer tokens are compared against.
///
/// Cheap to clone and never mutated after construction. `Debug` output is
/// redacted so the secret cannot leak through log lines.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(Arc<str>);

impl AuthToken {
    /// Environment variable holding the secret.
    pub const ENV_VAR: &'static str = "AUTH_TOKEN";
    /// Placeholder used when the variable is unset. Deployments must override it.
    pub const DEFAULT: &'static str = "default-token";

    pub fn new(token: impl Into<Arc<str>>) -> Self {
        Self(token.into())
    }

    /// Read the secret through `parser`, falling back to [`Self::DEFAULT`].
    pub fn load(parser: &mut EnvParser<'_>) -> Sourced<AuthToken> {
        let sourced = parser
            .get_string(Self::ENV_VAR, Self::DEFAULT)
            .map(AuthToken::new);

        if sourced.is_default() {
            warn!(
                "{} is not set; using the built-in placeholder token",
                Self::ENV_VAR
            );
        } else if sourced.value.0.is_empty() {
            warn!("{} is set but empty", Self::ENV_VAR);
        }
        sourced
    }

    /// Read the secret from the process environment.
    pub fn from_env() -> Sourced<AuthToken> {
        let mut parser = EnvParser::new();
        let token = Self::load(&mut parser);
        for err in parser.take_errors() {
            warn!("{}", err);
        }
        token
    }

    /// Byte-exact comparison against a presented token.
    pub fn matches(&self, presented: &str) -> bool {
        self.0.as_bytes() == presented.as_bytes()
    }

    pub fn is_placeholder(&self) -> bool {
        self.matches(Self::DEFAULT)
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}
