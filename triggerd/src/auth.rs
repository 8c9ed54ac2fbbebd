//! Bearer token authentication.

use tracing::debug;
use trigger_common::{AuthToken, TriggerError};

const BEARER_PREFIX: &[u8] = b"Bearer ";

/// Check a raw `Authorization` header value against the configured secret.
///
/// The header is taken as bytes so that non-ASCII credentials are compared
/// exactly instead of being rejected by a string conversion. The presented
/// token is the second space-separated field: `Bearer tok extra` presents
/// `tok`, and `Bearer  tok` presents the empty token.
pub fn authenticate(header: Option<&[u8]>, expected: &AuthToken) -> Result<(), TriggerError> {
    let Some(header) = header.filter(|h| h.starts_with(BEARER_PREFIX)) else {
        debug!("Rejecting request: missing or non-bearer Authorization header");
        return Err(TriggerError::Unauthorized);
    };
    let presented = presented_token(header);

    let matches = std::str::from_utf8(presented).is_ok_and(|token| expected.matches(token));
    if !matches {
        debug!("Rejecting request: bearer token mismatch");
        return Err(TriggerError::InvalidToken);
    }
    Ok(())
}

fn presented_token(header: &[u8]) -> &[u8] {
    header.split(|&b| b == b' ').nth(1).unwrap_or_default()
}
