//! Interaction callback decoding and verification.
//!
//! Slack posts interactive-attachment callbacks as a form body with a single
//! `payload` field holding the JSON document. Decoding strips that field
//! name, query-unescapes the remainder, parses the JSON, and only then checks
//! the verification token.

use tracing::warn;

use crate::models::callback::{CallbackPayload, InteractionCallback};
use crate::{AppError, Result};

/// Form field wrapping the callback JSON.
pub const PAYLOAD_PREFIX: &str = "payload=";

/// Decode a raw request body into an authenticated [`InteractionCallback`].
///
/// # Errors
///
/// - `AppError::Decode` if the prefix is missing, unescaping fails, or the
///   JSON cannot be parsed.
/// - `AppError::Unauthorized` if the callback token differs from
///   `verification_token`.
/// - `AppError::Malformed` if an authenticated callback carries no action.
pub fn decode(body: &[u8], verification_token: &str) -> Result<InteractionCallback> {
    let payload = parse_payload(body)?;

    if payload.token != verification_token {
        warn!("rejected interaction with invalid verification token");
        return Err(AppError::Unauthorized("invalid verification token".into()));
    }

    InteractionCallback::try_from(payload)
}

/// Unwrap and parse the callback document without authenticating it.
///
/// # Errors
///
/// Returns `AppError::Decode` on any prefix, escaping, or JSON failure.
pub fn parse_payload(body: &[u8]) -> Result<CallbackPayload> {
    let body = std::str::from_utf8(body)
        .map_err(|err| AppError::Decode(format!("body is not utf-8: {err}")))?;
    let encoded = body
        .strip_prefix(PAYLOAD_PREFIX)
        .ok_or_else(|| AppError::Decode(format!("body does not start with {PAYLOAD_PREFIX}")))?;

    let json = query_unescape(encoded)?;
    serde_json::from_str(&json)
        .map_err(|err| AppError::Decode(format!("invalid callback json: {err}")))
}

/// Form-style unescape: `+` is a space and `%XX` sequences are decoded.
///
/// A `%` not followed by two hex digits is rejected.
fn query_unescape(encoded: &str) -> Result<String> {
    let bytes = encoded.as_bytes();
    if let Some(pos) = bytes.iter().enumerate().position(|(i, &b)| {
        b == b'%'
            && !bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
    }) {
        return Err(AppError::Decode(format!(
            "invalid escape sequence at byte {pos}"
        )));
    }

    let spaced = encoded.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(std::borrow::Cow::into_owned)
        .map_err(|err| AppError::Decode(format!("invalid escape sequence: {err}")))
}
