//! Token inspection (expiry claim only).
//!
//! The client never verifies signatures; it only reads the `exp` claim to
//! decide whether a token is worth presenting. Any decode ambiguity is
//! treated as expired (fail-closed).

use base64::Engine;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

/// Inactivity window after which the local session is considered idle.
pub const INACTIVITY_WINDOW: Duration = Duration::minutes(30);

/// Claims the client cares about when inspecting a token.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    /// Expiry, seconds since the Unix epoch.
    #[serde(default)]
    pub exp: Option<i64>,
    /// Issued-at, seconds since the Unix epoch.
    #[serde(default)]
    pub iat: Option<i64>,
    /// Subject identifier.
    #[serde(default)]
    pub sub: Option<String>,
}

/// Decode the payload segment of a compact JWT.
///
/// Returns `None` for anything that is not three dot-separated segments with
/// a base64url JSON payload.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let mut segments = token.split('.');
    let _header = segments.next()?;
    let payload = segments.next()?;
    segments.next()?;

    // Tolerate both base64url (RFC 7515) and standard alphabets; some dev
    // backends emit the latter.
    let bytes = match URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
    {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::debug!("token payload is not base64: {err}");
            return None;
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(claims) => Some(claims),
        Err(err) => {
            tracing::debug!("token payload is not claim JSON: {err}");
            None
        }
    }
}

/// Expiry timestamp of a token, if it decodes and carries one.
pub fn expires_at(token: &str) -> Option<DateTime<Utc>> {
    let exp = decode_claims(token)?.exp?;
    DateTime::from_timestamp(exp, 0)
}

/// Whether a token should no longer be presented.
///
/// A token with no decodable expiry claim is expired.
pub fn is_expired(token: &str) -> bool {
    match expires_at(token) {
        Some(exp) => exp <= Utc::now(),
        None => true,
    }
}

/// Time left in the inactivity window since `last_activity`, clamped at zero.
pub fn time_remaining(last_activity: DateTime<Utc>, window: Duration) -> Duration {
    let elapsed = Utc::now() - last_activity;
    (window - elapsed).max(Duration::zero())
}

/// Whether the session saw activity within the inactivity window.
pub fn is_session_active(last_activity: Option<DateTime<Utc>>) -> bool {
    match last_activity {
        Some(at) => time_remaining(at, INACTIVITY_WINDOW) > Duration::zero(),
        None => false,
    }
}

/// "M:SS" countdown for the session timer widget.
pub fn format_time_remaining(last_activity: DateTime<Utc>) -> String {
    let remaining = time_remaining(last_activity, INACTIVITY_WINDOW);
    if remaining <= Duration::zero() {
        return "Session expired".to_string();
    }

    let minutes = remaining.num_minutes();
    let seconds = remaining.num_seconds() % 60;
    format!("{minutes}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unsigned compact JWT with the given payload.
    fn make_token(payload: serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
        format!("{header}.{body}.sig")
    }

    #[test]
    fn future_expiry_is_not_expired() {
        let exp = (Utc::now() + Duration::hours(1)).timestamp();
        let token = make_token(serde_json::json!({ "exp": exp, "sub": "u1" }));
        assert!(!is_expired(&token));
        assert_eq!(expires_at(&token).unwrap().timestamp(), exp);
    }

    #[test]
    fn past_expiry_is_expired() {
        let exp = (Utc::now() - Duration::hours(1)).timestamp();
        let token = make_token(serde_json::json!({ "exp": exp }));
        assert!(is_expired(&token));
    }

    #[test]
    fn garbage_is_expired() {
        assert!(is_expired("not-a-token"));
        assert!(is_expired(""));
        assert!(is_expired("a.b.c"));
        assert!(expires_at("a.b.c").is_none());
    }

    #[test]
    fn missing_exp_claim_is_expired() {
        let token = make_token(serde_json::json!({ "sub": "u1" }));
        assert!(is_expired(&token));
        assert!(decode_claims(&token).is_some());
    }

    #[test]
    fn time_remaining_never_negative() {
        let stale = Utc::now() - Duration::hours(2);
        assert_eq!(
            time_remaining(stale, INACTIVITY_WINDOW),
            Duration::zero()
        );

        let fresh = Utc::now();
        let remaining = time_remaining(fresh, INACTIVITY_WINDOW);
        assert!(remaining > Duration::minutes(29));
        assert!(remaining <= Duration::minutes(30));
    }

    #[test]
    fn session_activity_window() {
        assert!(!is_session_active(None));
        assert!(is_session_active(Some(Utc::now() - Duration::minutes(5))));
        assert!(!is_session_active(Some(Utc::now() - Duration::minutes(31))));
    }

    #[test]
    fn countdown_formatting() {
        let stale = Utc::now() - Duration::hours(1);
        assert_eq!(format_time_remaining(stale), "Session expired");

        let fresh = Utc::now() - Duration::minutes(5);
        let formatted = format_time_remaining(fresh);
        // 24:xx remaining out of a 30 minute window.
        assert!(formatted.starts_with("24:"), "got {formatted}");
    }
}
