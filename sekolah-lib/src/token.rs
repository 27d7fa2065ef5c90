use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// the subset of bearer token claims the client looks at. the signature is
/// never checked here, the server stays the authority on validity.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    /// seconds since the epoch, some issuers send fractions
    pub exp: Option<f64>,
    pub iat: Option<f64>,
    pub sub: Option<serde_json::Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token is not made of three segments")]
    Malformed,

    #[error("token payload is not valid base64")]
    Encoding(#[from] base64::DecodeError),

    #[error("token payload is not valid json")]
    Json(#[from] serde_json::Error),

    #[error("token expiry is out of range")]
    InvalidExpiry,
}

pub fn decode_claims(token: &str) -> Result<Claims, TokenError> {
    let mut segments = token.split('.');

    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(TokenError::Malformed);
    };

    // some issuers keep the base64 padding
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;

    Ok(serde_json::from_slice(&bytes)?)
}

/// expiry of the token if it carries one
pub fn expiry(token: &str) -> Result<Option<DateTime<Utc>>, TokenError> {
    let claims = decode_claims(token)?;

    match claims.exp {
        Some(exp) if exp.is_finite() => DateTime::from_timestamp(exp.trunc() as i64, 0)
            .map(Some)
            .ok_or(TokenError::InvalidExpiry),
        Some(_) => Err(TokenError::InvalidExpiry),
        None => Ok(None),
    }
}

/// a token without an `exp` claim is not considered expired, the server
/// confirmation decides for those
pub fn is_expired(token: &str, now: DateTime<Utc>) -> Result<bool, TokenError> {
    Ok(match expiry(token)? {
        Some(exp) => exp <= now,
        None => false,
    })
}

/// builds an unsigned token carrying the given claims. only useful for
/// exercising expiry handling without a real issuer.
#[cfg(any(test, feature = "testing"))]
pub fn unsigned(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());

    format!("{header}.{payload}.unsigned")
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[test]
    fn decodes_expiry() {
        let now = Utc::now();
        let future = unsigned(&json!({"exp": (now + Duration::hours(1)).timestamp(), "sub": 7}));
        let past = unsigned(&json!({"exp": (now - Duration::minutes(1)).timestamp()}));
        let never = unsigned(&json!({"sub": "abc"}));

        assert!(!is_expired(&future, now).unwrap());
        assert!(is_expired(&past, now).unwrap());
        assert!(!is_expired(&never, now).unwrap());
        assert!(expiry(&never).unwrap().is_none());
    }

    #[test]
    fn rejects_malformed() {
        let invalid = [
            "",
            "abc",
            "a.b",
            "a.b.c.d",
            "header.!!!.sig",
        ];

        for given in invalid {
            assert!(decode_claims(given).is_err(), "given {:?}", given);
        }

        let not_json = format!("h.{}.s", URL_SAFE_NO_PAD.encode("not json"));
        assert!(matches!(decode_claims(&not_json), Err(TokenError::Json(_))));
    }

    #[test]
    fn accepts_padded_payload() {
        let payload = base64::engine::general_purpose::URL_SAFE.encode(r#"{"exp":10}"#);
        let token = format!("h.{payload}.s");

        assert_eq!(decode_claims(&token).unwrap().exp, Some(10.0));
    }

    #[test]
    fn fractional_expiry() {
        let now = Utc::now();
        let exp = now.timestamp() as f64 + 3600.75;
        let token = unsigned(&json!({"exp": exp}));

        assert_eq!(expiry(&token).unwrap().map(|e| e.timestamp()), Some(now.timestamp() + 3600));
        assert!(!is_expired(&token, now).unwrap());

        let past = unsigned(&json!({"exp": now.timestamp() as f64 - 0.5}));
        assert!(is_expired(&past, now).unwrap());

        let huge = unsigned(&json!({"exp": 1e300}));
        assert!(matches!(expiry(&huge), Err(TokenError::InvalidExpiry)));
    }
}
