//! Session tokens
//!
//! Stateless admin sessions: a JSON claims payload signed with
//! HMAC-SHA256. The token is `base64url(claims) + "." + base64url(mac)`.
//! Verification checks the signature before it trusts any claim.

use chrono::Utc;
use data_encoding::BASE64URL_NOPAD;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Session verification errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("malformed session token")]
    Malformed,
    #[error("invalid session signature")]
    BadSignature,
    #[error("session expired")]
    Expired,
}

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: the user id as issued by the auth provider
    pub sub: String,
    /// Role granted at sign-in
    pub role: String,
    /// Expiry as a unix timestamp in seconds
    pub exp: i64,
}

/// Signs and verifies session tokens with a single shared secret
#[derive(Clone)]
pub struct SessionKeyring {
    secret: Vec<u8>,
}

impl SessionKeyring {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
        }
    }

    fn mac(&self) -> HmacSha256 {
        // HMAC accepts keys of any length
        HmacSha256::new_from_slice(&self.secret).expect("hmac key")
    }

    /// Issue a token for a subject with the given role and lifetime
    pub fn issue(&self, sub: &str, role: &str, ttl_secs: i64) -> String {
        let claims = SessionClaims {
            sub: sub.to_string(),
            role: role.to_string(),
            exp: Utc::now().timestamp() + ttl_secs,
        };
        // serializing a struct of strings and an i64 cannot fail
        let payload = serde_json::to_vec(&claims).expect("serialize claims");
        let mut mac = self.mac();
        mac.update(&payload);
        let sig = mac.finalize().into_bytes();
        format!(
            "{}.{}",
            BASE64URL_NOPAD.encode(&payload),
            BASE64URL_NOPAD.encode(&sig)
        )
    }

    /// Verify a token and return its claims
    pub fn verify(&self, token: &str) -> Result<SessionClaims, SessionError> {
        let (payload_b64, sig_b64) = token.split_once('.').ok_or(SessionError::Malformed)?;
        let payload = BASE64URL_NOPAD
            .decode(payload_b64.as_bytes())
            .map_err(|_| SessionError::Malformed)?;
        let sig = BASE64URL_NOPAD
            .decode(sig_b64.as_bytes())
            .map_err(|_| SessionError::Malformed)?;

        let mut mac = self.mac();
        mac.update(&payload);
        mac.verify_slice(&sig)
            .map_err(|_| SessionError::BadSignature)?;

        let claims: SessionClaims =
            serde_json::from_slice(&payload).map_err(|_| SessionError::Malformed)?;
        if claims.exp < Utc::now().timestamp() {
            return Err(SessionError::Expired);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_and_verify_round_trip() {
        let keyring = SessionKeyring::new("test-secret");
        let token = keyring.issue("3f2b9e7a-1c4d-4e8f-9a6b-2d5c8e1f0a3b", "admin", 3600);
        let claims = keyring.verify(&token).unwrap();
        assert_eq!(claims.sub, "3f2b9e7a-1c4d-4e8f-9a6b-2d5c8e1f0a3b");
        assert_eq!(claims.role, "admin");
    }

    #[test]
    fn rejects_expired_token() {
        let keyring = SessionKeyring::new("test-secret");
        let token = keyring.issue("user", "admin", -10);
        assert!(matches!(keyring.verify(&token), Err(SessionError::Expired)));
    }

    #[test]
    fn rejects_wrong_secret() {
        let keyring = SessionKeyring::new("test-secret");
        let other = SessionKeyring::new("other-secret");
        let token = keyring.issue("user", "admin", 3600);
        assert!(matches!(
            other.verify(&token),
            Err(SessionError::BadSignature)
        ));
    }

    #[test]
    fn rejects_tampered_payload() {
        let keyring = SessionKeyring::new("test-secret");
        let token = keyring.issue("user", "editor", 3600);
        let (_, sig) = token.split_once('.').unwrap();
        let forged_claims = SessionClaims {
            sub: "user".into(),
            role: "admin".into(),
            exp: Utc::now().timestamp() + 3600,
        };
        let forged_payload =
            BASE64URL_NOPAD.encode(&serde_json::to_vec(&forged_claims).unwrap());
        let forged = format!("{forged_payload}.{sig}");
        assert!(matches!(
            keyring.verify(&forged),
            Err(SessionError::BadSignature)
        ));
    }

    #[test]
    fn rejects_garbage() {
        let keyring = SessionKeyring::new("test-secret");
        assert!(matches!(
            keyring.verify("not-a-token"),
            Err(SessionError::Malformed)
        ));
        assert!(matches!(
            keyring.verify("a.b.c"),
            Err(SessionError::Malformed)
        ));
    }
}
