//! Stateless session codec.
//!
//! A session is sealed into a single cookie value with ChaCha20-Poly1305
//! under a key derived from the process-wide secret. The sealed payload
//! carries an explicit expiry; decoding anything that fails to decrypt,
//! verify, parse, or that has expired yields an anonymous session.

use anyhow::{anyhow, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    ChaCha20Poly1305, Key, Nonce,
};
use rand::{rngs::OsRng, RngCore};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::SystemTime;
use uuid::Uuid;

// AAD binds ciphertexts to this cookie format; bump on layout changes.
const SESSION_AAD: &[u8] = b"propono-session:v1";

/// The authenticated identity carried by the session cookie.
///
/// `user_id` presence is the sole authorization signal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user_id: Option<Uuid>,
}

impl Session {
    #[must_use]
    pub fn anonymous() -> Self {
        Self { user_id: None }
    }

    #[must_use]
    pub fn authenticated(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }
}

/// Sealed cookie payload; never leaves this module in the clear.
#[derive(Serialize, Deserialize)]
struct SealedClaims {
    uid: Option<Uuid>,
    exp: i64,
}

pub struct SessionCodec {
    key: Key,
    ttl_seconds: i64,
}

impl std::fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCodec")
            .field("key", &"***")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl SessionCodec {
    /// Derive the sealing key from the configured secret. Rotating the
    /// secret invalidates every outstanding session.
    #[must_use]
    pub fn new(secret: &SecretString, ttl_seconds: i64) -> Self {
        let digest = Sha256::digest(secret.expose_secret().as_bytes());
        Self {
            key: *Key::from_slice(digest.as_slice()),
            ttl_seconds,
        }
    }

    /// Seal a session into a cookie value: `base64url(nonce || ciphertext)`.
    ///
    /// # Errors
    /// Returns an error if encryption fails.
    pub fn encode(&self, session: &Session) -> Result<String> {
        self.encode_at(session, now_unix_seconds())
    }

    fn encode_at(&self, session: &Session, now: i64) -> Result<String> {
        let claims = SealedClaims {
            uid: session.user_id,
            exp: now.saturating_add(self.ttl_seconds),
        };
        let plaintext = serde_json::to_vec(&claims)?;

        let cipher = ChaCha20Poly1305::new(&self.key);

        let mut nonce_bytes = [0u8; 12];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let payload = Payload {
            msg: &plaintext,
            aad: SESSION_AAD,
        };

        let ciphertext = cipher
            .encrypt(nonce, payload)
            .map_err(|e| anyhow!("Session seal failure: {e}"))?;

        let mut sealed = Vec::with_capacity(nonce_bytes.len() + ciphertext.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);

        Ok(URL_SAFE_NO_PAD.encode(sealed))
    }

    /// Open a cookie value. Missing, malformed, tampered, foreign-key and
    /// expired values all decode to the anonymous session; this never fails.
    #[must_use]
    pub fn decode(&self, cookie_value: Option<&str>) -> Session {
        self.decode_at(cookie_value, now_unix_seconds())
    }

    fn decode_at(&self, cookie_value: Option<&str>, now: i64) -> Session {
        let Some(value) = cookie_value else {
            return Session::anonymous();
        };

        let Ok(sealed) = URL_SAFE_NO_PAD.decode(value) else {
            return Session::anonymous();
        };

        if sealed.len() < 12 {
            return Session::anonymous();
        }

        let (nonce_bytes, ciphertext) = sealed.split_at(12);
        let nonce = Nonce::from_slice(nonce_bytes);
        let cipher = ChaCha20Poly1305::new(&self.key);

        let payload = Payload {
            msg: ciphertext,
            aad: SESSION_AAD,
        };

        let Ok(plaintext) = cipher.decrypt(nonce, payload) else {
            return Session::anonymous();
        };

        let Ok(claims) = serde_json::from_slice::<SealedClaims>(&plaintext) else {
            return Session::anonymous();
        };

        if claims.exp <= now {
            return Session::anonymous();
        }

        Session { user_id: claims.uid }
    }
}

/// Unix seconds for session expiry checks.
pub(crate) fn now_unix_seconds() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
