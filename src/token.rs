//! Issuance of preverified email tokens.
//!
//! A token is a compact three-segment string
//! `base64url(header) . base64url(payload) . base64url(signature)`
//! asserting that an email address was verified by the issuer. Verification
//! of such tokens is a consumer concern and deliberately not implemented.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::crypto::CoreSign;
use crate::errors::Error;
use crate::keypair::KeyPair;
use crate::utils::b64;

/// How long an issued token stays valid, in milliseconds.
pub const TOKEN_VALIDITY_MS: i64 = 1000 * 60 * 60 * 6;

/// Token type identifying a preverified email assertion.
pub const PREVERIFIED_EMAIL_TOKEN_TYPE: &str = "mozilla/fxa/preVerifyToken/v1";

#[derive(Serialize)]
struct Header<'a> {
    alg: &'static str,
    jku: &'a str,
    kid: &'a str,
}

#[derive(Serialize)]
struct Claims<'a> {
    exp: i64,
    aud: &'a str,
    sub: &'a str,
    typ: &'static str,
}

/// Construction inputs for [`TokenIssuer`].
///
/// Every field is required; construction fails fast on any missing one.
#[derive(Default)]
pub struct TokenIssuerConfig {
    /// The keypair whose secret half signs issued tokens.
    pub key_pair: Option<Arc<KeyPair>>,
    /// Identifier a verifier uses to look up the matching public key.
    pub key_id: Option<String>,
    /// Intended consumer of issued tokens.
    pub audience: Option<String>,
    /// Where the public key set is published.
    pub jku: Option<String>,
}

/// Issuer of short-lived, signed preverified email tokens.
pub struct TokenIssuer {
    key_pair: Arc<KeyPair>,
    key_id: String,
    audience: String,
    jku: String,
}

impl TokenIssuer {
    /// Validates the configuration and builds the issuer.
    pub fn new(config: TokenIssuerConfig) -> Result<Self, Error> {
        let key_pair = config
            .key_pair
            .ok_or(Error::Configuration("key_pair must be specified"))?;
        let key_id = config
            .key_id
            .ok_or(Error::Configuration("key_id must be specified"))?;
        let audience = config
            .audience
            .ok_or(Error::Configuration("audience must be specified"))?;
        let jku = config
            .jku
            .ok_or(Error::Configuration("jku must be specified"))?;

        Ok(TokenIssuer {
            key_pair,
            key_id,
            audience,
            jku,
        })
    }

    /// Issues a signed token asserting `email` as preverified.
    ///
    /// The email address goes into the payload verbatim; validating its
    /// syntax is the caller's concern. Triggers lazy keypair resolution on
    /// first use.
    pub async fn issue(&self, email: &str) -> Result<String, Error> {
        let secret_key = self.key_pair.get_secret_key().await?;

        let header = b64(serde_json::to_vec(&Header {
            alg: "RS256",
            jku: &self.jku,
            kid: &self.key_id,
        })
        .map_err(|e| Error::Serialization(e.to_string()))?);

        let payload = b64(serde_json::to_vec(&Claims {
            exp: (Utc::now().timestamp_millis() + TOKEN_VALIDITY_MS) / 1000,
            aud: &self.audience,
            sub: email,
            typ: PREVERIFIED_EMAIL_TOKEN_TYPE,
        })
        .map_err(|e| Error::Serialization(e.to_string()))?);

        let signing_input = format!("{header}.{payload}");
        let signature = secret_key.sign(signing_input.as_bytes())?;

        tracing::debug!(kid = %self.key_id, "issued preverified email token");
        Ok(format!("{signing_input}.{}", b64(signature)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64ct::{Base64UrlUnpadded, Encoding};
    use rsa::pkcs8::DecodePublicKey;
    use sha2::{Digest, Sha256};

    fn test_config(key_pair: Arc<KeyPair>) -> TokenIssuerConfig {
        TokenIssuerConfig {
            key_pair: Some(key_pair),
            key_id: Some("dev-1".to_string()),
            audience: Some("https://accounts.firefox.com".to_string()),
            jku: Some("127.0.0.1:9000/.well-known/public-keys".to_string()),
        }
    }

    fn test_issuer() -> TokenIssuer {
        TokenIssuer::new(test_config(Arc::new(KeyPair::new()))).unwrap()
    }

    #[tokio::test]
    async fn test_issue_creates_three_segments() {
        let token = test_issuer().issue("testuser@testuser.com").await.unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[tokio::test]
    async fn test_header_fields() {
        let token = test_issuer().issue("a@b.com").await.unwrap();

        let segment = token.split('.').next().unwrap();
        let decoded = Base64UrlUnpadded::decode_vec(segment).unwrap();
        let header: serde_json::Value = serde_json::from_slice(&decoded).unwrap();

        assert_eq!(header["alg"], "RS256");
        assert_eq!(header["jku"], "127.0.0.1:9000/.well-known/public-keys");
        assert_eq!(header["kid"], "dev-1");
    }

    // The payload carries the email verbatim, the configured audience, the
    // fixed token type, and an expiry six hours out.
    #[tokio::test]
    async fn test_payload_claims() {
        let issuer = test_issuer();

        let before = Utc::now().timestamp_millis() / 1000;
        let token = issuer.issue("a@b.com").await.unwrap();
        let after = Utc::now().timestamp_millis() / 1000;

        let segment = token.split('.').nth(1).unwrap();
        let decoded = Base64UrlUnpadded::decode_vec(segment).unwrap();
        let claims: serde_json::Value = serde_json::from_slice(&decoded).unwrap();

        assert_eq!(claims["sub"], "a@b.com");
        assert_eq!(claims["aud"], "https://accounts.firefox.com");
        assert_eq!(claims["typ"], PREVERIFIED_EMAIL_TOKEN_TYPE);

        let validity_secs = TOKEN_VALIDITY_MS / 1000;
        let exp = claims["exp"].as_i64().unwrap();
        assert!(exp >= before + validity_secs);
        assert!(exp <= after + validity_secs);
    }

    // The third segment is an RS256 signature over the first two.
    #[tokio::test]
    async fn test_signature_verifies() {
        let key_pair = Arc::new(KeyPair::new());
        let issuer = TokenIssuer::new(test_config(Arc::clone(&key_pair))).unwrap();

        let token = issuer.issue("a@b.com").await.unwrap();
        let (signing_input, signature) = token.rsplit_once('.').unwrap();
        let signature = Base64UrlUnpadded::decode_vec(signature).unwrap();

        let pem = key_pair.serialize_public_key().await.unwrap();
        let public_key = rsa::RsaPublicKey::from_public_key_pem(&pem).unwrap();
        let digest = Sha256::digest(signing_input.as_bytes());
        public_key
            .verify(rsa::Pkcs1v15Sign::new::<Sha256>(), &digest, &signature)
            .unwrap();
    }

    // Each individually omitted field is a construction-time error.
    #[test]
    fn test_missing_config_fields() {
        let fields = ["key_pair", "key_id", "audience", "jku"];
        for missing in fields {
            let mut config = test_config(Arc::new(KeyPair::new()));
            match missing {
                "key_pair" => config.key_pair = None,
                "key_id" => config.key_id = None,
                "audience" => config.audience = None,
                _ => config.jku = None,
            }

            let result = TokenIssuer::new(config);
            assert!(
                matches!(result, Err(Error::Configuration(f)) if f.starts_with(missing)),
                "expected configuration error for {missing}"
            );
        }
    }
}
