//! Types for verifier-facing JSON Web Key descriptors.
//!
//! A [`Jwk`] describes an RSA public key the way a JSON Web Key Set
//! consumer expects it; a [`JwkSet`] is the document shape such an endpoint
//! serves. Publishing the endpoint itself is out of scope here.

use serde::{Deserialize, Serialize};

use crate::crypto::{PublicKey, RsaParameters};
use crate::utils::b64;

/// Key class (called `use` in RFC 7517).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Class {
    /// Signature verification keys.
    #[serde(rename = "sig")]
    Signing,
}

/// Key type (`kty` in RFC 7517).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyType {
    #[serde(rename = "RSA")]
    Rsa,
}

/// A verifier-facing descriptor of an RSA public key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwk {
    /// The key identifier a verifier uses to select this key.
    pub kid: String,
    /// The key class (called `use` in the RFC).
    #[serde(rename = "use")]
    pub cls: Class,
    /// The key type.
    pub kty: KeyType,
    /// Base64url of the minimal big-endian modulus bytes.
    pub n: String,
    /// Base64url of the minimal big-endian public exponent bytes.
    pub e: String,
}

/// A set of JSON Web Keys.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwkSet {
    /// The keys in the set.
    pub keys: Vec<Jwk>,
}

impl Jwk {
    /// Builds the descriptor of `public_key` under the given key id.
    ///
    /// Produced fresh on each call; the modulus and exponent are taken as
    /// big integers and encoded as base64url of their minimal big-endian
    /// byte representation, with no padding characters.
    pub fn from_public_key(kid: &str, public_key: &PublicKey) -> Self {
        Jwk {
            kid: kid.to_string(),
            cls: Class::Signing,
            kty: KeyType::Rsa,
            n: b64(public_key.modulus_bytes()),
            e: b64(public_key.exponent_bytes()),
        }
    }
}
