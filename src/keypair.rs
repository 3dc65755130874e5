//! Ownership and lazy materialization of the RSA signing keypair.

use std::path::{Path, PathBuf};

use tokio::sync::OnceCell;
use zeroize::Zeroizing;

use crate::crypto::{self, KeyMaterial, PublicKey, SecretKey};
use crate::errors::Error;
use crate::jwk::{Jwk, JwkSet};

/// A resolved keypair. Both halves are always populated.
#[derive(Clone, Debug)]
pub struct KeySet {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl KeySet {
    /// Generates a brand-new ephemeral keypair.
    pub fn generate() -> Result<Self, Error> {
        let (secret_key, public_key) = crypto::generate_keypair()?;
        Ok(KeySet {
            secret_key,
            public_key,
        })
    }
}

/// Construction inputs for [`KeyPair`].
///
/// Every field is optional. A directly supplied key takes precedence over
/// its file counterpart; key files are read synchronously at construction
/// time.
#[derive(Default)]
pub struct KeyPairConfig {
    pub secret_key: Option<SecretKey>,
    pub secret_key_file: Option<PathBuf>,
    pub public_key: Option<PublicKey>,
    pub public_key_file: Option<PathBuf>,
}

/// Owner of an RSA keypair, materialized lazily on first use.
///
/// An instance constructed without a complete pair generates an ephemeral
/// one on first access and keeps it for its whole lifetime. Resolution is
/// single-flight: concurrent first callers share one in-flight generation
/// and all observe the same stored pair.
#[derive(Debug, Default)]
pub struct KeyPair {
    keys: OnceCell<KeySet>,
}

impl KeyPair {
    /// Creates an empty instance; a keypair is generated on first use.
    pub fn new() -> Self {
        KeyPair {
            keys: OnceCell::new(),
        }
    }

    /// Creates an instance from previously obtained key material.
    ///
    /// Malformed key files fail here with [`Error::Deserialization`],
    /// unreadable ones with [`Error::Io`]. A configuration holding only
    /// one half of a pair does not prevent generation: the lone half is
    /// discarded when first resolution regenerates both.
    pub fn from_config(config: KeyPairConfig) -> Result<Self, Error> {
        let secret_key = match (config.secret_key, config.secret_key_file) {
            (Some(key), _) => Some(key),
            (None, Some(path)) => Some(load_secret_key(&path)?),
            (None, None) => None,
        };

        let public_key = match (config.public_key, config.public_key_file) {
            (Some(key), _) => Some(key),
            (None, Some(path)) => Some(load_public_key(&path)?),
            (None, None) => None,
        };

        let keys = match (secret_key, public_key) {
            (Some(secret_key), Some(public_key)) => OnceCell::new_with(Some(KeySet {
                secret_key,
                public_key,
            })),
            _ => OnceCell::new(),
        };

        Ok(KeyPair { keys })
    }

    /// Returns the resolved keypair, generating an ephemeral one if no
    /// complete pair was supplied at construction.
    pub async fn resolve(&self) -> Result<&KeySet, Error> {
        self.keys
            .get_or_try_init(|| async { KeySet::generate() })
            .await
    }

    /// Generates a disposable keypair, leaving the stored pair untouched.
    pub async fn generate(&self) -> Result<KeySet, Error> {
        KeySet::generate()
    }

    /// Resolves the keypair and returns its public half.
    pub async fn get_public_key(&self) -> Result<&PublicKey, Error> {
        Ok(&self.resolve().await?.public_key)
    }

    /// Resolves the keypair and returns its secret half.
    pub async fn get_secret_key(&self) -> Result<&SecretKey, Error> {
        Ok(&self.resolve().await?.secret_key)
    }

    /// Serializes the public key to its PEM text form.
    pub async fn serialize_public_key(&self) -> Result<String, Error> {
        self.get_public_key().await?.serialize()
    }

    /// Serializes the secret key to its PEM text form. The returned buffer
    /// is zeroized on drop.
    pub async fn serialize_secret_key(&self) -> Result<Zeroizing<String>, Error> {
        self.get_secret_key().await?.serialize()
    }

    /// Serializes the public key and persists it at `path`, overwriting
    /// any existing file.
    pub async fn write_public_key(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let serialized = self.serialize_public_key().await?;
        tokio::fs::write(path.as_ref(), serialized).await?;
        tracing::debug!(path = %path.as_ref().display(), "wrote public key");
        Ok(())
    }

    /// Serializes the secret key and persists it at `path`, overwriting
    /// any existing file.
    pub async fn write_secret_key(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let serialized = self.serialize_secret_key().await?;
        tokio::fs::write(path.as_ref(), serialized.as_bytes()).await?;
        tracing::debug!(path = %path.as_ref().display(), "wrote secret key");
        Ok(())
    }

    /// Projects the public key into its verifier-facing JWK descriptor.
    pub async fn to_public_jwk(&self, kid: &str) -> Result<Jwk, Error> {
        Ok(Jwk::from_public_key(kid, self.get_public_key().await?))
    }

    /// Wraps the JWK descriptor in a one-entry key set, the document a
    /// `jku` endpoint serves.
    pub async fn to_public_jwk_set(&self, kid: &str) -> Result<JwkSet, Error> {
        Ok(JwkSet {
            keys: vec![self.to_public_jwk(kid).await?],
        })
    }
}

fn load_secret_key(path: &Path) -> Result<SecretKey, Error> {
    let bytes = std::fs::read(path)?;
    let key = SecretKey::load(&bytes)?;
    tracing::debug!(path = %path.display(), "loaded secret key");
    Ok(key)
}

fn load_public_key(path: &Path) -> Result<PublicKey, Error> {
    let bytes = std::fs::read(path)?;
    let key = PublicKey::load(&bytes)?;
    tracing::debug!(path = %path.display(), "loaded public key");
    Ok(key)
}
