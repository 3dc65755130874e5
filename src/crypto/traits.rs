//! Traits for cryptographic key operations.
//!
//! The concrete backend stays swappable: consuming modules only rely on
//! these interfaces for signing, serialization and key parameter access.

use crate::errors::Error;

/// A trait for keys that produce detached signatures.
pub trait CoreSign {
    /// Performs a sign operation over the payload bytes.
    ///
    /// Returns a `Result` containing the signature bytes, or an `Error` if
    /// the operation fails.
    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, Error>;
}

/// A trait for types that hold serializable key material.
pub trait KeyMaterial {
    /// The serialized representation of the key.
    type Serialized: AsRef<[u8]>;

    /// Serializes the key material to its persistable text form.
    fn serialize(&self) -> Result<Self::Serialized, Error>;
}

/// A trait exposing the numeric parameters of an RSA public key.
pub trait RsaParameters {
    /// Returns the minimal big-endian byte representation of the modulus.
    fn modulus_bytes(&self) -> Vec<u8>;

    /// Returns the minimal big-endian byte representation of the public
    /// exponent.
    fn exponent_bytes(&self) -> Vec<u8>;
}
