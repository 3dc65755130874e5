//! Cryptographic backend for keypair generation, serialization and signing.
//!
//! This module is the boundary to the concrete cryptographic library. It
//! exposes trait seams so that consuming modules never depend on the
//! backend's own types, and an RSA implementation of those seams.

mod rsa;
mod traits;

pub use self::rsa::{generate_keypair, PublicKey, SecretKey, RSA_KEY_SIZE};
pub use self::traits::{CoreSign, KeyMaterial, RsaParameters};
