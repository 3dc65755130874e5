use std::fmt;

use rand::rngs::OsRng;
use rsa::{
    pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding},
    traits::PublicKeyParts,
    Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey,
};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::traits::{CoreSign, KeyMaterial, RsaParameters};
use crate::errors::Error;

/// Modulus size of generated keypairs, in bits.
pub const RSA_KEY_SIZE: usize = 2048;

/// The secret half of an RSA keypair. Signs with RSASSA-PKCS1-v1_5 over
/// SHA-256 (`RS256`) and serializes to PKCS#8 PEM.
#[derive(Clone)]
pub struct SecretKey {
    inner: RsaPrivateKey,
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

impl SecretKey {
    /// Loads a secret key from serialized PKCS#8 PEM bytes.
    pub fn load(bytes: &[u8]) -> Result<Self, Error> {
        let pem = std::str::from_utf8(bytes).map_err(|e| Error::Deserialization(e.to_string()))?;
        let inner =
            RsaPrivateKey::from_pkcs8_pem(pem).map_err(|e| Error::Deserialization(e.to_string()))?;
        Ok(SecretKey { inner })
    }
}

impl CoreSign for SecretKey {
    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, Error> {
        let digest = Sha256::digest(payload);
        self.inner
            .sign(Pkcs1v15Sign::new::<Sha256>(), &digest)
            .map_err(|e| Error::Signing(e.to_string()))
    }
}

impl KeyMaterial for SecretKey {
    type Serialized = Zeroizing<String>;

    fn serialize(&self) -> Result<Self::Serialized, Error> {
        self.inner
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| Error::Serialization(e.to_string()))
    }
}

/// The public half of an RSA keypair. Serializes to SPKI PEM.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    inner: RsaPublicKey,
}

impl PublicKey {
    /// Loads a public key from serialized SPKI PEM bytes.
    pub fn load(bytes: &[u8]) -> Result<Self, Error> {
        let pem = std::str::from_utf8(bytes).map_err(|e| Error::Deserialization(e.to_string()))?;
        let inner = RsaPublicKey::from_public_key_pem(pem)
            .map_err(|e| Error::Deserialization(e.to_string()))?;
        Ok(PublicKey { inner })
    }
}

impl KeyMaterial for PublicKey {
    type Serialized = String;

    fn serialize(&self) -> Result<Self::Serialized, Error> {
        self.inner
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| Error::Serialization(e.to_string()))
    }
}

impl RsaParameters for PublicKey {
    fn modulus_bytes(&self) -> Vec<u8> {
        self.inner.n().to_bytes_be()
    }

    fn exponent_bytes(&self) -> Vec<u8> {
        self.inner.e().to_bytes_be()
    }
}

/// Generates a brand-new RSA keypair at [`RSA_KEY_SIZE`] bits.
pub fn generate_keypair() -> Result<(SecretKey, PublicKey), Error> {
    tracing::debug!(bits = RSA_KEY_SIZE, "generating RSA keypair");

    let mut rng = OsRng;
    let secret = RsaPrivateKey::new(&mut rng, RSA_KEY_SIZE)
        .map_err(|e| Error::Generation(e.to_string()))?;
    let public = secret.to_public_key();

    Ok((SecretKey { inner: secret }, PublicKey { inner: public }))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Sign, then verify through the raw backend.
    #[test]
    fn test_sign_verify() {
        let (secret_key, public_key) = generate_keypair().unwrap();

        let payload = b"header.payload";
        let signature = secret_key.sign(payload).unwrap();

        let digest = Sha256::digest(payload);
        public_key
            .inner
            .verify(Pkcs1v15Sign::new::<Sha256>(), &digest, &signature)
            .unwrap();
    }

    // Serialized keys load back and reproduce byte-identical text.
    #[test]
    fn test_serialize_load_round_trip() {
        let (secret_key, public_key) = generate_keypair().unwrap();

        let secret_pem = secret_key.serialize().unwrap();
        let restored = SecretKey::load(secret_pem.as_bytes()).unwrap();
        assert_eq!(restored.serialize().unwrap().as_str(), secret_pem.as_str());

        let public_pem = public_key.serialize().unwrap();
        let restored = PublicKey::load(public_pem.as_bytes()).unwrap();
        assert_eq!(restored.serialize().unwrap(), public_pem);
    }

    #[test]
    fn test_load_rejects_garbage() {
        assert!(matches!(
            SecretKey::load(b"not a pem"),
            Err(Error::Deserialization(_))
        ));
        assert!(matches!(
            PublicKey::load(&[0xff, 0xfe]),
            Err(Error::Deserialization(_))
        ));
    }

    // Modulus spans exactly RSA_KEY_SIZE bits, exponent is 65537.
    #[test]
    fn test_generated_parameters() {
        let (_, public_key) = generate_keypair().unwrap();
        assert_eq!(public_key.modulus_bytes().len() * 8, RSA_KEY_SIZE);
        assert_eq!(public_key.exponent_bytes(), vec![0x01, 0x00, 0x01]);
    }
}
