/*! # preverify-token

This library issues short-lived, signed "preverified email" assertions and
manages the RSA keypair used to sign them.

## Features

- **Key management**: lazy, single-flight materialization of an RSA keypair,
  with loading from and persistence to PEM files.
- **JWK export**: verifier-facing `kid`/`use`/`kty`/`n`/`e` descriptors of
  the public key, ready for publication through a JSON Web Key Set endpoint.
- **Token issuance**: compact three-segment RS256 tokens binding an email
  address, issuer key id, audience and expiry.

*/
pub mod crypto;
pub mod errors;
pub mod jwk;
pub mod keypair;
pub mod token;
pub mod utils;

pub use errors::Error;
pub use jwk::{Class, Jwk, JwkSet, KeyType};
pub use keypair::{KeyPair, KeyPairConfig, KeySet};
pub use token::{TokenIssuer, TokenIssuerConfig, PREVERIFIED_EMAIL_TOKEN_TYPE, TOKEN_VALIDITY_MS};
