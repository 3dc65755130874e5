use thiserror::Error;

/// The set of errors that can occur during key and token operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A required configuration field was not supplied.
    #[error("missing required configuration: {0}")]
    Configuration(&'static str),
    /// Persisted key material could not be deserialized.
    #[error("malformed key material: {0}")]
    Deserialization(String),
    /// The cryptographic backend failed to generate a keypair.
    #[error("keypair generation failed: {0}")]
    Generation(String),
    /// The sign operation failed.
    #[error("signing failed: {0}")]
    Signing(String),
    /// Key material or a token segment could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),
    /// Reading or writing a key file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
