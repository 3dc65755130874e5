//! Small shared encoding helpers.

use base64ct::{Base64UrlUnpadded, Encoding};

/// Encodes bytes with the URL-safe base64 alphabet, without padding.
pub fn b64(data: impl AsRef<[u8]>) -> String {
    Base64UrlUnpadded::encode_string(data.as_ref())
}
