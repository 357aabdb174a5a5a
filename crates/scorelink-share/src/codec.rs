//! URL-safe binary codec.
//!
//! Maps arbitrary byte sequences to a token safe for direct inclusion in a
//! URL fragment: base64 with `+/` remapped to `-_` and padding stripped.
//! Decoding tolerates residual `=` padding, since tokens from older links
//! sometimes carry it.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;

use crate::error::ShareError;

const URL_SAFE_FORGIVING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Standard-alphabet engine used by the oldest legacy format, equally
/// indifferent to padding.
pub(crate) const STANDARD_FORGIVING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode bytes as an unpadded URL-safe base64 token.
pub fn encode(bytes: &[u8]) -> String {
    URL_SAFE_FORGIVING.encode(bytes)
}

/// Decode a URL-safe base64 token back to bytes.
pub fn decode(token: &str) -> Result<Vec<u8>, ShareError> {
    Ok(URL_SAFE_FORGIVING.decode(token)?)
}
