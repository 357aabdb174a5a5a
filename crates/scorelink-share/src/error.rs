//! Share decode/encode error types.
//!
//! Every variant is contained by the dispatcher; callers that use
//! `decode_fragment` only ever observe "decoded" or "no shared state".

use thiserror::Error;

/// Errors that can occur while encoding or decoding a share token.
#[derive(Debug, Error)]
pub enum ShareError {
    /// The token is not valid URL-safe base64.
    #[error("url-safe decode failed: {0}")]
    Codec(#[from] base64::DecodeError),

    /// The byte stream is not a zlib stream this system produced.
    #[error("deflate stream error: {0}")]
    Deflate(#[from] std::io::Error),

    /// The decompressed payload is not valid UTF-8.
    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The payload is not valid JSON, or its JSON shape does not match the
    /// format's contract.
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Valid JSON with a field value outside the format's contract.
    #[error("unexpected payload shape: {0}")]
    Shape(String),
}
