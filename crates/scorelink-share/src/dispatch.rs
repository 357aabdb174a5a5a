//! Format dispatcher.
//!
//! Inspects a URL fragment, selects which historical decode path applies,
//! and runs it. Decoding either fully succeeds — yielding a complete
//! {questions, student input} pair — or fully fails, leaving the caller's
//! state untouched. Failures are logged and never propagate past
//! [`decode_fragment`].

use scorelink_core::model::{Question, StudentInput};

use crate::error::ShareError;
use crate::{codec, compress, legacy, pack};

/// A fully decoded shared session.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedState {
    pub questions: Vec<Question>,
    pub student: StudentInput,
}

/// The recognized share-fragment formats, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareFormat {
    /// `#s=` — compact positional 5-tuple, compressed. The only format new
    /// encodes produce.
    Compact,
    /// `#r=` — prior minified keyed shape, compressed. Decode-only.
    LegacyCompressed,
    /// `#report=` — oldest uncompressed shape. Decode-only.
    LegacyPlain,
}

impl ShareFormat {
    /// Match a fragment against the recognized prefixes (first match wins,
    /// case-sensitive) and split off the token. The leading `#` is
    /// optional: fragment APIs differ on whether they include it.
    pub fn detect(fragment: &str) -> Option<(ShareFormat, &str)> {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        if let Some(token) = fragment.strip_prefix("s=") {
            return Some((ShareFormat::Compact, token));
        }
        if let Some(token) = fragment.strip_prefix("r=") {
            return Some((ShareFormat::LegacyCompressed, token));
        }
        if let Some(token) = fragment.strip_prefix("report=") {
            return Some((ShareFormat::LegacyPlain, token));
        }
        None
    }

    /// The fragment prefix of this format, `#` included.
    pub fn prefix(self) -> &'static str {
        match self {
            ShareFormat::Compact => "#s=",
            ShareFormat::LegacyCompressed => "#r=",
            ShareFormat::LegacyPlain => "#report=",
        }
    }
}

impl std::fmt::Display for ShareFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.prefix())
    }
}

fn decode_compact(token: &str) -> Result<SharedState, ShareError> {
    let bytes = codec::decode(token)?;
    let json = compress::decompress(&bytes)?;
    let packed: pack::PackedState = serde_json::from_slice(&json)?;
    let (questions, student) = pack::unpack(&packed);
    Ok(SharedState { questions, student })
}

/// Decode a token whose format has already been detected.
pub fn decode_token(format: ShareFormat, token: &str) -> Result<SharedState, ShareError> {
    match format {
        ShareFormat::Compact => decode_compact(token),
        ShareFormat::LegacyCompressed => legacy::decode_compressed(token),
        ShareFormat::LegacyPlain => legacy::decode_plain(token),
    }
}

/// Decode a full fragment string, if it carries shared state.
///
/// Returns `None` both for fragments without a recognized prefix (a normal
/// non-shared start) and for tokens that fail to decode at any stage; the
/// latter are logged with their diagnostic. No failure escapes this
/// function.
pub fn decode_fragment(fragment: &str) -> Option<SharedState> {
    let (format, token) = ShareFormat::detect(fragment)?;
    match decode_token(format, token) {
        Ok(state) => Some(state),
        Err(error) => {
            tracing::warn!(%format, %error, "failed to decode share fragment");
            None
        }
    }
}

/// Encode a session as a current-format fragment: `#s=<token>`.
pub fn encode_fragment(
    questions: &[Question],
    student: &StudentInput,
) -> Result<String, ShareError> {
    let packed = pack::pack(questions, student);
    let json = serde_json::to_vec(&packed)?;
    let compressed = compress::compress(&json)?;
    Ok(format!(
        "{}{}",
        ShareFormat::Compact.prefix(),
        codec::encode(&compressed)
    ))
}

/// Build a full share URL by appending the encoded fragment to a base URL.
pub fn share_url(
    base_url: &str,
    questions: &[Question],
    student: &StudentInput,
) -> Result<String, ShareError> {
    let fragment = encode_fragment(questions, student)?;
    Ok(format!("{}{}", base_url.trim_end_matches('#'), fragment))
}
