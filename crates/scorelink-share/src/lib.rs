//! scorelink-share — the share-link wire format.
//!
//! Encodes an exam session ({questions, student input}) into a compact,
//! URL-fragment-safe token and reconstructs it on the other end. Three
//! historical fragment formats are recognized so that previously shared
//! links keep working:
//!
//! - `#s=` — current compact format: positional 5-tuple JSON, zlib
//!   compressed, URL-safe base64.
//! - `#r=` — prior compressed format with a minified keyed JSON shape.
//!   Decode-only.
//! - `#report=` — oldest format: percent-encoded standard base64 over plain
//!   JSON. Decode-only.
//!
//! Decoding never throws past the dispatcher: a malformed token of any
//! vintage is logged and treated as "no shared state".

pub mod codec;
pub mod compress;
pub mod dispatch;
pub mod error;
pub mod fragment;
mod legacy;
pub mod pack;

pub use dispatch::{
    decode_fragment, decode_token, encode_fragment, share_url, ShareFormat, SharedState,
};
pub use error::ShareError;
pub use fragment::{FragmentPort, InMemoryFragment, SharedSession};
pub use pack::{pack, unpack, PackedState};
