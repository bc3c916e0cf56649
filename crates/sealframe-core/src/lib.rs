//! End-to-end encryption for real-time media frames.
//!
//! Frames cross a selective forwarding unit that relays without decrypting.
//! Each frame is sealed independently under a symmetric key selected by a
//! small `KeyId`, with a per-key monotonic counter providing nonce freshness.
//! The wire format is a compact variable-length header followed by the AEAD
//! ciphertext and tag; the header doubles as associated data, so a relay
//! cannot splice payloads between keys or counters without detection.
//!
//! # Operating Modes
//!
//! - [`Context`]: explicit key management. The caller registers
//!   `(KeyId, base key)` pairs and protects/unprotects under a chosen key.
//! - [`MlsContext`]: key material comes from an MLS group epoch secret
//!   combined with a per-sender identifier. The wire `KeyId` encodes both
//!   the epoch (low bits) and the sender (high bits).
//!
//! # Key Lifecycle
//!
//! ```text
//! base key (or MLS epoch secret + sender id)
//!        │
//!        ▼ HKDF
//! frame key, nonce salt, auth key (CTR suites only)
//!        │
//!        ▼ per-frame counter
//! nonce = salt XOR counter
//!        │
//!        ▼ AEAD (AES-GCM, or AES-CTR with truncated HMAC tag)
//! header || ciphertext || tag
//! ```
//!
//! # Security
//!
//! - Nonce uniqueness: counters increase strictly per key and never wrap;
//!   exhaustion is reported as an error instead of reusing a nonce
//! - Header binding: the header is AEAD associated data on every frame
//! - Epoch rotation: MLS mode keeps a bounded ring of live epochs and
//!   zeroizes evicted key material
//! - No receive state: unprotect keeps no replay window; callers wanting
//!   replay rejection wrap this crate

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod aead;
mod context;
mod derivation;
mod error;
mod header;
mod mls;
mod suite;

pub use context::Context;
pub use error::SframeError;
pub use header::{Counter, Header, KeyId};
pub use mls::{EpochId, MlsContext, SenderId};
pub use suite::CipherSuite;

/// Worst-case ciphertext expansion over the plaintext: the largest header
/// plus the largest tag. Output buffers of `plaintext.len() + MAX_OVERHEAD`
/// are always sufficient for [`Context::protect`].
pub const MAX_OVERHEAD: usize = Header::MAX_SIZE + suite::MAX_TAG_SIZE;
