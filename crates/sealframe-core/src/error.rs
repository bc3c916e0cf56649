//! Error types for frame protection operations

use thiserror::Error;

/// Errors from protect/unprotect and key management operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SframeError {
    /// Caller-supplied output buffer is too small for the result
    #[error("output buffer too small: need {needed} bytes, have {available}")]
    ShortBuffer {
        /// Bytes required for the operation to succeed
        needed: usize,
        /// Bytes actually available in the caller's buffer
        available: usize,
    },

    /// Input is shorter than the smallest well-formed frame
    #[error("ciphertext too short to parse: {length} bytes")]
    ShortCiphertext {
        /// Length of the rejected input
        length: usize,
    },

    /// The reserved bit of the header config byte is set
    #[error("reserved header bit set")]
    ReservedBitSet,

    /// Key id or counter does not fit the wire encoding (7 bytes max)
    #[error("key id or counter too large to encode")]
    HeaderOverflow,

    /// No key registered under the requested key id
    #[error("unknown key id {key_id:#x}")]
    UnknownKey {
        /// The key id that was not found
        key_id: u64,
    },

    /// No live epoch matches the epoch bits of the key id
    #[error("no live epoch for key id {key_id:#x}")]
    UnknownEpoch {
        /// The wire key id whose epoch bits matched no live epoch
        key_id: u64,
    },

    /// Authentication tag mismatch (tampering or wrong key)
    #[error("frame authentication failed")]
    AuthenticationFailed,

    /// The 64-bit send counter for this key is exhausted
    ///
    /// Fatal for the key: continuing would reuse a nonce. The caller must
    /// re-key before sending more frames under this key id.
    #[error("send counter exhausted for key id {key_id:#x}")]
    CounterOverflow {
        /// Key id whose counter ran out
        key_id: u64,
    },

    /// `epoch_bits` outside the supported range at construction
    #[error("epoch_bits must be in 1..=8, got {bits}")]
    InvalidEpochBits {
        /// The rejected configuration value
        bits: u8,
    },
}

impl SframeError {
    /// Returns true if this error is fatal for the key or context it
    /// concerns.
    ///
    /// Fatal errors indicate tampering, misuse, or an exhausted resource.
    /// Non-fatal errors can resolve once the peer's key or epoch state
    /// catches up.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::AuthenticationFailed => true,
            Self::CounterOverflow { .. } => true,
            Self::InvalidEpochBits { .. } => true,
            Self::HeaderOverflow => true,

            // Recoverable with a larger buffer or later key/epoch delivery
            Self::ShortBuffer { .. } => false,
            Self::ShortCiphertext { .. } => false,
            Self::ReservedBitSet => false,
            Self::UnknownKey { .. } => false,
            Self::UnknownEpoch { .. } => false,
        }
    }
}
