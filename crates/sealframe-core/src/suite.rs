//! Cipher suite registry and per-suite parameters

/// AEAD nonce size shared by every suite (12 bytes).
pub(crate) const NONCE_SIZE: usize = 12;

/// Largest tag any suite produces (AES-GCM, 16 bytes).
pub(crate) const MAX_TAG_SIZE: usize = 16;

/// HMAC key size for the CTR suites (32 bytes).
pub(crate) const AUTH_KEY_SIZE: usize = 32;

/// Supported cipher suites.
///
/// The CTR suites pair AES-128 counter mode with a truncated HMAC-SHA-256
/// tag; the GCM suites are standard AES-GCM. Discriminants are the wire
/// registry values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherSuite {
    /// AES-128-CTR with HMAC-SHA-256, 4-byte tag
    AesCm128HmacSha256_4 = 1,
    /// AES-128-CTR with HMAC-SHA-256, 8-byte tag
    AesCm128HmacSha256_8 = 2,
    /// AES-128-GCM, SHA-256 key schedule
    AesGcm128Sha256 = 3,
    /// AES-256-GCM, SHA-512 key schedule
    AesGcm256Sha512 = 4,
}

impl CipherSuite {
    /// Wire registry value of this suite.
    pub fn suite_id(self) -> u8 {
        self as u8
    }

    /// AES key size in bytes.
    pub fn key_size(self) -> usize {
        match self {
            Self::AesGcm256Sha512 => 32,
            _ => 16,
        }
    }

    /// Nonce size in bytes. Identical for every suite.
    pub fn nonce_size(self) -> usize {
        NONCE_SIZE
    }

    /// Authentication tag size in bytes.
    pub fn tag_size(self) -> usize {
        match self {
            Self::AesCm128HmacSha256_4 => 4,
            Self::AesCm128HmacSha256_8 => 8,
            Self::AesGcm128Sha256 | Self::AesGcm256Sha512 => 16,
        }
    }

    /// Size of the per-sender base secret the MLS key schedule produces.
    pub fn secret_size(self) -> usize {
        match self {
            Self::AesGcm256Sha512 => 64,
            _ => 32,
        }
    }

    /// True for the AES-CTR + HMAC suites, which carry a separate auth key.
    pub fn is_ctr_hmac(self) -> bool {
        matches!(self, Self::AesCm128HmacSha256_4 | Self::AesCm128HmacSha256_8)
    }
}
