//! Frame header codec
//!
//! The header is a variable-length prefix: one config byte, an optional
//! big-endian key id, then a big-endian counter. Config byte layout:
//!
//! ```text
//!  7 6 5 4 3 2 1 0
//! +-+-----+-+-----+
//! |R| LEN |X|  K  |
//! +-+-----+-+-----+
//! ```
//!
//! `R` is reserved and must be zero. `LEN` is the counter byte length
//! (1..=7). With `X` clear, `K` carries the key id directly (0..=7); with
//! `X` set, `K` is the byte length of the key id that follows (1..=7).
//! Key ids and counters are encoded with the fewest bytes that hold their
//! value, except that a zero counter still takes one byte.

use crate::error::SframeError;

/// Key identifier carried in the frame header.
pub type KeyId = u64;

/// Per-key frame counter carried in the frame header.
pub type Counter = u64;

const RESERVED_BIT: u8 = 0x80;
const EXTENDED_KID_BIT: u8 = 0x08;

/// Largest key id the short form can carry directly.
const SHORT_KID_MAX: u64 = 0x07;

/// Parsed frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Key identifier selecting the frame key.
    pub key_id: KeyId,
    /// Frame counter providing nonce freshness.
    pub counter: Counter,
}

impl Header {
    /// Smallest encoded header: a lone config byte.
    pub const MIN_SIZE: usize = 1;

    /// Largest encoded header: config byte plus 8-byte key id and counter.
    pub const MAX_SIZE: usize = 1 + 8 + 8;

    /// Encoded size of this header in bytes.
    pub fn size(&self) -> usize {
        let kid_size = if self.key_id <= SHORT_KID_MAX { 0 } else { uint_size(self.key_id) };
        1 + kid_size + uint_size(self.counter)
    }

    /// Encode into the front of `buf`, returning the number of bytes
    /// written.
    ///
    /// # Errors
    ///
    /// `HeaderOverflow` if the key id or counter needs 8 bytes (the length
    /// fields hold at most 7); `ShortBuffer` if `buf` cannot hold the
    /// header.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, SframeError> {
        let kid_size = if self.key_id <= SHORT_KID_MAX { 0 } else { uint_size(self.key_id) };
        let ctr_size = uint_size(self.counter);
        if kid_size > 0x07 || ctr_size > 0x07 {
            return Err(SframeError::HeaderOverflow);
        }

        let total = 1 + kid_size + ctr_size;
        if buf.len() < total {
            return Err(SframeError::ShortBuffer { needed: total, available: buf.len() });
        }

        let mut config = (ctr_size as u8) << 4;
        if self.key_id <= SHORT_KID_MAX {
            config |= self.key_id as u8;
        } else {
            config |= EXTENDED_KID_BIT | kid_size as u8;
            put_uint(self.key_id, &mut buf[1..1 + kid_size]);
        }
        buf[0] = config;
        put_uint(self.counter, &mut buf[1 + kid_size..total]);

        Ok(total)
    }

    /// Decode a header from the front of `buf`, returning it together with
    /// its encoded length.
    ///
    /// # Errors
    ///
    /// `ShortCiphertext` if `buf` ends inside the header; `ReservedBitSet`
    /// if the reserved config bit is set.
    pub fn decode(buf: &[u8]) -> Result<(Self, usize), SframeError> {
        let Some(&config) = buf.first() else {
            return Err(SframeError::ShortCiphertext { length: buf.len() });
        };
        if config & RESERVED_BIT != 0 {
            return Err(SframeError::ReservedBitSet);
        }

        let ctr_size = usize::from((config >> 4) & 0x07);
        let low_bits = u64::from(config & 0x07);

        let (key_id, kid_size) = if config & EXTENDED_KID_BIT != 0 {
            let kid_size = low_bits as usize;
            if buf.len() < 1 + kid_size {
                return Err(SframeError::ShortCiphertext { length: buf.len() });
            }
            (get_uint(&buf[1..1 + kid_size]), kid_size)
        } else {
            (low_bits, 0)
        };

        let total = 1 + kid_size + ctr_size;
        if buf.len() < total {
            return Err(SframeError::ShortCiphertext { length: buf.len() });
        }
        let counter = get_uint(&buf[1 + kid_size..total]);

        Ok((Self { key_id, counter }, total))
    }
}

/// Minimal big-endian byte length of `val`, never less than one.
fn uint_size(val: u64) -> usize {
    usize::max(8 - val.leading_zeros() as usize / 8, 1)
}

fn put_uint(val: u64, out: &mut [u8]) {
    let bytes = val.to_be_bytes();
    out.copy_from_slice(&bytes[8 - out.len()..]);
}

fn get_uint(data: &[u8]) -> u64 {
    data.iter().fold(0, |acc, &byte| (acc << 8) | u64::from(byte))
}
