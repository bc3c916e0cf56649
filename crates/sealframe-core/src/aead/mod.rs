//! AEAD seal and open for the frame cipher suites
//!
//! The GCM suites use AES-GCM directly. The CTR suites build a synthetic
//! AEAD from AES-CTR and a truncated HMAC tag covering header, nonce, and
//! ciphertext. Both take the encoded header as associated data and produce
//! `ciphertext || tag`.

mod ctr_hmac;
mod gcm;

use crate::derivation::KeyMaterial;
use crate::error::SframeError;
use crate::suite::{CipherSuite, NONCE_SIZE};

/// Nonce for `counter`: the salt XORed with the zero-padded big-endian
/// counter.
pub(crate) fn form_nonce(salt: &[u8; NONCE_SIZE], counter: u64) -> [u8; NONCE_SIZE] {
    let mut nonce = *salt;
    for (nonce_byte, counter_byte) in
        nonce[NONCE_SIZE - 8..].iter_mut().zip(counter.to_be_bytes())
    {
        *nonce_byte ^= counter_byte;
    }
    nonce
}

/// Seal `plaintext` into `out`, which must hold exactly
/// `plaintext.len() + suite.tag_size()` bytes.
pub(crate) fn seal(
    suite: CipherSuite,
    material: &KeyMaterial,
    nonce: &[u8; NONCE_SIZE],
    aad: &[u8],
    out: &mut [u8],
    plaintext: &[u8],
) {
    debug_assert_eq!(out.len(), plaintext.len() + suite.tag_size());
    if suite.is_ctr_hmac() {
        ctr_hmac::seal(material, nonce, aad, out, plaintext, suite.tag_size());
    } else {
        gcm::seal(suite, material, nonce, aad, out, plaintext);
    }
}

/// Open `input` (ciphertext followed by tag) into `out`, which must hold
/// exactly `input.len() - suite.tag_size()` bytes.
pub(crate) fn open(
    suite: CipherSuite,
    material: &KeyMaterial,
    nonce: &[u8; NONCE_SIZE],
    aad: &[u8],
    out: &mut [u8],
    input: &[u8],
) -> Result<(), SframeError> {
    debug_assert_eq!(out.len() + suite.tag_size(), input.len());
    if suite.is_ctr_hmac() {
        ctr_hmac::open(material, nonce, aad, out, input, suite.tag_size())
    } else {
        gcm::open(suite, material, nonce, aad, out, input)
    }
}
