//! Synthetic AEAD: AES-CTR encryption with a truncated HMAC tag
//!
//! Encrypt with AES-128 in counter mode, then authenticate header, nonce,
//! and ciphertext with HMAC-SHA-256, keeping only the leading tag bytes.
//! The truncated comparison on open is constant time.

use aes::cipher::{KeyIvInit, StreamCipher};
use aes::Aes128;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::derivation::KeyMaterial;
use crate::error::SframeError;
use crate::suite::NONCE_SIZE;

type Aes128Ctr = ctr::Ctr128BE<Aes128>;
type HmacSha256 = Hmac<Sha256>;

/// AES block size; the counter block is nonce-high, zero-low.
const BLOCK_SIZE: usize = 16;

pub(super) fn seal(
    material: &KeyMaterial,
    nonce: &[u8; NONCE_SIZE],
    aad: &[u8],
    out: &mut [u8],
    plaintext: &[u8],
    tag_size: usize,
) {
    let (ciphertext, tag_out) = out.split_at_mut(plaintext.len());
    ciphertext.copy_from_slice(plaintext);
    apply_keystream(&material.key, nonce, ciphertext);

    let tag = compute_tag(material, aad, nonce, ciphertext);
    tag_out.copy_from_slice(&tag[..tag_size]);
}

pub(super) fn open(
    material: &KeyMaterial,
    nonce: &[u8; NONCE_SIZE],
    aad: &[u8],
    out: &mut [u8],
    input: &[u8],
    tag_size: usize,
) -> Result<(), SframeError> {
    let (ciphertext, tag) = input.split_at(input.len() - tag_size);

    let expected = compute_tag(material, aad, nonce, ciphertext);
    if !bool::from(expected[..tag_size].ct_eq(tag)) {
        return Err(SframeError::AuthenticationFailed);
    }

    out.copy_from_slice(ciphertext);
    apply_keystream(&material.key, nonce, out);
    Ok(())
}

fn apply_keystream(key: &[u8], nonce: &[u8; NONCE_SIZE], data: &mut [u8]) {
    let mut iv = [0u8; BLOCK_SIZE];
    iv[..NONCE_SIZE].copy_from_slice(nonce);

    let Ok(mut cipher) = Aes128Ctr::new_from_slices(key, &iv) else {
        unreachable!("derived key and block-sized IV match the cipher");
    };
    cipher.apply_keystream(data);
}

fn compute_tag(
    material: &KeyMaterial,
    aad: &[u8],
    nonce: &[u8; NONCE_SIZE],
    ciphertext: &[u8],
) -> [u8; 32] {
    let Some(auth_key) = &material.auth_key else {
        unreachable!("CTR suites always derive an auth key");
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(auth_key) else {
        unreachable!("HMAC-SHA256 accepts any key size");
    };
    mac.update(aad);
    mac.update(nonce);
    mac.update(ciphertext);
    mac.finalize().into_bytes().into()
}
