//! AES-GCM seal and open over caller-provided buffers

use aes_gcm::aead::{AeadInPlace, Nonce, Tag};
use aes_gcm::{Aes128Gcm, Aes256Gcm, KeyInit};

use crate::derivation::KeyMaterial;
use crate::error::SframeError;
use crate::suite::{CipherSuite, NONCE_SIZE};

pub(super) fn seal(
    suite: CipherSuite,
    material: &KeyMaterial,
    nonce: &[u8; NONCE_SIZE],
    aad: &[u8],
    out: &mut [u8],
    plaintext: &[u8],
) {
    let (ciphertext, tag_out) = out.split_at_mut(plaintext.len());
    ciphertext.copy_from_slice(plaintext);

    let tag = match suite {
        CipherSuite::AesGcm256Sha512 => {
            seal_in_place::<Aes256Gcm>(&material.key, nonce, aad, ciphertext)
        }
        _ => seal_in_place::<Aes128Gcm>(&material.key, nonce, aad, ciphertext),
    };
    tag_out.copy_from_slice(&tag);
}

pub(super) fn open(
    suite: CipherSuite,
    material: &KeyMaterial,
    nonce: &[u8; NONCE_SIZE],
    aad: &[u8],
    out: &mut [u8],
    input: &[u8],
) -> Result<(), SframeError> {
    let (ciphertext, tag) = input.split_at(out.len());
    out.copy_from_slice(ciphertext);

    match suite {
        CipherSuite::AesGcm256Sha512 => {
            open_in_place::<Aes256Gcm>(&material.key, nonce, aad, out, tag)
        }
        _ => open_in_place::<Aes128Gcm>(&material.key, nonce, aad, out, tag),
    }
}

fn seal_in_place<A>(
    key: &[u8],
    nonce: &[u8; NONCE_SIZE],
    aad: &[u8],
    buffer: &mut [u8],
) -> Tag<A>
where
    A: AeadInPlace + KeyInit,
{
    let Ok(cipher) = A::new_from_slice(key) else {
        unreachable!("derived key length matches the cipher");
    };
    let Ok(tag) = cipher.encrypt_in_place_detached(Nonce::<A>::from_slice(nonce), aad, buffer)
    else {
        unreachable!("frame sizes are far below the AES-GCM length limit");
    };
    tag
}

fn open_in_place<A>(
    key: &[u8],
    nonce: &[u8; NONCE_SIZE],
    aad: &[u8],
    buffer: &mut [u8],
    tag: &[u8],
) -> Result<(), SframeError>
where
    A: AeadInPlace + KeyInit,
{
    let Ok(cipher) = A::new_from_slice(key) else {
        unreachable!("derived key length matches the cipher");
    };
    cipher
        .decrypt_in_place_detached(
            Nonce::<A>::from_slice(nonce),
            aad,
            buffer,
            Tag::<A>::from_slice(tag),
        )
        .map_err(|_| SframeError::AuthenticationFailed)
}
