//! Key schedule: HKDF derivation of per-key material
//!
//! A base key is extracted with the `SFrame10` salt and then expanded into
//! the frame key, the nonce salt, and (for the CTR suites) a separate HMAC
//! auth key. In MLS mode the per-sender base key is itself expanded from
//! the epoch secret and the sender id before entering the same schedule.

use hkdf::Hkdf;
use hmac::digest::{KeyInit, Output};
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha512};
use zeroize::Zeroize;

use crate::suite::{CipherSuite, AUTH_KEY_SIZE, NONCE_SIZE};

/// HKDF-Extract salt binding the schedule to this protocol version.
const EXTRACT_SALT: &[u8] = b"SFrame10";

const KEY_LABEL: &[u8] = b"key";
const SALT_LABEL: &[u8] = b"salt";
const AUTH_LABEL: &[u8] = b"auth";
const SENDER_LABEL: &[u8] = b"SFrame10 sender ";

/// Derived per-key material.
///
/// Owns long-term secrets; zeroized on drop.
pub(crate) struct KeyMaterial {
    /// AES key, `suite.key_size()` bytes.
    pub key: Vec<u8>,
    /// Salt XORed with the frame counter to form the nonce.
    pub salt: [u8; NONCE_SIZE],
    /// HMAC key, present only for the CTR suites.
    pub auth_key: Option<[u8; AUTH_KEY_SIZE]>,
}

impl KeyMaterial {
    /// Run the key schedule for `base_key` under `suite`.
    pub fn derive(suite: CipherSuite, base_key: &[u8]) -> Self {
        match suite {
            CipherSuite::AesGcm256Sha512 => {
                let hkdf = Hkdf::<Sha512>::new(Some(EXTRACT_SALT), base_key);
                Self::from_expand(suite, |info, okm| {
                    let Ok(()) = hkdf.expand(info, okm) else {
                        unreachable!("key schedule outputs are valid HKDF lengths");
                    };
                })
            }
            _ => {
                let hkdf = Hkdf::<Sha256>::new(Some(EXTRACT_SALT), base_key);
                Self::from_expand(suite, |info, okm| {
                    let Ok(()) = hkdf.expand(info, okm) else {
                        unreachable!("key schedule outputs are valid HKDF lengths");
                    };
                })
            }
        }
    }

    fn from_expand(suite: CipherSuite, expand: impl Fn(&[u8], &mut [u8])) -> Self {
        let mut key = vec![0u8; suite.key_size()];
        expand(KEY_LABEL, &mut key);

        let mut salt = [0u8; NONCE_SIZE];
        expand(SALT_LABEL, &mut salt);

        let auth_key = suite.is_ctr_hmac().then(|| {
            let mut auth_key = [0u8; AUTH_KEY_SIZE];
            expand(AUTH_LABEL, &mut auth_key);
            auth_key
        });

        Self { key, salt, auth_key }
    }
}

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        self.key.zeroize();
        self.salt.zeroize();
        if let Some(auth_key) = &mut self.auth_key {
            auth_key.zeroize();
        }
    }
}

/// Expand the per-sender base key from an MLS epoch secret.
///
/// The epoch secret acts directly as the expand PRK. The caller feeds the
/// result into [`KeyMaterial::derive`] and zeroizes it afterwards.
pub(crate) fn derive_sender_base(
    suite: CipherSuite,
    epoch_secret: &[u8],
    sender_id: u64,
) -> Vec<u8> {
    let mut info = [0u8; SENDER_LABEL.len() + 8];
    info[..SENDER_LABEL.len()].copy_from_slice(SENDER_LABEL);
    info[SENDER_LABEL.len()..].copy_from_slice(&sender_id.to_be_bytes());

    let mut base = vec![0u8; suite.secret_size()];
    match suite {
        CipherSuite::AesGcm256Sha512 => {
            expand_prk::<Hmac<Sha512>>(epoch_secret, &info, &mut base);
        }
        _ => expand_prk::<Hmac<Sha256>>(epoch_secret, &info, &mut base),
    }
    base
}

/// HKDF-Expand over a caller-supplied PRK.
///
/// `Hkdf::from_prk` rejects PRKs shorter than the hash output; MLS epoch
/// secrets are opaque bytes of any length, so this runs the RFC 5869 expand
/// loop over HMAC directly.
fn expand_prk<M>(prk: &[u8], info: &[u8], okm: &mut [u8])
where
    M: Mac + KeyInit,
{
    let mut previous: Option<Output<M>> = None;
    for (index, chunk) in okm.chunks_mut(M::output_size()).enumerate() {
        let Ok(mut mac) = <M as KeyInit>::new_from_slice(prk) else {
            unreachable!("HMAC accepts any key size");
        };
        if let Some(block) = &previous {
            mac.update(block);
        }
        mac.update(info);
        mac.update(&[index as u8 + 1]);
        let block = mac.finalize().into_bytes();
        chunk.copy_from_slice(&block[..chunk.len()]);
        previous = Some(block);
    }
}
