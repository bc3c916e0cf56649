//! Raw frame-encryption context with explicit key management

use std::collections::HashMap;

use crate::aead;
use crate::derivation::KeyMaterial;
use crate::error::SframeError;
use crate::header::{Counter, Header, KeyId};
use crate::suite::CipherSuite;

/// Per-key state: derived material plus the send counter.
struct KeyState {
    material: KeyMaterial,
    send_counter: Counter,
}

/// Frame encryption context with caller-managed keys.
///
/// The caller registers `(key id, base key)` pairs and selects the key per
/// frame. `protect` mutates the per-key send counter and therefore needs
/// exclusive access; `unprotect` keeps no receive state, so shared access
/// is fine as long as no keys are added concurrently.
pub struct Context {
    suite: CipherSuite,
    keys: HashMap<KeyId, KeyState>,
}

impl Context {
    /// Create an empty context for `suite`.
    pub fn new(suite: CipherSuite) -> Self {
        Self { suite, keys: HashMap::new() }
    }

    /// Cipher suite this context operates with.
    pub fn suite(&self) -> CipherSuite {
        self.suite
    }

    /// Run the key schedule for `base_key` and store the result under
    /// `kid`.
    ///
    /// Registering an already-known `kid` replaces its material and resets
    /// its send counter to zero. Do not re-register a key id that has
    /// frames in flight: the restarted counter would repeat nonces under
    /// the same key.
    pub fn add_key(&mut self, kid: KeyId, base_key: &[u8]) {
        let material = KeyMaterial::derive(self.suite, base_key);
        self.keys.insert(kid, KeyState { material, send_counter: 0 });
    }

    /// Drop the state for `kid`. The material is zeroized on drop.
    pub(crate) fn remove_key(&mut self, kid: KeyId) {
        self.keys.remove(&kid);
    }

    /// Encrypt `plaintext` under `kid` into `out`, returning the written
    /// prefix: `header || ciphertext || tag`.
    ///
    /// # Errors
    ///
    /// `UnknownKey` if `kid` is not registered, `CounterOverflow` once the
    /// key's 64-bit counter is exhausted, `HeaderOverflow` for key ids that
    /// do not fit the wire encoding, and `ShortBuffer` if `out` is smaller
    /// than `plaintext.len()` plus [`crate::MAX_OVERHEAD`] worst case.
    pub fn protect<'a>(
        &mut self,
        kid: KeyId,
        out: &'a mut [u8],
        plaintext: &[u8],
    ) -> Result<&'a mut [u8], SframeError> {
        let tag_size = self.suite.tag_size();
        let state =
            self.keys.get_mut(&kid).ok_or(SframeError::UnknownKey { key_id: kid })?;

        let counter = state.send_counter;
        state.send_counter =
            counter.checked_add(1).ok_or(SframeError::CounterOverflow { key_id: kid })?;

        let header = Header { key_id: kid, counter };
        let total = header.size() + plaintext.len() + tag_size;
        if out.len() < total {
            return Err(SframeError::ShortBuffer { needed: total, available: out.len() });
        }
        let header_size = header.encode(out)?;

        let nonce = aead::form_nonce(&state.material.salt, counter);
        let (aad, rest) = out.split_at_mut(header_size);
        aead::seal(
            self.suite,
            &state.material,
            &nonce,
            aad,
            &mut rest[..plaintext.len() + tag_size],
            plaintext,
        );

        Ok(&mut out[..total])
    }

    /// Decrypt a `header || ciphertext || tag` frame into `out`, returning
    /// the plaintext prefix.
    ///
    /// No receive state is kept: replayed frames decrypt again, and frames
    /// may arrive in any order.
    ///
    /// # Errors
    ///
    /// `ShortCiphertext`/`ReservedBitSet` for malformed input, `UnknownKey`
    /// if the decoded key id is not registered, `AuthenticationFailed` on
    /// tag mismatch, and `ShortBuffer` if `out` cannot hold the plaintext.
    pub fn unprotect<'a>(
        &self,
        out: &'a mut [u8],
        ciphertext: &[u8],
    ) -> Result<&'a mut [u8], SframeError> {
        let (header, header_size) = Header::decode(ciphertext)?;

        let tag_size = self.suite.tag_size();
        if ciphertext.len() < header_size + tag_size {
            return Err(SframeError::ShortCiphertext { length: ciphertext.len() });
        }

        let state = self
            .keys
            .get(&header.key_id)
            .ok_or(SframeError::UnknownKey { key_id: header.key_id })?;

        let inner_size = ciphertext.len() - header_size - tag_size;
        if out.len() < inner_size {
            return Err(SframeError::ShortBuffer { needed: inner_size, available: out.len() });
        }

        let nonce = aead::form_nonce(&state.material.salt, header.counter);
        aead::open(
            self.suite,
            &state.material,
            &nonce,
            &ciphertext[..header_size],
            &mut out[..inner_size],
            &ciphertext[header_size..],
        )?;

        Ok(&mut out[..inner_size])
    }
}
