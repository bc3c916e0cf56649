//! MLS-keyed frame encryption: epoch ring and per-sender subkeys
//!
//! Key material comes from the epoch secret an MLS group exports. Each
//! `(epoch, sender)` pair gets its own frame key, materialized lazily on
//! first send or receive. The wire key id packs the sender id above the low
//! epoch bits, so a receiver can recover both from the header alone.
//!
//! Epochs live in a ring of `2^epoch_bits` slots indexed by the low epoch
//! bits. Advancing the group past the ring capacity overwrites the oldest
//! slot; evicted epochs have their secret zeroized and their frame keys
//! dropped, so frames from aged-out epochs stop decrypting.

use zeroize::Zeroize;

use crate::context::Context;
use crate::derivation;
use crate::error::SframeError;
use crate::header::{Header, KeyId};
use crate::suite::CipherSuite;

/// MLS epoch identifier. Only the low `epoch_bits` go on the wire.
pub type EpochId = u64;

/// MLS sender identifier (leaf-derived, application-chosen).
pub type SenderId = u64;

struct EpochState {
    epoch_id: EpochId,
    secret: Vec<u8>,
    /// Senders whose frame keys exist in the inner context.
    senders: Vec<SenderId>,
}

impl Drop for EpochState {
    fn drop(&mut self) {
        self.secret.zeroize();
    }
}

/// Frame encryption context keyed from MLS epoch secrets.
pub struct MlsContext {
    epoch_bits: u8,
    epoch_mask: u64,
    epochs: Vec<Option<EpochState>>,
    inner: Context,
}

impl MlsContext {
    /// Create a context for `suite` with `epoch_bits` wire bits of epoch
    /// identifier.
    ///
    /// `epoch_bits` trades header compactness against how many epochs stay
    /// decodable: the context keeps at most `2^epoch_bits` live epochs.
    ///
    /// # Errors
    ///
    /// `InvalidEpochBits` unless `epoch_bits` is in `1..=8`.
    pub fn new(suite: CipherSuite, epoch_bits: u8) -> Result<Self, SframeError> {
        if !(1..=8).contains(&epoch_bits) {
            return Err(SframeError::InvalidEpochBits { bits: epoch_bits });
        }
        let capacity = 1usize << epoch_bits;
        Ok(Self {
            epoch_bits,
            epoch_mask: capacity as u64 - 1,
            epochs: (0..capacity).map(|_| None).collect(),
            inner: Context::new(suite),
        })
    }

    /// Record the secret for `epoch_id`.
    ///
    /// Whatever previously occupied the epoch's ring slot is evicted: its
    /// secret is zeroized and its materialized frame keys are removed. With
    /// monotonically increasing epochs this drops the lowest live epoch
    /// exactly when capacity would be exceeded. Re-adding a live epoch
    /// restarts it with fresh counters.
    pub fn add_epoch(&mut self, epoch_id: EpochId, sframe_epoch_secret: &[u8]) {
        let slot = (epoch_id & self.epoch_mask) as usize;
        let fresh = EpochState {
            epoch_id,
            secret: sframe_epoch_secret.to_vec(),
            senders: Vec::new(),
        };
        if let Some(old) = self.epochs[slot].replace(fresh) {
            self.evict(&old);
        }
    }

    /// Evict every live epoch with an id below `epoch_id`.
    pub fn purge_before(&mut self, epoch_id: EpochId) {
        for slot in 0..self.epochs.len() {
            if self.epochs[slot].as_ref().is_some_and(|epoch| epoch.epoch_id < epoch_id) {
                if let Some(old) = self.epochs[slot].take() {
                    self.evict(&old);
                }
            }
        }
    }

    /// Encrypt `plaintext` as `sender_id` under `epoch_id`, returning the
    /// written prefix of `out`.
    ///
    /// The sender's frame key for this epoch is derived on first use; the
    /// per-sender counter lives with the key, so successive frames carry
    /// counters 0, 1, 2, and so on.
    ///
    /// # Errors
    ///
    /// `UnknownEpoch` if `epoch_id` is not live (never added, aged out, or
    /// purged), plus every [`Context::protect`] error.
    pub fn protect<'a>(
        &mut self,
        epoch_id: EpochId,
        sender_id: SenderId,
        out: &'a mut [u8],
        plaintext: &[u8],
    ) -> Result<&'a mut [u8], SframeError> {
        let kid = self.materialize(epoch_id, sender_id)?;
        self.inner.protect(kid, out, plaintext)
    }

    /// Decrypt a frame into `out`, resolving the sending epoch and sender
    /// from the header key id.
    ///
    /// # Errors
    ///
    /// `UnknownEpoch` if no live epoch matches the key id's low bits, plus
    /// every [`Context::unprotect`] error.
    pub fn unprotect<'a>(
        &mut self,
        out: &'a mut [u8],
        ciphertext: &[u8],
    ) -> Result<&'a mut [u8], SframeError> {
        let (header, _) = Header::decode(ciphertext)?;

        let slot = (header.key_id & self.epoch_mask) as usize;
        let Some(epoch) = self.epochs[slot].as_ref() else {
            return Err(SframeError::UnknownEpoch { key_id: header.key_id });
        };
        let epoch_id = epoch.epoch_id;
        let sender_id = header.key_id >> self.epoch_bits;

        self.materialize(epoch_id, sender_id)?;
        self.inner.unprotect(out, ciphertext)
    }

    /// Wire key id for `(epoch_id, sender_id)`.
    fn wire_key_id(&self, epoch_id: EpochId, sender_id: SenderId) -> KeyId {
        (sender_id << self.epoch_bits) | (epoch_id & self.epoch_mask)
    }

    /// Ensure the frame key for `(epoch_id, sender_id)` exists, returning
    /// its wire key id.
    fn materialize(
        &mut self,
        epoch_id: EpochId,
        sender_id: SenderId,
    ) -> Result<KeyId, SframeError> {
        let suite = self.inner.suite();
        let kid = self.wire_key_id(epoch_id, sender_id);
        let slot = (epoch_id & self.epoch_mask) as usize;

        let Some(epoch) = self.epochs[slot].as_mut() else {
            return Err(SframeError::UnknownEpoch { key_id: kid });
        };
        if epoch.epoch_id != epoch_id {
            return Err(SframeError::UnknownEpoch { key_id: kid });
        }

        if !epoch.senders.contains(&sender_id) {
            let mut base = derivation::derive_sender_base(suite, &epoch.secret, sender_id);
            self.inner.add_key(kid, &base);
            base.zeroize();
            epoch.senders.push(sender_id);
        }
        Ok(kid)
    }

    fn evict(&mut self, epoch: &EpochState) {
        for &sender_id in &epoch.senders {
            let kid = self.wire_key_id(epoch.epoch_id, sender_id);
            self.inner.remove_key(kid);
        }
    }
}
