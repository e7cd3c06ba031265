//! Authenticated encryption between two participants holding long-term
//! key pairs.
//!
//! # Scheme ([`Ecies`])
//! 1. **Shared secret**: `receiver_public * sender_private`, canonically encoded.
//! 2. **KDF**: SHAKE256 over the length-prefixed domain tag, shared secret,
//!    `context1` and `context2`, squeezed into a 32-byte key and a 12-byte nonce.
//! 3. **Encryption**: ChaCha20-Poly1305 with `context2` as associated data.
//!    The 16-byte tag travels next to the ciphertext.
//!
//! Every (key pair, context) pair must be used for at most one message: the
//! nonce is derived, not random.

use chacha20poly1305::{
    aead::{AeadInPlace, KeyInit},
    ChaCha20Poly1305, Key, Nonce, Tag,
};
use serde::{Deserialize, Serialize};
use sha3::{
    digest::{ExtendableOutput, Update, XofReader},
    Shake256,
};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::group::Group;

const DOMAIN: &[u8] = b"threshold-dkg/ecies/v1";
const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Result type specialized for channel operations.
pub type ChannelResult<T> = Result<T, ChannelError>;

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("authentication tag mismatch")]
    Authentication,
    #[error("encryption failed")]
    Encryption,
}

/// Ciphertext plus detached authentication tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedBox {
    pub ciphertext: Vec<u8>,
    pub tag: Vec<u8>,
}

/// Pairwise authenticated encryption keyed by the participants' key pairs.
pub trait SecureChannel<G: Group> {
    fn seal(
        &self,
        plaintext: &[u8],
        sender_private: &G::Scalar,
        receiver_public: &G::Point,
        context1: &[u8],
        context2: &[u8],
    ) -> ChannelResult<SealedBox>;

    /// Fails with [`ChannelError::Authentication`] unless the box was sealed
    /// by the holder of `sender_public`'s private key for this receiver and
    /// these exact contexts.
    fn open(
        &self,
        sealed: &SealedBox,
        receiver_private: &G::Scalar,
        sender_public: &G::Point,
        context1: &[u8],
        context2: &[u8],
    ) -> ChannelResult<Zeroizing<Vec<u8>>>;
}

/// Diffie-Hellman + SHAKE256 + ChaCha20-Poly1305.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ecies;

impl Ecies {
    fn cipher<G: Group>(
        private: &G::Scalar,
        public: &G::Point,
        context1: &[u8],
        context2: &[u8],
    ) -> (ChaCha20Poly1305, Zeroizing<[u8; NONCE_LEN]>) {
        let shared = Zeroizing::new(G::point_to_bytes(&(*public * *private)));

        let mut hasher = Shake256::default();
        for part in [DOMAIN, shared.as_slice(), context1, context2] {
            hasher.update(&(part.len() as u64).to_le_bytes());
            hasher.update(part);
        }
        let mut reader = hasher.finalize_xof();

        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        let mut nonce = Zeroizing::new([0u8; NONCE_LEN]);
        reader.read(&mut key[..]);
        reader.read(&mut nonce[..]);

        (ChaCha20Poly1305::new(Key::from_slice(&key[..])), nonce)
    }
}

impl<G: Group> SecureChannel<G> for Ecies {
    fn seal(
        &self,
        plaintext: &[u8],
        sender_private: &G::Scalar,
        receiver_public: &G::Point,
        context1: &[u8],
        context2: &[u8],
    ) -> ChannelResult<SealedBox> {
        let (cipher, nonce) =
            Self::cipher::<G>(sender_private, receiver_public, context1, context2);
        let mut buffer = plaintext.to_vec();
        let tag = cipher
            .encrypt_in_place_detached(Nonce::from_slice(&nonce[..]), context2, &mut buffer)
            .map_err(|_| ChannelError::Encryption)?;
        Ok(SealedBox {
            ciphertext: buffer,
            tag: tag.to_vec(),
        })
    }

    fn open(
        &self,
        sealed: &SealedBox,
        receiver_private: &G::Scalar,
        sender_public: &G::Point,
        context1: &[u8],
        context2: &[u8],
    ) -> ChannelResult<Zeroizing<Vec<u8>>> {
        if sealed.tag.len() != TAG_LEN {
            return Err(ChannelError::Authentication);
        }
        let (cipher, nonce) =
            Self::cipher::<G>(receiver_private, sender_public, context1, context2);
        let mut buffer = Zeroizing::new(sealed.ciphertext.clone());
        cipher
            .decrypt_in_place_detached(
                Nonce::from_slice(&nonce[..]),
                context2,
                buffer.as_mut_slice(),
                Tag::from_slice(&sealed.tag),
            )
            .map_err(|_| ChannelError::Authentication)?;
        Ok(buffer)
    }
}
